//! The points counter.
//!
//! A single non-negative integer. A missing stored value reads as zero.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::constants::SCORE_COUNTER_NAME;
use crate::db;
use crate::error::CaptionError;

/// Somewhere the score lives.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Current total.
    async fn load(&self) -> Result<u64, CaptionError>;

    /// Adds `amount` and returns the new total.
    async fn award(&self, amount: u64) -> Result<u64, CaptionError>;
}

/// Score persisted in SQLite, survives restarts.
#[derive(Clone, Debug)]
pub struct DbScoreStore {
    db: DatabaseConnection,
    name: String,
}

impl DbScoreStore {
    /// Uses the default counter name on an already migrated connection.
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            name: SCORE_COUNTER_NAME.to_string(),
        }
    }

    /// Opens the SQLite file at `path`, migrating it if needed.
    pub async fn open(path: &str) -> Result<Self, CaptionError> {
        Ok(Self::new(db::connect_and_migrate(path).await?))
    }
}

fn to_points(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[async_trait]
impl ScoreStore for DbScoreStore {
    async fn load(&self) -> Result<u64, CaptionError> {
        let points = db::entities::scores::points_for(&self.db, &self.name).await?;
        Ok(to_points(points))
    }

    async fn award(&self, amount: u64) -> Result<u64, CaptionError> {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        let points = db::entities::scores::add_points(&self.db, &self.name, amount).await?;
        Ok(to_points(points))
    }
}

/// Score kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    points: AtomicU64,
}

impl MemoryScoreStore {
    /// Starts at `points`.
    pub fn with_points(points: u64) -> Self {
        Self {
            points: AtomicU64::new(points),
        }
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn load(&self) -> Result<u64, CaptionError> {
        Ok(self.points.load(Ordering::SeqCst))
    }

    async fn award(&self, amount: u64) -> Result<u64, CaptionError> {
        let previous = self
            .points
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |points| {
                Some(points.saturating_add(amount))
            })
            .unwrap_or_else(|points| points);
        Ok(previous.saturating_add(amount))
    }
}
