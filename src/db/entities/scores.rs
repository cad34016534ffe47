//! Named point counters
use sea_orm::{ActiveValue::Set, IntoActiveModel, TransactionTrait, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scores")]
/// A single named counter
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    /// counter name
    pub name: String,
    /// current total
    pub points: i64,
}

/// scores stand alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Current total for `name`, zero when nothing was stored yet.
pub async fn points_for(db: &DatabaseConnection, name: &str) -> Result<i64, DbErr> {
    Ok(Entity::find_by_id(name.to_string())
        .one(db)
        .await?
        .map(|model| model.points)
        .unwrap_or(0))
}

/// Adds `amount` to the counter and returns the new total.
pub async fn add_points(db: &DatabaseConnection, name: &str, amount: i64) -> Result<i64, DbErr> {
    let db_txn = db.begin().await?;

    let total = match Entity::find_by_id(name.to_string()).one(&db_txn).await? {
        Some(model) => {
            let points = model.points.saturating_add(amount);
            let mut am = model.into_active_model();
            am.points = Set(points);
            am.update(&db_txn).await?.points
        }
        None => {
            let active = ActiveModel {
                name: Set(name.to_string()),
                points: Set(amount),
            };
            active.insert(&db_txn).await?.points
        }
    };
    db_txn.commit().await?;

    Ok(total)
}
