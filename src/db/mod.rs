//! SQLite storage for the score counter
pub mod entities;
pub mod migrations;

use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Opens (creating if needed) the SQLite file at `path`.
pub async fn connect_db(path: &str) -> Result<DatabaseConnection, DbErr> {
    let url = format!("sqlite://{}?mode=rwc", path);
    Database::connect(url).await
}

/// Opens the database and brings the schema up to date.
pub async fn connect_and_migrate(path: &str) -> Result<DatabaseConnection, DbErr> {
    let db = connect_db(path).await?;
    migrations::Migrator::up(&db, None).await?;
    Ok(db)
}

#[cfg(test)]
/// In-memory database with the schema applied.
pub async fn connect_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    migrations::Migrator::up(&db, None).await?;
    Ok(db)
}
