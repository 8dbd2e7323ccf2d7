#![cfg(test)]
use sea_orm::DatabaseConnection;
use models::db::{connect_with_config, ensure_schema, DatabaseConfig};

/// Fresh in-memory SQLite store with the customers table created.
///
/// Each call gets its own database, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    ensure_schema(&db).await?;
    Ok(db)
}
