

use sea_orm::DatabaseConnection;

use crate::db::{self, DatabaseConfig};

/// Fresh in-memory store with the schema applied.
pub(crate) async fn memory_db() -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let conn = db::connect_with_config(&cfg).await?;
    db::ensure_schema(&conn).await?;
    Ok(conn)
}
