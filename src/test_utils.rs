use std::sync::Arc;

use sea_orm::{ConnectOptions, Database as SeaDatabase};

use crate::database::Database;

/// In-memory database with every migration applied. A single pooled
/// connection keeps the memory database alive for the whole test.
pub async fn test_db() -> Arc<Database> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = SeaDatabase::connect(opt).await.unwrap();

    Arc::new(Database::from_connection(conn).await.unwrap())
}
