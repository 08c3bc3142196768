#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::from_file().or_else(|_| DatabaseConfig::from_env()).unwrap_or_default();
    cfg.min_connections = 1;
    cfg.connect_timeout_secs = 3;
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// A migrated database connection, or `None` when DB tests are skipped or
/// no database is reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return None; }

    let migrated = *MIGRATED
        .get_or_init(|| async {
            let Ok(db) = connect_with_config(&test_config()).await else { return false };
            migration::Migrator::up(&db, None).await.is_ok()
        })
        .await;
    if !migrated {
        eprintln!("skip: no migrated database available");
        return None;
    }

    // Fresh connection for the current test's runtime
    connect_with_config(&test_config()).await.ok()
}
