use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

pub use configs::DatabaseConfig;

/// Open a pooled connection using the given settings.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url());
    opt.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opt).await?;
    Ok(db)
}

/// Connect with a fixed backoff: `connect_attempts` tries, `retry_interval_secs` apart.
pub async fn connect_with_retry(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let attempts = cfg.connect_attempts.max(1);
    let interval = Duration::from_secs(cfg.retry_interval_secs);
    let mut last_err = None;

    for attempt in 1..=attempts {
        match connect_with_config(cfg).await {
            Ok(db) => {
                info!(host = %cfg.host, port = cfg.port, db = %cfg.name, attempt, "database connected");
                return Ok(db);
            }
            Err(e) => {
                warn!(attempt, attempts, error = %e, "database connection failed");
                last_err = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "could not connect to database after {attempts} attempts: {}",
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}
