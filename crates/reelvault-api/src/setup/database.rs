//! Database setup

use reelvault_core::Config;
use reelvault_db::{PgConnectionManager, PgConnector};
use std::sync::Arc;
use std::time::Duration;

/// Build the process-wide connection manager and make a first connection attempt.
///
/// A failed first attempt is logged, not fatal: the manager resets and the next
/// request that needs the database tries again.
pub async fn setup_database(config: &Config) -> Arc<PgConnectionManager> {
    let connector = PgConnector::new(
        config.database_url.clone(),
        config.db_max_connections,
        Duration::from_secs(config.db_timeout_seconds),
    );
    let manager = Arc::new(PgConnectionManager::new(connector));

    match manager.get().await {
        Ok(_) => tracing::info!(
            max_connections = config.db_max_connections,
            "Database ready"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            "Database not reachable at startup; will retry on first use"
        ),
    }

    manager
}
