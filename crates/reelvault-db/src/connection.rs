//! Process-wide database connection management.
//!
//! The manager moves through `Uninitialized -> Connecting -> Established`. While an
//! attempt is in flight every caller awaits the same shared future, so at most one
//! connection attempt runs at a time. A failed attempt puts the manager back to
//! `Uninitialized` and the next caller starts a fresh one.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use reelvault_core::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("failed to connect to database: {0}")]
    Connect(String),

    #[error("failed to apply database migrations: {0}")]
    Migrate(String),
}

impl From<ConnectionError> for AppError {
    fn from(err: ConnectionError) -> Self {
        AppError::DatabaseUnavailable(err.to_string())
    }
}

/// Opens one underlying connection (or pool).
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Connection, ConnectionError>;
}

/// Observable lifecycle state, for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Established,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Uninitialized => "uninitialized",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Established => "established",
        }
    }
}

/// Read-only view of a connection's lifecycle.
pub trait ConnectionStatus: Send + Sync {
    fn connection_state(&self) -> ConnectionState;
}

type PendingConnection<T> = Shared<BoxFuture<'static, Result<T, ConnectionError>>>;

enum State<T: Clone> {
    Uninitialized,
    Connecting {
        attempt: u64,
        pending: PendingConnection<T>,
    },
    Established(T),
}

/// Single-flight connection cache shared by every store in the process.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    state: Mutex<State<C::Connection>>,
    attempts: AtomicU64,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            state: Mutex::new(State::Uninitialized),
            attempts: AtomicU64::new(0),
        }
    }

    /// Return the established connection, joining or starting an attempt if needed.
    pub async fn get(&self) -> Result<C::Connection, ConnectionError> {
        let (attempt, pending) = {
            let mut state = self.lock_state();
            let in_flight = match &*state {
                State::Established(connection) => return Ok(connection.clone()),
                State::Connecting { attempt, pending } => Some((*attempt, pending.clone())),
                State::Uninitialized => None,
            };
            match in_flight {
                Some(in_flight) => in_flight,
                None => {
                    let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    let connector = Arc::clone(&self.connector);
                    let pending = async move { connector.connect().await }.boxed().shared();
                    *state = State::Connecting {
                        attempt,
                        pending: pending.clone(),
                    };
                    tracing::debug!(attempt, "Starting database connection attempt");
                    (attempt, pending)
                }
            }
        };

        let result = pending.await;

        let mut state = self.lock_state();
        // Only the caller that observes its own attempt still pending settles the state.
        if matches!(&*state, State::Connecting { attempt: current, .. } if *current == attempt) {
            *state = match &result {
                Ok(connection) => State::Established(connection.clone()),
                Err(error) => {
                    tracing::warn!(attempt, error = %error, "Database connection attempt failed");
                    State::Uninitialized
                }
            };
        }

        result
    }

    /// Number of connection attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.lock_state() {
            State::Uninitialized => ConnectionState::Uninitialized,
            State::Connecting { .. } => ConnectionState::Connecting,
            State::Established(_) => ConnectionState::Established,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, State<C::Connection>> {
        // The lock is never held across an await or a panic-prone call.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<C: Connector> ConnectionStatus for ConnectionManager<C> {
    fn connection_state(&self) -> ConnectionState {
        self.state()
    }
}

/// Connects a Postgres pool and applies pending migrations.
#[derive(Debug, Clone)]
pub struct PgConnector {
    database_url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PgConnector {
    pub fn new(database_url: impl Into<String>, max_connections: u32, acquire_timeout: Duration) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections,
            acquire_timeout,
        }
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Connection = PgPool;

    async fn connect(&self) -> Result<PgPool, ConnectionError> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&self.database_url)
            .await
            .map_err(|e| ConnectionError::Connect(e.to_string()))?;

        // Workspace migrations/ relative to this crate
        let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
        let migrator = sqlx::migrate::Migrator::new(migrations_dir)
            .await
            .map_err(|e| ConnectionError::Migrate(e.to_string()))?;
        migrator
            .run(&pool)
            .await
            .map_err(|e| ConnectionError::Migrate(e.to_string()))?;

        tracing::info!(
            max_connections = self.max_connections,
            "Database connected and migrations applied"
        );
        Ok(pool)
    }
}

pub type PgConnectionManager = ConnectionManager<PgConnector>;
