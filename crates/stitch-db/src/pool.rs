//! # Database Handle
//!
//! Opens the shop database and hands out repositories.
//!
//! ## Opening
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [database] path = ".../stitch.db"      (desk config or --db)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(path)                                                   │
//! │       │   .read_only(true)   print-only counter                        │
//! │       ▼                                                                 │
//! │  Database::new(config)                                                 │
//! │       ├── writable:  mode=rwc, WAL, migrations                         │
//! │       └── read-only: mode=ro, no migrations, writes → PermissionDenied │
//! │       │                                                                 │
//! │       ├──► db.orders()     lookup, intake, dues, payments, status      │
//! │       └──► db.customers()  lookup, registration                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! WAL lets the order dashboard keep writing while a counter prints.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;

const MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// How to open the database.
///
/// ## Example
/// ```rust
/// use stitch_db::DbConfig;
///
/// let config = DbConfig::new("/srv/stitch/stitch.db")
///     .max_connections(4)
///     .read_only(true);
/// assert!(config.read_only);
/// assert!(!config.migrate);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, or `:memory:`.
    pub database_path: PathBuf,

    /// Pool size. A desk rarely needs more than a handful.
    pub max_connections: u32,

    /// How long to wait for a free connection before `PoolExhausted`.
    pub acquire_timeout: Duration,

    /// Idle connections are closed after this long.
    pub idle_timeout: Duration,

    /// Apply pending migrations on open. Always off for read-only handles.
    pub migrate: bool,

    /// Open with `mode=ro`.
    pub read_only: bool,
}

impl DbConfig {
    /// Writable database at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            migrate: true,
            read_only: false,
        }
    }

    /// Private in-memory database; every handle starts empty.
    ///
    /// Limited to one connection so all queries see the same data.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn migrate(mut self, migrate: bool) -> Self {
        self.migrate = migrate && !self.read_only;
        self
    }

    /// Opens without write access, for print-only counters.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        if read_only {
            self.migrate = false;
        }
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let mode = if self.read_only { "ro" } else { "rwc" };
        let url = format!("sqlite://{}?mode={}", self.database_path.display(), mode);

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true)
            .read_only(self.read_only);

        if self.read_only {
            return Ok(options);
        }

        Ok(options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and, for writable handles, applies migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            read_only = config.read_only,
            "Opening database"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(max_connections = config.max_connections, "Pool ready");

        let db = Database { pool };
        if config.migrate {
            migrations::run_migrations(&db.pool).await?;
        }

        Ok(db)
    }

    /// The underlying pool, for queries outside the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        debug!("Closing database");
        self.pool.close().await;
    }

    /// True when a trivial query succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
