//! # Stitch Desk Library
//!
//! The print desk of a tailoring shop: invoices, measurement slips, payments
//! and the dues list, on top of `stitch-core` and `stitch-db`.
//!
//! ## Module Organization
//! ```text
//! stitch_desk/
//! ├── lib.rs          ◄─── You are here (tracing, command dispatch)
//! ├── cli.rs          ◄─── clap definitions
//! ├── config.rs       ◄─── DeskConfig (TOML + STITCH_* env)
//! ├── error.rs        ◄─── ApiError for commands
//! ├── source.rs       ◄─── OrderSource: database or in-memory
//! ├── view.rs         ◄─── DocumentView: fetch → compose → paint → print
//! ├── render.rs       ◄─── HTML for pages and message states
//! ├── print.rs        ◄─── PrintTarget, SpoolPrinter, deferred PrintTask
//! └── commands/
//!     ├── document.rs ◄─── invoice, slip
//!     └── ledger.rs   ◄─── dues, pay, status
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod print;
pub mod render;
pub mod source;
pub mod view;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::emit;
use config::DeskConfig;
use error::ApiResult;
use source::DbSource;
use stitch_db::{Database, DbConfig};
use view::DocumentKind;

/// Runs one CLI command.
///
/// ## Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load DeskConfig (--config / STITCH_CONFIG / platform dir)          │
/// │  2. Open the database (--db overrides the configured path)             │
/// │     • SQLite with WAL mode, pending migrations applied                 │
/// │     • read-only when [database] read_only = true                       │
/// │  3. Dispatch                                                            │
/// │     • invoice / slip ──► DocumentView, wait for the print              │
/// │     • dues / pay / status ──► ledger commands                          │
/// │  4. Print the response (text, or JSON with --json)                     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> ApiResult<()> {
    let config = DeskConfig::load(cli.config.clone())?;

    let db_path = config.database_path(cli.db.as_deref()).to_path_buf();
    info!(path = %db_path.display(), read_only = config.database.read_only, "Using database");
    let db = Database::new(DbConfig::new(db_path).read_only(config.database.read_only)).await?;

    let result = dispatch(&cli, &config, &db).await;
    db.close().await;
    result
}

async fn dispatch(cli: &Cli, config: &DeskConfig, db: &Database) -> ApiResult<()> {
    match &cli.command {
        Command::Invoice { order_id } => {
            let source = Arc::new(DbSource::new(db.clone()));
            let response =
                commands::print_document(source, config, DocumentKind::Invoice, order_id).await?;
            emit(&response, cli.json)
        }
        Command::Slip { order_id } => {
            let source = Arc::new(DbSource::new(db.clone()));
            let response =
                commands::print_document(source, config, DocumentKind::Slips, order_id).await?;
            emit(&response, cli.json)
        }
        Command::Dues => {
            let response = commands::list_dues(db, &config.date_formatter()).await?;
            emit(&response, cli.json)
        }
        Command::Pay { order_id, amount } => {
            let response = commands::take_payment(db, order_id, amount).await?;
            emit(&response, cli.json)
        }
        Command::Status { order_id, status } => {
            let response = commands::change_order_status(db, order_id, status).await?;
            emit(&response, cli.json)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stitch=trace` - Show trace for stitch crates only
/// - Default: INFO, DEBUG for stitch crates
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stitch=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
