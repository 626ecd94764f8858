//! # Command Line
//!
//! ```text
//! stitch-desk [--config <PATH>] [--db <PATH>] [--json] <COMMAND>
//!
//!   invoice <ORDER_ID>            paint and print the invoice
//!   slip <ORDER_ID>               paint and print the measurement slips
//!   dues                          orders with money still owed
//!   pay <ORDER_ID> <AMOUNT>       take a payment, e.g. `pay ord-1 1500.50`
//!   status <ORDER_ID> <STATUS>    pending | in_progress | ready | delivered | cancelled
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stitch-desk")]
#[command(about = "Invoices, measurement slips and dues for a tailoring shop")]
pub struct Cli {
    /// Config file (default: $STITCH_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides the configured path
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Paint and print an order's invoice
    Invoice {
        order_id: String,
    },
    /// Paint and print an order's measurement slips
    Slip {
        order_id: String,
    },
    /// List orders with an outstanding balance
    Dues,
    /// Record a payment against an order's balance
    Pay {
        order_id: String,
        /// Amount in rupees
        amount: String,
    },
    /// Move an order to a new workshop status
    Status {
        order_id: String,
        status: String,
    },
}
