//! # Desk Commands
//!
//! One function per CLI subcommand. Each returns a serialisable response;
//! `emit` prints it as text or, with `--json`, as JSON.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports, output)
//! ├── document.rs  ◄─── invoice, slip
//! └── ledger.rs    ◄─── dues, pay, status
//! ```

pub mod document;
pub mod ledger;

use std::fmt::Display;

use serde::Serialize;

use crate::error::{ApiError, ApiResult};

pub use document::{print_document, DocumentResponse};
pub use ledger::{change_order_status, list_dues, take_payment, DuesResponse, PaymentResponse, StatusResponse};

/// Prints a command response to stdout.
pub fn emit<T: Serialize + Display>(response: &T, json: bool) -> ApiResult<()> {
    if json {
        let text = serde_json::to_string_pretty(response)
            .map_err(|e| ApiError::internal(format!("Could not serialize response: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{}", response);
    }
    Ok(())
}
