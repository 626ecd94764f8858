//! # Document Commands
//!
//! `invoice` and `slip`: load the view, paint into the spool directory and
//! wait for the scheduled print.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::DeskConfig;
use crate::error::{ApiError, ApiResult};
use crate::print::SpoolPrinter;
use crate::source::OrderSource;
use crate::view::{DocumentKind, DocumentView, ViewSettings, ViewState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub order_id: String,
    pub document: &'static str,
    /// Invoice pages or slips; zero when nothing was printed.
    pub pages: usize,
    pub printed: bool,
    pub spool_path: PathBuf,
    pub notices: Vec<ApiError>,
}

impl fmt::Display for DocumentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.printed {
            write!(
                f,
                "Printed {} for {} ({} page(s)): {}",
                self.document,
                self.order_id,
                self.pages,
                self.spool_path.display()
            )?;
        } else {
            write!(
                f,
                "Nothing to print for {}: no stitching items with measurements ({})",
                self.order_id,
                self.spool_path.display()
            )?;
        }
        for notice in &self.notices {
            write!(f, "\nNotice: {}", notice)?;
        }
        Ok(())
    }
}

/// Paints `kind` for `order_id` and waits until it has printed.
///
/// ## Errors
/// - `NOT_FOUND` when the order does not exist (the "not found" page is
///   still painted)
/// - whatever stopped composition or printing
pub async fn print_document<S: OrderSource>(
    source: Arc<S>,
    config: &DeskConfig,
    kind: DocumentKind,
    order_id: &str,
) -> ApiResult<DocumentResponse> {
    let printer = Arc::new(SpoolPrinter::new(
        &config.print.output_dir,
        &spool_file_name(kind, order_id),
        config.print.command.clone(),
    ));
    let spool_path = printer.path().to_path_buf();

    let mut view = DocumentView::new(kind, source, printer, ViewSettings::from_config(config));

    let pages = match view.load(order_id).await {
        ViewState::NotFound => return Err(ApiError::not_found("Order", order_id)),
        ViewState::Failed(e) => return Err(e.clone()),
        ViewState::Invoice(doc) => doc.page_count(),
        ViewState::Slips(doc) => doc.slip_count(),
        ViewState::NoMeasurements | ViewState::Loading => 0,
    };

    for notice in view.notices() {
        warn!(order_id = %order_id, "{}", notice);
    }

    let printed = match view.take_print_task() {
        Some(task) => {
            task.wait().await?;
            info!(order_id = %order_id, kind = kind.as_str(), pages, "Document printed");
            true
        }
        None => false,
    };

    Ok(DocumentResponse {
        order_id: order_id.to_string(),
        document: kind.as_str(),
        pages,
        printed,
        spool_path,
        notices: view.notices().to_vec(),
    })
}

/// `invoice-ord-1042.html`; characters unsafe in file names become `_`.
fn spool_file_name(kind: DocumentKind, order_id: &str) -> String {
    let safe: String = order_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}.html", kind.as_str(), safe)
}
