//! # Document View
//!
//! Loads one order, composes the invoice or the measurement slips, paints the
//! result and schedules a single print.
//!
//! ## Load Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load("ord-1042")                                                      │
//! │    │                                                                    │
//! │    ├── cancel pending print, paint "Loading..."                        │
//! │    │                                                                    │
//! │    ├── fetch_order ──── NotFound ────────────► NotFound      (no print)│
//! │    │        │     └──── other failure ───────► Failed        (no print)│
//! │    │        ▼                                                           │
//! │    ├── fetch_customer ── failure ──► customer = None (+ notice)         │
//! │    │        │                                                           │
//! │    ├── compose ──── InvalidArgument ─────────► Failed        (no print)│
//! │    │        │  └─── no measured items ───────► NoMeasurements (no print)│
//! │    │        ▼                                                           │
//! │    ├── paint(html)                                                      │
//! │    │                                                                    │
//! │    └── Invoice / Slips ──► PrintTask::schedule(target, settle_delay)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The view owns its pending print. Reloading or dropping the view before the
//! delay elapses cancels it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use stitch_core::document::slip::{NO_MEASUREMENTS_MESSAGE, NO_MEASUREMENTS_TITLE};
use stitch_core::document::{
    compose_invoice, compose_slips, InvoiceDocument, PaperSize, ShopIdentity, SlipDocument,
    SlipOutcome, INVOICE_PAPER, SLIP_PAPER,
};
use stitch_core::format::DateFormatter;
use stitch_core::{Customer, Order};

use crate::config::DeskConfig;
use crate::error::{ApiError, ApiResult};
use crate::print::{PrintTarget, PrintTask};
use crate::render::{render_invoice, render_message, render_slips};
use crate::source::{FetchError, OrderSource};

pub const LOADING_TITLE: &str = "Loading...";
pub const NOT_FOUND_TITLE: &str = "Order not found";
pub const FAILED_TITLE: &str = "Could not prepare this document";

// =============================================================================
// Document Kind & State
// =============================================================================

/// Which document a view produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    Slips,
}

impl DocumentKind {
    /// Paper for the document and for its message pages.
    pub fn paper(&self) -> PaperSize {
        match self {
            DocumentKind::Invoice => INVOICE_PAPER,
            DocumentKind::Slips => SLIP_PAPER,
        }
    }

    /// Short name used for spool files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Slips => "slips",
        }
    }
}

/// What the view is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    NotFound,
    Failed(ApiError),
    NoMeasurements,
    Invoice(InvoiceDocument),
    Slips(SlipDocument),
}

impl ViewState {
    /// True for states that are printed.
    pub fn is_printable(&self) -> bool {
        matches!(self, ViewState::Invoice(_) | ViewState::Slips(_))
    }
}

/// Everything the composers need besides the order.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub shop: ShopIdentity,
    pub dates: DateFormatter,
    pub settle_delay: Duration,
}

impl ViewSettings {
    pub fn from_config(config: &DeskConfig) -> Self {
        ViewSettings {
            shop: config.shop.clone(),
            dates: config.date_formatter(),
            settle_delay: config.settle_delay(),
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        ViewSettings::from_config(&DeskConfig::default())
    }
}

// =============================================================================
// Document View
// =============================================================================

/// A print view for one document kind.
pub struct DocumentView<S, P> {
    kind: DocumentKind,
    source: Arc<S>,
    target: Arc<P>,
    settings: ViewSettings,
    state: ViewState,
    notices: Vec<ApiError>,
    print_task: Option<PrintTask>,
}

impl<S: OrderSource, P: PrintTarget> DocumentView<S, P> {
    pub fn new(kind: DocumentKind, source: Arc<S>, target: Arc<P>, settings: ViewSettings) -> Self {
        DocumentView {
            kind,
            source,
            target,
            settings,
            state: ViewState::Loading,
            notices: Vec::new(),
            print_task: None,
        }
    }

    /// Loads `order_id`, paints the result and schedules the print.
    ///
    /// Any print still pending from an earlier load is cancelled first.
    pub async fn load(&mut self, order_id: &str) -> &ViewState {
        self.cancel_print();
        self.notices.clear();

        self.state = ViewState::Loading;
        if let Err(e) = self.paint() {
            warn!(order_id = %order_id, error = %e, "Could not paint placeholder");
        }

        self.state = self.resolve(order_id).await;

        if let Err(e) = self.paint() {
            self.state = ViewState::Failed(e);
            if let Err(e) = self.paint() {
                warn!(order_id = %order_id, error = %e, "Could not paint failure page");
            }
        }

        if self.state.is_printable() {
            self.print_task = Some(PrintTask::schedule(
                Arc::clone(&self.target),
                self.settings.settle_delay,
            ));
        } else {
            debug!(order_id = %order_id, kind = self.kind.as_str(), "Nothing to print");
        }

        &self.state
    }

    async fn resolve(&mut self, order_id: &str) -> ViewState {
        let order = match self.source.fetch_order(order_id).await {
            Ok(order) => order,
            Err(FetchError::NotFound { .. }) => {
                info!(order_id = %order_id, "Order not found");
                return ViewState::NotFound;
            }
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Order fetch failed");
                return ViewState::Failed(e.into());
            }
        };

        let customer = self.fetch_customer(&order).await;
        let settings = &self.settings;

        let composed = match self.kind {
            DocumentKind::Invoice => {
                compose_invoice(&order, customer.as_ref(), &settings.shop, &settings.dates)
                    .map(ViewState::Invoice)
            }
            DocumentKind::Slips => {
                compose_slips(&order, customer.as_ref(), &settings.shop, &settings.dates).map(
                    |outcome| match outcome {
                        SlipOutcome::NoMeasurements => ViewState::NoMeasurements,
                        SlipOutcome::Slips(doc) => ViewState::Slips(doc),
                    },
                )
            }
        };

        match composed {
            Ok(state) => {
                info!(
                    order_id = %order_id,
                    order_number = order.order_number,
                    kind = self.kind.as_str(),
                    pages = page_count(&state),
                    "Document composed"
                );
                state
            }
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Document could not be composed");
                ViewState::Failed(e.into())
            }
        }
    }

    /// The order's customer, or `None` when it cannot be read.
    ///
    /// Permission and transport failures leave a notice; the document still
    /// renders with `N/A` in place of the customer.
    async fn fetch_customer(&mut self, order: &Order) -> Option<Customer> {
        if order.customer_id.trim().is_empty() {
            return None;
        }

        match self.source.fetch_customer(&order.customer_id).await {
            Ok(customer) => Some(customer),
            Err(FetchError::NotFound { .. }) => {
                debug!(customer_id = %order.customer_id, "Customer not found");
                None
            }
            Err(e) => {
                warn!(customer_id = %order.customer_id, error = %e, "Customer fetch failed");
                self.notices.push(e.into());
                None
            }
        }
    }

    fn paint(&self) -> ApiResult<()> {
        let html = self.render();
        self.target.paint(&html).map_err(ApiError::from)
    }

    /// HTML for the current state.
    pub fn render(&self) -> String {
        let paper = self.kind.paper();
        match &self.state {
            ViewState::Loading => render_message(paper, LOADING_TITLE, None),
            ViewState::NotFound => render_message(paper, NOT_FOUND_TITLE, None),
            ViewState::Failed(e) => render_message(paper, FAILED_TITLE, Some(&e.message)),
            ViewState::NoMeasurements => {
                render_message(paper, NO_MEASUREMENTS_TITLE, Some(NO_MEASUREMENTS_MESSAGE))
            }
            ViewState::Invoice(doc) => render_invoice(doc),
            ViewState::Slips(doc) => render_slips(doc),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Dismissible problems from the last load.
    pub fn notices(&self) -> &[ApiError] {
        &self.notices
    }

    /// Removes a notice once the operator has seen it.
    pub fn dismiss_notice(&mut self, index: usize) -> Option<ApiError> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }

    /// True while a print is scheduled and has not fired.
    pub fn is_print_pending(&self) -> bool {
        self.print_task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Hands the pending print to the caller, e.g. to wait for it.
    pub fn take_print_task(&mut self) -> Option<PrintTask> {
        self.print_task.take()
    }

    /// Cancels the pending print, if any.
    pub fn cancel_print(&mut self) {
        if let Some(mut task) = self.print_task.take() {
            task.cancel();
        }
    }
}

fn page_count(state: &ViewState) -> usize {
    match state {
        ViewState::Invoice(doc) => doc.page_count(),
        ViewState::Slips(doc) => doc.slip_count(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::print::RecordingPrinter;
    use crate::source::MemorySource;
    use chrono::{TimeZone, Utc};
    use stitch_core::{Measurements, Money, OrderItem, OrderStatus, StitchingDetails};
    use tokio::time::advance;

    const DELAY: Duration = Duration::from_millis(500);

    fn shirt() -> OrderItem {
        OrderItem::stitching(
            "Shirt Stitching",
            Money::from_rupees(900),
            1,
            StitchingDetails {
                apparel: "Shirt".to_string(),
                measurements: Measurements::new()
                    .with("chest", "40")
                    .with("shirtLength", "30"),
                ..Default::default()
            },
        )
    }

    fn order(items: Vec<OrderItem>) -> Order {
        let subtotal: Money = items.iter().map(|i| i.amount()).sum();
        Order {
            id: "o1".to_string(),
            order_number: 1042,
            customer_id: "c1".to_string(),
            items,
            subtotal,
            advance: Money::zero(),
            balance: subtotal,
            delivery_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 9, 5, 6, 0, 0).unwrap(),
            status: OrderStatus::Pending,
        }
    }

    fn customer() -> Customer {
        Customer {
            id: "c1".to_string(),
            name: "Asha Kulkarni".to_string(),
            phone: "9822012345".to_string(),
            email: None,
            measurements: None,
            created_at: None,
        }
    }

    fn desk_view(
        kind: DocumentKind,
        source: MemorySource,
    ) -> (DocumentView<MemorySource, RecordingPrinter>, Arc<RecordingPrinter>) {
        let printer = Arc::new(RecordingPrinter::default());
        let settings = ViewSettings {
            shop: ShopIdentity::default(),
            dates: DateFormatter::ist(),
            settle_delay: DELAY,
        };
        let view = DocumentView::new(kind, Arc::new(source), printer.clone(), settings);
        (view, printer)
    }

    async fn assert_never_prints(printer: &RecordingPrinter) {
        advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(printer.print_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoice_prints_once_after_delay() {
        let source = MemorySource::new()
            .with_order(order(vec![shirt()]))
            .with_customer(customer());
        let (mut view, printer) = desk_view(DocumentKind::Invoice, source);

        assert!(matches!(view.load("o1").await, ViewState::Invoice(_)));
        assert_eq!(printer.paint_count(), 2);
        assert!(printer.last_paint().contains("Asha Kulkarni"));
        assert_eq!(printer.print_count(), 0);
        assert!(view.is_print_pending());

        advance(DELAY).await;
        view.take_print_task().unwrap().wait().await.unwrap();
        assert_eq!(printer.print_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_not_found() {
        let (mut view, printer) = desk_view(DocumentKind::Invoice, MemorySource::new());

        assert_eq!(view.load("missing").await, &ViewState::NotFound);
        assert!(printer.last_paint().contains(NOT_FOUND_TITLE));
        assert!(!view.is_print_pending());
        assert_never_prints(&printer).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slips_without_measurements_never_print() {
        let items = vec![OrderItem::stock("Silk Tie", Money::from_rupees(450), 1)];
        let source = MemorySource::new().with_order(order(items));
        let (mut view, printer) = desk_view(DocumentKind::Slips, source);

        assert_eq!(view.load("o1").await, &ViewState::NoMeasurements);
        assert!(printer.last_paint().contains(NO_MEASUREMENTS_TITLE));
        assert_never_prints(&printer).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_slips_print_with_content() {
        let source = MemorySource::new()
            .with_order(order(vec![shirt(), shirt(), shirt()]))
            .with_customer(customer());
        let (mut view, printer) = desk_view(DocumentKind::Slips, source);

        match view.load("o1").await {
            ViewState::Slips(doc) => assert_eq!(doc.slip_count(), 2),
            other => panic!("expected slips, got {:?}", other),
        }

        advance(DELAY).await;
        view.take_print_task().unwrap().wait().await.unwrap();
        assert_eq!(printer.print_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_customer_permission_denied_is_a_notice() {
        let source = MemorySource::new()
            .with_order(order(vec![shirt()]))
            .failing_customers(FetchError::PermissionDenied("rules".into()));
        let (mut view, printer) = desk_view(DocumentKind::Invoice, source);

        assert!(matches!(view.load("o1").await, ViewState::Invoice(_)));
        assert!(printer.last_paint().contains("<strong>Bill To:</strong> N/A"));
        assert_eq!(view.notices().len(), 1);
        assert!(view.notices()[0].is_dismissible());
        assert!(view.is_print_pending());

        assert!(view.dismiss_notice(0).is_some());
        assert!(view.notices().is_empty());
        assert!(view.dismiss_notice(0).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_cancels_pending_print() {
        let source = MemorySource::new().with_order(order(vec![shirt()]));
        let (mut view, printer) = desk_view(DocumentKind::Invoice, source);

        view.load("o1").await;
        advance(Duration::from_millis(300)).await;
        view.load("o1").await;

        advance(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;
        assert_eq!(printer.print_count(), 0);

        advance(Duration::from_millis(200)).await;
        view.take_print_task().unwrap().wait().await.unwrap();
        assert_eq!(printer.print_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_print() {
        let source = MemorySource::new().with_order(order(vec![shirt()]));
        let (mut view, printer) = desk_view(DocumentKind::Invoice, source);

        view.load("o1").await;
        drop(view);
        assert_never_prints(&printer).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_fetch_failure() {
        let source = MemorySource::new().failing_orders(FetchError::Transport("offline".into()));
        let (mut view, printer) = desk_view(DocumentKind::Invoice, source);

        match view.load("o1").await {
            ViewState::Failed(e) => assert_eq!(e.code, ErrorCode::DatabaseError),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(printer.last_paint().contains(FAILED_TITLE));
        assert_never_prints(&printer).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_measurements_fail() {
        let mut item = shirt();
        if let stitch_core::ItemKind::Stitching { details } = &mut item.kind {
            details.measurements =
                serde_json::from_value(serde_json::json!({ "chest": ["38", "40"] })).unwrap();
        }
        let source = MemorySource::new().with_order(order(vec![item]));
        let (mut view, printer) = desk_view(DocumentKind::Slips, source);

        match view.load("o1").await {
            ViewState::Failed(e) => assert_eq!(e.code, ErrorCode::InvalidArgument),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_never_prints(&printer).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_paint_failure() {
        let source = MemorySource::new().with_order(order(vec![shirt()]));
        let printer = Arc::new(RecordingPrinter::failing());
        let mut view = DocumentView::new(
            DocumentKind::Invoice,
            Arc::new(source),
            printer.clone(),
            ViewSettings::default(),
        );

        match view.load("o1").await {
            ViewState::Failed(e) => assert_eq!(e.code, ErrorCode::PrintError),
            other => panic!("expected failure, got {:?}", other),
        }
        // Placeholder, document, then the failure page; each refusal is logged.
        assert_eq!(printer.paint_attempts(), 3);
        assert_eq!(printer.paint_count(), 0);
        assert!(!view.is_print_pending());
        assert_never_prints(&printer).await;
    }
}
