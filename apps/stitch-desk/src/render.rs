//! # HTML Renderer
//!
//! Turns composed invoices and slips into print-ready HTML.
//!
//! Every page is a `<section class="page">`. All but the last also carry the
//! `break` class, which forces a page break after it. Paper size and margin
//! come from an `@page` rule, so the browser or print command needs no setup.
//!
//! Terminal states (loading, not found, no measurements, errors) render as a
//! single message page, never as a blank document.

use stitch_core::document::invoice::{InvoiceLine, InvoicePage, InvoiceTerms, InvoiceTotals};
use stitch_core::document::slip::{MeasurementSlip, SlipEntry, OWN_FABRIC_BADGE, SLIP_TITLE};
use stitch_core::document::{
    BillTo, InvoiceDocument, PageClosing, PaperSize, ShopContact, ShopIdentity, SlipDocument,
    INVOICE_PAPER, SLIP_PAPER,
};

const BASE_CSS: &str = "\
body { font-family: 'Helvetica Neue', Arial, sans-serif; font-size: 10pt; margin: 0; color: #222; }
.page { box-sizing: border-box; }
.break { page-break-after: always; break-after: page; }
.shop-name { font-size: 14pt; font-weight: bold; }
.muted { color: #666; }
.doc-title { float: right; text-align: right; }
table { width: 100%; border-collapse: collapse; margin-top: 8px; }
th, td { padding: 2px 4px; text-align: left; }
td.num, th.num { text-align: right; }
tr.split td { font-size: 8pt; color: #666; padding-top: 0; }
.totals td { font-weight: bold; }
.marker { text-align: center; font-style: italic; margin-top: 8px; }
.badge { display: inline-block; border: 1px solid #222; padding: 0 4px; font-size: 8pt; }
.footer { border-top: 1px solid #999; margin-top: 8px; font-size: 8pt; }
.message { text-align: center; margin-top: 1in; }
";

// =============================================================================
// Documents
// =============================================================================

/// Renders a composed invoice, one 5in × 8in page per invoice page.
pub fn render_invoice(doc: &InvoiceDocument) -> String {
    let title = match doc.pages.first() {
        Some(page) => format!("Invoice #{}", page.header.invoice_number),
        None => "Invoice".to_string(),
    };

    let body: Vec<String> = doc
        .pages
        .iter()
        .map(|page| page_section(invoice_page(&doc.shop, page), page.is_last()))
        .collect();

    document(&title, INVOICE_PAPER, &body)
}

/// Renders measurement slips, one 5in × 5in page per slip.
pub fn render_slips(doc: &SlipDocument) -> String {
    let title = match doc.slips.first() {
        Some(slip) => format!("{} #{}", SLIP_TITLE, slip.order_number),
        None => SLIP_TITLE.to_string(),
    };

    let body: Vec<String> = doc
        .slips
        .iter()
        .map(|slip| page_section(slip_page(slip), slip.number == slip.count))
        .collect();

    document(&title, SLIP_PAPER, &body)
}

/// Renders a single page with a heading and an optional message.
pub fn render_message(paper: PaperSize, heading: &str, message: Option<&str>) -> String {
    let mut html = format!(
        "<div class=\"message\"><h2>{}</h2>",
        escape_html(heading)
    );
    if let Some(message) = message {
        html.push_str(&format!("<p class=\"muted\">{}</p>", escape_html(message)));
    }
    html.push_str("</div>");

    document(heading, paper, &[page_section(html, true)])
}

// =============================================================================
// Invoice Parts
// =============================================================================

fn invoice_page(shop: &ShopIdentity, page: &InvoicePage) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<div class=\"doc-title\"><div class=\"shop-name\">INVOICE</div>\
         <div>Invoice #{}</div><div>Date: {}</div></div>",
        page.header.invoice_number,
        escape_html(&page.header.date)
    ));
    html.push_str(&shop_header(shop));
    html.push_str(&bill_to(&page.header.bill_to));

    html.push_str(
        "<table><thead><tr><th>Item</th><th class=\"num\">Price</th>\
         <th class=\"num\">Qty</th><th class=\"num\">Amount</th></tr></thead><tbody>",
    );
    for line in &page.lines {
        html.push_str(&invoice_line(line));
    }
    html.push_str("</tbody></table>");

    if let PageClosing::Totals { totals, terms } = &page.closing {
        html.push_str(&totals_block(totals));
        html.push_str(&terms_block(terms));
    }
    if let Some(marker) = page.closing.marker() {
        html.push_str(&format!("<div class=\"marker\">{}</div>", escape_html(&marker)));
    }

    html
}

fn shop_header(shop: &ShopIdentity) -> String {
    let mut html = format!(
        "<div class=\"shop\"><div class=\"shop-name\">{}</div>",
        escape_html(&shop.name)
    );
    if let Some(tagline) = &shop.tagline {
        html.push_str(&format!("<div class=\"muted\">{}</div>", escape_html(tagline)));
    }
    for line in &shop.address_lines {
        html.push_str(&format!("<div>{}</div>", escape_html(line)));
    }
    if let Some(phone) = &shop.phone {
        html.push_str(&format!("<div>Phone: {}</div>", escape_html(phone)));
    }
    if let Some(email) = &shop.email {
        html.push_str(&format!("<div>Email: {}</div>", escape_html(email)));
    }
    html.push_str("</div>");
    html
}

fn bill_to(bill_to: &BillTo) -> String {
    let mut html = format!(
        "<div class=\"bill-to\"><strong>Bill To:</strong> {}",
        escape_html(&bill_to.name)
    );
    if let Some(phone) = &bill_to.phone {
        html.push_str(&format!("<div>{}</div>", escape_html(phone)));
    }
    if let Some(email) = &bill_to.email {
        html.push_str(&format!("<div>{}</div>", escape_html(email)));
    }
    html.push_str("</div>");
    html
}

fn invoice_line(line: &InvoiceLine) -> String {
    let mut html = format!(
        "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
         <td class=\"num\">{}</td></tr>",
        escape_html(&line.name),
        line.unit_price.to_inr(),
        line.quantity,
        line.amount.to_inr()
    );
    if let Some(split) = &line.split {
        html.push_str(&format!(
            "<tr class=\"split\"><td colspan=\"4\">Stitching: {} | Fabric: {}</td></tr>",
            split.stitching.to_inr(),
            split.fabric.to_inr()
        ));
    }
    html
}

fn totals_block(totals: &InvoiceTotals) -> String {
    format!(
        "<table class=\"totals\">\
         <tr><td>Subtotal</td><td class=\"num\">{}</td></tr>\
         <tr><td>Advance</td><td class=\"num\">{}</td></tr>\
         <tr><td>Balance Due</td><td class=\"num\">{}</td></tr></table>",
        totals.subtotal.to_inr(),
        (-totals.advance).to_inr(),
        totals.balance_due.to_inr()
    )
}

fn terms_block(terms: &InvoiceTerms) -> String {
    let mut html = String::from("<div class=\"terms\">");
    if let Some(delivery) = &terms.expected_delivery {
        html.push_str(&format!(
            "<div><strong>Expected Delivery:</strong> {}</div>",
            escape_html(delivery)
        ));
    }
    if !terms.conditions.is_empty() {
        html.push_str("<div><strong>Terms &amp; Conditions</strong></div><ol>");
        for condition in &terms.conditions {
            html.push_str(&format!("<li>{}</li>", escape_html(condition)));
        }
        html.push_str("</ol>");
    }
    html.push_str("</div>");
    html
}

// =============================================================================
// Slip Parts
// =============================================================================

fn slip_page(slip: &MeasurementSlip) -> String {
    let mut html = format!(
        "<div class=\"doc-title\"><div>Order #{}</div><div>{}</div></div>\
         <div class=\"shop-name\">{}</div>",
        slip.order_number,
        escape_html(&slip.date),
        SLIP_TITLE
    );

    html.push_str(&format!(
        "<div class=\"customer\"><div><strong>Customer:</strong> {}</div>\
         <div><strong>Delivery:</strong> {}</div>",
        escape_html(&slip.customer.name),
        escape_html(&slip.customer.delivery_date)
    ));
    if let Some(phone) = &slip.customer.phone {
        html.push_str(&format!("<div><strong>Phone:</strong> {}</div>", escape_html(phone)));
    }
    html.push_str("</div>");

    for entry in &slip.entries {
        html.push_str(&slip_entry(entry));
    }

    if let Some(marker) = slip.marker() {
        html.push_str(&format!("<div class=\"marker\">{}</div>", escape_html(&marker)));
    }
    html.push_str(&contact_footer(&slip.footer));
    html
}

fn slip_entry(entry: &SlipEntry) -> String {
    let mut html = format!("<div class=\"entry\"><h3>{}", escape_html(&entry.apparel));
    if entry.quantity > 1 {
        html.push_str(&format!(" × {}", entry.quantity));
    }
    html.push_str("</h3>");
    if entry.own_fabric {
        html.push_str(&format!("<span class=\"badge\">{}</span>", escape_html(OWN_FABRIC_BADGE)));
    }

    html.push_str("<table>");
    for line in &entry.measurements {
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
            escape_html(&line.label),
            escape_html(&line.value)
        ));
    }
    html.push_str("</table></div>");
    html
}

fn contact_footer(contact: &ShopContact) -> String {
    let mut parts = vec![escape_html(&contact.name)];
    parts.extend(contact.address_lines.iter().map(|l| escape_html(l)));
    if let Some(phone) = &contact.phone {
        parts.push(escape_html(phone));
    }
    if let Some(email) = &contact.email {
        parts.push(escape_html(email));
    }
    format!("<div class=\"footer\">{}</div>", parts.join(" · "))
}

// =============================================================================
// Page Frame
// =============================================================================

fn page_section(content: String, last: bool) -> String {
    let class = if last { "page" } else { "page break" };
    format!("<section class=\"{}\">{}</section>", class, content)
}

/// `@page` rule for a paper size.
pub fn page_rule(paper: PaperSize) -> String {
    format!(
        "@page {{ size: {}in {}in; margin: {}in; }}",
        paper.width_in, paper.height_in, paper.margin_in
    )
}

fn document(title: &str, paper: PaperSize, pages: &[String]) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>\n{}\n{}</style></head><body>\n{}\n</body></html>\n",
        escape_html(title),
        page_rule(paper),
        BASE_CSS,
        pages.join("\n")
    )
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use stitch_core::document::{compose_invoice, compose_slips, SlipOutcome};
    use stitch_core::format::DateFormatter;
    use stitch_core::{Measurements, Money, Order, OrderItem, OrderStatus, StitchingDetails};

    fn order(items: Vec<OrderItem>, advance: Money) -> Order {
        let subtotal: Money = items.iter().map(|i| i.amount()).sum();
        Order {
            id: "o1".to_string(),
            order_number: 1042,
            customer_id: String::new(),
            items,
            subtotal,
            advance,
            balance: subtotal - advance,
            delivery_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 9, 5, 6, 0, 0).unwrap(),
            status: OrderStatus::Pending,
        }
    }

    fn measured(name: &str) -> OrderItem {
        OrderItem::stitching(
            name,
            Money::from_rupees(900),
            1,
            StitchingDetails {
                apparel: name.to_string(),
                measurements: Measurements::new().with("shirtLength", "30"),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_page_rule() {
        assert_eq!(page_rule(INVOICE_PAPER), "@page { size: 5in 8in; margin: 0.25in; }");
        assert_eq!(page_rule(SLIP_PAPER), "@page { size: 5in 5in; margin: 0.25in; }");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>Shah & Sons</b> \"Suits\""),
            "&lt;b&gt;Shah &amp; Sons&lt;/b&gt; &quot;Suits&quot;"
        );
    }

    #[test]
    fn test_invoice_breaks_between_pages_only() {
        let items = (1..=13)
            .map(|n| OrderItem::stock(format!("Tie {}", n), Money::from_rupees(100), 1))
            .collect();
        let doc = compose_invoice(
            &order(items, Money::zero()),
            None,
            &ShopIdentity::default(),
            &DateFormatter::ist(),
        )
        .unwrap();

        let html = render_invoice(&doc);
        assert_eq!(html.matches("<section class=\"page break\">").count(), 1);
        assert_eq!(html.matches("<section class=\"page\">").count(), 1);
        assert_eq!(html.matches("Balance Due").count(), 1);
        assert!(html.contains("Continued on next page (Page 1 of 2)"));
        assert!(html.contains("size: 5in 8in"));
    }

    #[test]
    fn test_invoice_totals_and_bill_to() {
        let items = vec![OrderItem::stock("Sherwani", Money::from_rupees(8500), 1)];
        let doc = compose_invoice(
            &order(items, Money::from_rupees(5000)),
            None,
            &ShopIdentity::default(),
            &DateFormatter::ist(),
        )
        .unwrap();

        let html = render_invoice(&doc);
        assert!(html.contains("₹8,500.00"));
        assert!(html.contains("-₹5,000.00"));
        assert!(html.contains("₹3,500.00"));
        assert!(html.contains("<strong>Bill To:</strong> N/A"));
        assert!(html.contains("5 Sept 2026"));
        assert!(!html.contains("Expected Delivery"));
        assert!(!html.contains("class=\"page break\""));
    }

    #[test]
    fn test_slips_render() {
        let order = order(
            vec![measured("Shirt"), measured("Kurta"), measured("Blouse")],
            Money::zero(),
        );
        let doc = match compose_slips(&order, None, &ShopIdentity::default(), &DateFormatter::ist())
            .unwrap()
        {
            SlipOutcome::Slips(doc) => doc,
            SlipOutcome::NoMeasurements => panic!("expected slips"),
        };

        let html = render_slips(&doc);
        assert_eq!(html.matches("<section").count(), 2);
        assert_eq!(html.matches("class=\"page break\"").count(), 1);
        assert!(html.contains("Slip 1 of 2"));
        assert!(!html.contains("Slip 2 of 2"));
        assert!(html.contains("shirt Length"));
        assert_eq!(html.matches("class=\"footer\"").count(), 2);
        assert!(html.contains("size: 5in 5in"));
    }

    #[test]
    fn test_message_page() {
        let html = render_message(SLIP_PAPER, "Order not found", Some("Check the order id."));
        assert!(html.contains("<h2>Order not found</h2>"));
        assert!(html.contains("Check the order id."));
        assert!(!html.contains("break\""));
    }
}
