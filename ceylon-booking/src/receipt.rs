//! Printable receipts for bookings.
//!
//! A [`Receipt`] is the neutral line-oriented layout; a [`ReceiptRenderer`]
//! turns it into a document. [`PdfReceiptRenderer`] writes a paginated A4
//! PDF using the standard Helvetica font, which needs no embedded font data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ceylon_catalog::CatalogKind;

use crate::models::{BookingRecord, ComprehensiveBooking, Schedule};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Receipt {
    pub title: String,
    pub reference: String,
    pub status: String,
    pub issued_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptLine {
    pub label: String,
    pub value: String,
}

impl ReceiptLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self { label: label.to_string(), value: value.into() }
    }
}

impl Receipt {
    pub fn for_booking(booking: &BookingRecord) -> Self {
        let mut lines = vec![
            ReceiptLine::new("Booking type", booking.kind.as_str()),
            ReceiptLine::new("Item", booking.item_name.clone()),
            ReceiptLine::new("Category", booking.item_category.clone()),
            ReceiptLine::new("Customer", booking.customer.name.clone()),
            ReceiptLine::new("Email", booking.customer.email.expose().clone()),
            ReceiptLine::new("Phone", booking.customer.phone.expose().clone()),
        ];
        match booking.schedule {
            Schedule::SingleDate { date } => lines.push(ReceiptLine::new("Date", date.to_string())),
            Schedule::DateRange { check_in, check_out } => {
                lines.push(ReceiptLine::new("Check-in", check_in.to_string()));
                lines.push(ReceiptLine::new("Check-out", check_out.to_string()));
                lines.push(ReceiptLine::new("Nights", booking.schedule.nights().to_string()));
            }
        }
        lines.push(ReceiptLine::new(booking.kind.quantity_label(), booking.quantity.to_string()));
        lines.push(ReceiptLine::new("Unit price", format_amount(booking.unit_price)));
        if let Some(requests) = &booking.special_requests {
            lines.push(ReceiptLine::new("Special requests", requests.clone()));
        }

        Self {
            title: "Ceylon Tours - Booking Receipt".to_string(),
            reference: booking.reference.clone(),
            status: booking.status.to_string(),
            issued_at: Utc::now(),
            lines,
            total: booking.total_price,
        }
    }

    pub fn for_trip(booking: &ComprehensiveBooking) -> Self {
        let mut lines = vec![
            ReceiptLine::new("Customer", booking.customer.name.clone()),
            ReceiptLine::new("Email", booking.customer.email.expose().clone()),
            ReceiptLine::new("Phone", booking.customer.phone.expose().clone()),
        ];
        for kind in CatalogKind::ALL {
            for leg in booking.legs_of(kind) {
                let value = if kind == CatalogKind::Location {
                    leg.item_name.clone()
                } else {
                    format!(
                        "{} ({} x {}) = {}",
                        leg.item_name,
                        format_amount(leg.unit_price),
                        leg.multiplier,
                        format_amount(leg.line_total)
                    )
                };
                lines.push(ReceiptLine::new(kind.as_str(), value));
            }
        }
        lines.push(ReceiptLine::new("Card", booking.payment.card_number.tail(4)));

        Self {
            title: "Ceylon Tours - Trip Receipt".to_string(),
            reference: booking.reference.clone(),
            status: booking.status.to_string(),
            issued_at: Utc::now(),
            lines,
            total: booking.total_price,
        }
    }

    /// Flattened text rows in print order.
    pub fn rows(&self) -> Vec<String> {
        let mut rows = vec![
            self.title.clone(),
            String::new(),
            format!("Reference: {}", self.reference),
            format!("Status: {}", self.status),
            format!("Issued: {}", self.issued_at.format("%Y-%m-%d %H:%M UTC")),
            String::new(),
        ];
        rows.extend(self.lines.iter().map(|line| format!("{}: {}", line.label, line.value)));
        rows.push(String::new());
        rows.push(format!("Total: {}", format_amount(self.total)));
        rows
    }
}

pub fn format_amount(amount: f64) -> String {
    format!("USD {:.2}", amount)
}

pub trait ReceiptRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn render(&self, receipt: &Receipt) -> Vec<u8>;
}

#[derive(Debug, Clone)]
pub struct PdfReceiptRenderer {
    font_size: u32,
    leading: u32,
}

impl Default for PdfReceiptRenderer {
    fn default() -> Self {
        Self { font_size: 11, leading: 16 }
    }
}

impl PdfReceiptRenderer {
    fn rows_per_page(&self) -> usize {
        (((PAGE_HEIGHT - 2 * MARGIN) / self.leading) as usize).max(1)
    }

    fn page_content(&self, rows: &[String]) -> String {
        let mut content = format!(
            "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
            self.font_size,
            self.leading,
            MARGIN,
            PAGE_HEIGHT - MARGIN
        );
        for row in rows {
            content.push_str(&format!("({}) Tj T*\n", escape_pdf_text(row)));
        }
        content.push_str("ET\n");
        content
    }
}

// A4 in points
const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 56;

impl ReceiptRenderer for PdfReceiptRenderer {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, receipt: &Receipt) -> Vec<u8> {
        let rows = receipt.rows();
        let pages: Vec<&[String]> = rows.chunks(self.rows_per_page()).collect();

        // 1: catalog, 2: page tree, 3: font, then a page and its content stream per page
        let kids: Vec<String> = (0..pages.len()).map(|i| format!("{} 0 R", 4 + 2 * i)).collect();
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids.join(" "), pages.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        for (i, page_rows) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH,
                PAGE_HEIGHT,
                5 + 2 * i
            ));
            let content = self.page_content(page_rows);
            objects.push(format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content));
        }

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
        }

        let xref_at = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        pdf.into_bytes()
    }
}

/// Escapes PDF string delimiters and replaces anything outside printable
/// ASCII, which the standard Type1 fonts cannot show.
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
