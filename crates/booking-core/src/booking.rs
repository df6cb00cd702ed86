//! # Booking Math and Lifecycle
//!
//! Pure booking-document logic: line amounts, document totals, time-window
//! status derivation, and the sales-invoice snapshot built on submission.
//!
//! ## Document Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Lifecycle                                  │
//! │                                                                         │
//! │  1. CREATE (Draft)                                                     │
//! │     └── apply_amounts() + booking_total()  ← validate-hook math        │
//! │                                                                         │
//! │  2. SUBMIT                                                             │
//! │     ├── status := derive_status(start, end, now)                       │
//! │     ├── (optional) invoice_from_booking() → SalesInvoice               │
//! │     └── (optional) customer notification email                         │
//! │                                                                         │
//! │  3. REFRESH (background job)                                           │
//! │     └── derive_status() again as the window opens and closes           │
//! │                                                                         │
//! │  4. (OPTIONAL) CANCEL                                                  │
//! │     └── status := Cancelled (terminal)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::pricing::round_rate;
use crate::types::{Booking, BookingItem, BookingStatus, SalesInvoice, SalesInvoiceItem};

// =============================================================================
// Line and Document Math
// =============================================================================

/// Computes a line amount: `qty × rate` less the line's percentage discount.
///
/// ## Example
/// ```rust
/// use booking_core::booking::line_amount;
///
/// // 4 × 25.00 with 10% off = 90.00
/// assert_eq!(line_amount(4.0, 25.0, 10.0), 90.0);
/// ```
pub fn line_amount(qty: f64, rate: f64, discount_percentage: f64) -> f64 {
    let total = qty * rate;
    let discount = (discount_percentage / 100.0) * total;
    round_rate(total - discount)
}

/// Recomputes `amount` on every line (the document validate hook).
pub fn apply_amounts(items: &mut [BookingItem]) {
    for item in items.iter_mut() {
        item.amount = line_amount(item.qty, item.rate, item.discount_percentage);
    }
}

/// Sums line amounts into the document total.
pub fn booking_total(items: &[BookingItem]) -> f64 {
    round_rate(items.iter().map(|item| item.amount).sum())
}

// =============================================================================
// Status Derivation
// =============================================================================

/// Derives a submitted booking's status from its time window.
///
/// - before the window → `Pending`
/// - inside the window (inclusive both ends) → `Booked`
/// - after the window → `Available`
///
/// `Draft` and `Cancelled` are never derived; they are lifecycle states.
pub fn derive_status(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> BookingStatus {
    if now < start {
        BookingStatus::Pending
    } else if now > end {
        BookingStatus::Available
    } else {
        BookingStatus::Booked
    }
}

// =============================================================================
// Sales Invoice Snapshot
// =============================================================================

/// Builds the auto-created sales invoice for a submitted booking.
///
/// The invoice is a snapshot of the booking's own pricing: each line carries
/// the booking rate as `price_list_rate` and the booking discount
/// percentage, and no pricing-rule re-resolution happens. Posting and due
/// date are both the submission date.
pub fn invoice_from_booking(
    booking: &Booking,
    items: &[BookingItem],
    posted_at: DateTime<Utc>,
) -> (SalesInvoice, Vec<SalesInvoiceItem>) {
    let invoice_id = Uuid::new_v4().to_string();

    let lines: Vec<SalesInvoiceItem> = items
        .iter()
        .map(|item| SalesInvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.clone(),
            item_code: item.item_code.clone(),
            qty: item.qty,
            uom: item.uom.clone(),
            price_list_rate: item.rate,
            discount_percentage: item.discount_percentage,
            amount: item.amount,
        })
        .collect();

    let total = round_rate(lines.iter().map(|line| line.amount).sum());

    let invoice = SalesInvoice {
        id: invoice_id,
        booking_id: Some(booking.id.clone()),
        customer: booking.customer.clone(),
        company: booking.company.clone(),
        posting_date: posted_at.date_naive(),
        posting_time: posted_at.time(),
        due_date: posted_at.date_naive(),
        total,
        created_at: posted_at,
    };

    (invoice, lines)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn item(qty: f64, rate: f64, discount: f64) -> BookingItem {
        BookingItem {
            id: Uuid::new_v4().to_string(),
            booking_id: "bk".to_string(),
            item_code: "CHAIR-01".to_string(),
            item_name: "Folding Chair".to_string(),
            description: None,
            qty,
            uom: "Nos".to_string(),
            rate,
            discount_percentage: discount,
            amount: 0.0,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn booking() -> Booking {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        Booking {
            id: "bk-1".to_string(),
            company: "Main".to_string(),
            customer: "ACME".to_string(),
            customer_name: Some("Acme Corp".to_string()),
            title: None,
            note: None,
            sales_person: None,
            email_template: None,
            send_email: false,
            create_sales_invoice: true,
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_date: Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 6, 12, 17, 0, 0).unwrap(),
            status: BookingStatus::Draft,
            total: 0.0,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_line_amount_without_discount() {
        assert_eq!(line_amount(3.0, 50.0, 0.0), 150.0);
    }

    #[test]
    fn test_line_amount_with_discount() {
        // 10 × 20 = 200, 25% off → 150
        assert_eq!(line_amount(10.0, 20.0, 25.0), 150.0);
    }

    #[test]
    fn test_apply_amounts_and_total() {
        let mut items = vec![item(2.0, 100.0, 0.0), item(1.0, 50.0, 10.0)];
        apply_amounts(&mut items);
        assert_eq!(items[0].amount, 200.0);
        assert_eq!(items[1].amount, 45.0);
        assert_eq!(booking_total(&items), 245.0);
    }

    #[test]
    fn test_total_of_empty_booking_is_zero() {
        assert_eq!(booking_total(&[]), 0.0);
    }

    #[test]
    fn test_derive_status_boundaries() {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 12, 17, 0, 0).unwrap();

        let before = Utc.with_ymd_and_hms(2025, 6, 9, 12, 0, 0).unwrap();
        let during = Utc.with_ymd_and_hms(2025, 6, 11, 12, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 6, 13, 12, 0, 0).unwrap();

        assert_eq!(derive_status(start, end, before), BookingStatus::Pending);
        assert_eq!(derive_status(start, end, during), BookingStatus::Booked);
        assert_eq!(derive_status(start, end, after), BookingStatus::Available);

        // Window edges are occupied
        assert_eq!(derive_status(start, end, start), BookingStatus::Booked);
        assert_eq!(derive_status(start, end, end), BookingStatus::Booked);
    }

    #[test]
    fn test_invoice_snapshot_carries_booking_pricing() {
        let bk = booking();
        let mut items = vec![item(4.0, 25.0, 10.0)];
        apply_amounts(&mut items);

        let posted = Utc.with_ymd_and_hms(2025, 6, 10, 10, 30, 0).unwrap();
        let (invoice, lines) = invoice_from_booking(&bk, &items, posted);

        assert_eq!(invoice.customer, "ACME");
        assert_eq!(invoice.company, "Main");
        assert_eq!(invoice.booking_id.as_deref(), Some("bk-1"));
        assert_eq!(invoice.posting_date, posted.date_naive());
        assert_eq!(invoice.due_date, posted.date_naive());
        assert_eq!(invoice.total, 90.0);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].invoice_id, invoice.id);
        assert_eq!(lines[0].price_list_rate, 25.0);
        assert_eq!(lines[0].discount_percentage, 10.0);
        assert_eq!(lines[0].amount, 90.0);
    }
}
