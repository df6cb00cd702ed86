//! # Domain Types
//!
//! Core domain types used throughout Booking Suite.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PricingRule    │   │    Booking      │   │  SalesInvoice   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  apply_on       │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  rate_or_disc.  │   │  customer       │   │  booking_id     │       │
//! │  │  min/max qty    │   │  start/end date │   │  posting_date   │       │
//! │  │  validity dates │   │  status, total  │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    ApplyOn      │   │ RateOrDiscount  │   │  BookingStatus  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  ItemCode       │   │  DiscountPct    │   │  Draft/Pending  │       │
//! │  │  ItemGroup      │   │  DiscountAmount │   │  Booked         │       │
//! │  └─────────────────┘   │  Rate           │   │  Available      │       │
//! │                        └─────────────────┘   │  Cancelled      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The original system carried these scopes and statuses as free strings on
//! dynamic documents; they are closed enums here so illegal states are
//! unrepresentable.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Rule Scope Enums
// =============================================================================

/// What a pricing rule targets: a specific item code or a whole item group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ApplyOn {
    /// Rule is linked to explicit item codes.
    ItemCode,
    /// Rule is linked to item groups; matches every item in the group.
    ItemGroup,
}

/// How a pricing rule adjusts the base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum RateOrDiscount {
    /// Percentage off the base rate.
    DiscountPercentage,
    /// Absolute amount off the base rate (floored at zero).
    DiscountAmount,
    /// Absolute rate override.
    Rate,
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle and time-window status of a booking.
///
/// `Draft` and `Cancelled` are lifecycle states set by user actions.
/// `Pending`, `Booked` and `Available` are derived from the booking's
/// time window once the document is submitted (see [`crate::booking::derive_status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booking is being edited, not yet submitted.
    Draft,
    /// Submitted, window has not started yet.
    Pending,
    /// Submitted, the window is currently active.
    Booked,
    /// Submitted, the window has passed.
    Available,
    /// Booking was cancelled.
    Cancelled,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Draft
    }
}

// =============================================================================
// Pricing Rule
// =============================================================================

/// A quantity-discount pricing rule.
///
/// A rule applies to one or more item codes or item groups (link tables in
/// the database, not carried on this struct) and adjusts the price-list
/// rate when its scope and validity constraints match.
///
/// ## Nullable Semantics
/// - `min_qty` / `max_qty`: `None` (or a stored `0`) means unbounded.
/// - `valid_from` / `valid_upto`: `None` means an open date bound.
/// - `company` / `customer` / `for_price_list`: `None` means "any".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PricingRule {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable rule title.
    pub title: String,

    /// Whether the rule targets item codes or item groups.
    pub apply_on: ApplyOn,

    /// Which kind of adjustment the rule carries.
    pub rate_or_discount: RateOrDiscount,

    /// Percentage off, used when `rate_or_discount` is `DiscountPercentage`.
    pub discount_percentage: f64,

    /// Absolute amount off, used when `rate_or_discount` is `DiscountAmount`.
    pub discount_amount: f64,

    /// Absolute rate override, used when `rate_or_discount` is `Rate`.
    pub rate: f64,

    /// Inclusive minimum quantity for the rule to apply.
    pub min_qty: Option<f64>,

    /// Inclusive maximum quantity for the rule to apply.
    pub max_qty: Option<f64>,

    /// First day the rule is valid.
    pub valid_from: Option<NaiveDate>,

    /// Last day the rule is valid.
    pub valid_upto: Option<NaiveDate>,

    /// Restrict the rule to one company.
    pub company: Option<String>,

    /// Restrict the rule to one customer.
    pub customer: Option<String>,

    /// Restrict the rule to one price list.
    pub for_price_list: Option<String>,

    /// Only selling rules participate in resolution.
    pub selling: bool,

    /// When the rule was created.
    pub created_at: DateTime<Utc>,

    /// When the rule was last updated.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Item Master
// =============================================================================

/// An item in the item master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Business identifier, also the primary key.
    pub item_code: String,

    /// Display name.
    pub item_name: String,

    /// Classification used by item-group pricing rules.
    pub item_group: String,

    /// Default unit of measure.
    pub stock_uom: String,

    /// Whether the item is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored base rate for an (item, price list) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemPrice {
    pub id: String,
    pub item_code: String,
    pub price_list: String,
    pub price_list_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Booking Document
// =============================================================================

/// A booking document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: String,
    pub company: String,
    pub customer: String,
    pub customer_name: Option<String>,
    pub title: Option<String>,
    pub note: Option<String>,
    pub sales_person: Option<String>,

    /// Name of the email template used for the customer notification.
    pub email_template: Option<String>,

    /// Send a notification email to the customer on submission.
    pub send_email: bool,

    /// Auto-create a sales invoice on submission.
    pub create_sales_invoice: bool,

    /// Date the booking was issued.
    pub issue_date: NaiveDate,

    /// Start of the booked time window.
    pub start_date: DateTime<Utc>,

    /// End of the booked time window.
    pub end_date: DateTime<Utc>,

    pub status: BookingStatus,

    /// Sum of line amounts.
    pub total: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item on a booking.
///
/// `discount_percentage` is a percentage of the line total (qty × rate);
/// `amount` is the discounted line total maintained by the validate-hook
/// math in [`crate::booking`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BookingItem {
    pub id: String,
    pub booking_id: String,
    pub item_code: String,
    pub item_name: String,
    pub description: Option<String>,
    pub qty: f64,
    pub uom: String,
    pub rate: f64,
    pub discount_percentage: f64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sales Invoice
// =============================================================================

/// A sales invoice auto-created from a submitted booking.
///
/// Pricing rules are ignored at invoice time: the invoice carries the
/// booking's own rates and discounts (snapshot, not a re-resolution).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesInvoice {
    pub id: String,
    pub booking_id: Option<String>,
    pub customer: String,
    pub company: String,
    pub posting_date: NaiveDate,
    pub posting_time: NaiveTime,
    pub due_date: NaiveDate,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

/// A line item on a sales invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesInvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub item_code: String,
    pub qty: f64,
    pub uom: String,
    /// Rate carried over from the booking line.
    pub price_list_rate: f64,
    pub discount_percentage: f64,
    pub amount: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_default() {
        assert_eq!(BookingStatus::default(), BookingStatus::Draft);
    }

    #[test]
    fn test_enum_serde_shapes() {
        // snake_case wire format, matching the stored representation
        assert_eq!(
            serde_json::to_value(ApplyOn::ItemGroup).unwrap(),
            serde_json::json!("item_group")
        );
        assert_eq!(
            serde_json::to_value(RateOrDiscount::DiscountPercentage).unwrap(),
            serde_json::json!("discount_percentage")
        );
        assert_eq!(
            serde_json::to_value(BookingStatus::Booked).unwrap(),
            serde_json::json!("booked")
        );
    }
}
