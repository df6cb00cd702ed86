//! # Validation Module
//!
//! Input validation utilities for Booking Suite.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (serde)                                         │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK constraints on enum columns                                 │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that a missing or invalid quantity is NOT a validation failure for
//! the pricing resolver - it coerces to 0 (see [`crate::pricing::coerce_qty`]).
//! A missing `item_code` or `price_list`, on the other hand, is a caller
//! contract violation and is rejected here.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an item code.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 140 characters
///
/// ## Example
/// ```rust
/// use booking_core::validation::validate_item_code;
///
/// assert!(validate_item_code("CHAIR-01").is_ok());
/// assert!(validate_item_code("").is_err());
/// ```
pub fn validate_item_code(item_code: &str) -> ValidationResult<()> {
    let item_code = item_code.trim();

    if item_code.is_empty() {
        return Err(ValidationError::Required {
            field: "item_code".to_string(),
        });
    }

    if item_code.len() > 140 {
        return Err(ValidationError::TooLong {
            field: "item_code".to_string(),
            max: 140,
        });
    }

    Ok(())
}

/// Validates a price list name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 140 characters
pub fn validate_price_list(price_list: &str) -> ValidationResult<()> {
    let price_list = price_list.trim();

    if price_list.is_empty() {
        return Err(ValidationError::Required {
            field: "price_list".to_string(),
        });
    }

    if price_list.len() > 140 {
        return Err(ValidationError::TooLong {
            field: "price_list".to_string(),
            max: 140,
        });
    }

    Ok(())
}

/// Validates a customer identifier (required on booking documents).
pub fn validate_customer(customer: &str) -> ValidationResult<()> {
    if customer.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_discount_percentage(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || pct < 0.0 || pct > 100.0 {
        return Err(ValidationError::OutOfRange {
            field: "discount_percentage".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a booking line quantity.
///
/// ## Rules
/// - Must be a finite, non-negative number
pub fn validate_line_qty(qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() || qty < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "qty".to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Window Validators
// =============================================================================

/// Validates a booking time window.
///
/// ## Rules
/// - `end` must not be before `start`
pub fn validate_booking_window(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationResult<()> {
    if end < start {
        return Err(ValidationError::InvertedWindow {
            field: "booking window".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_item_code() {
        assert!(validate_item_code("CHAIR-01").is_ok());
        assert!(validate_item_code("").is_err());
        assert!(validate_item_code("   ").is_err());
        assert!(validate_item_code(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_price_list() {
        assert!(validate_price_list("Standard Selling").is_ok());
        assert!(validate_price_list("").is_err());
    }

    #[test]
    fn test_validate_discount_percentage() {
        assert!(validate_discount_percentage(0.0).is_ok());
        assert!(validate_discount_percentage(100.0).is_ok());
        assert!(validate_discount_percentage(-1.0).is_err());
        assert!(validate_discount_percentage(101.0).is_err());
        assert!(validate_discount_percentage(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_line_qty() {
        assert!(validate_line_qty(0.0).is_ok());
        assert!(validate_line_qty(3.5).is_ok());
        assert!(validate_line_qty(-1.0).is_err());
        assert!(validate_line_qty(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_booking_window() {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 12, 17, 0, 0).unwrap();

        assert!(validate_booking_window(start, end).is_ok());
        assert!(validate_booking_window(start, start).is_ok());
        assert!(validate_booking_window(end, start).is_err());
    }
}
