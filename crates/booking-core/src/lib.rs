//! # booking-core: Pure Business Logic for Booking Suite
//!
//! This crate is the **heart** of Booking Suite. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Suite Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       HTTP API (axum)                           │   │
//! │  │   resolve pricing ──► create booking ──► submit ──► invoice    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ booking-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │  booking  │  │ validation│  │   │
//! │  │   │PricingRule│  │  resolver │  │ line math │  │   rules   │  │   │
//! │  │   │  Booking  │  │ tie-break │  │  status   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   booking-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PricingRule, Booking, SalesInvoice, etc.)
//! - [`pricing`] - The quantity-discount pricing rule resolver
//! - [`booking`] - Booking line math, totals and status derivation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Closed Enums**: Rule scopes and statuses are enums, never free strings
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod booking;
pub mod error;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use booking_core::PricingRule` instead of
// `use booking_core::types::PricingRule`

pub use error::{CoreError, CoreResult, ValidationError};
pub use pricing::{PriceResolution, PricingQuery};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Decimal places every monetary output of the pricing resolver is rounded to.
pub const RATE_PRECISION: u32 = 6;

/// Maximum line items allowed on a single booking.
///
/// ## Business Reason
/// Prevents runaway documents and keeps invoice creation bounded.
pub const MAX_BOOKING_ITEMS: usize = 200;
