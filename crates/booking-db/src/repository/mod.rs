//! # Repository Module
//!
//! Database repository implementations for Booking Suite.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  db.pricing_rules().item_code_candidates("CHAIR-01")           │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  PricingRuleRepository                                                 │
//! │  ├── item_code_candidates(&self, item_code)                            │
//! │  ├── item_group_candidates(&self, item_group)                          │
//! │  ├── insert(&self, rule, codes, groups)                                │
//! │  └── get_by_id(&self, id)                                              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory SQLite per test)                            │
//! │  • SQL is isolated in one place                                        │
//! │  • Rule qualification stays in booking-core, SQL only narrows          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`] - Item master and item prices
//! - [`PricingRuleRepository`] - Pricing rules and their item/group links
//! - [`BookingRepository`] - Bookings and booking line items
//! - [`InvoiceRepository`] - Sales invoices generated from bookings
//! - [`ContactRepository`] - Customer contacts and email addresses

pub mod booking;
pub mod contact;
pub mod invoice;
pub mod item;
pub mod pricing_rule;

pub use booking::BookingRepository;
pub use contact::ContactRepository;
pub use invoice::InvoiceRepository;
pub use item::ItemRepository;
pub use pricing_rule::PricingRuleRepository;
