//! Background services and side-effect helpers.
//!
//! - [`mailer`] - SMTP notification emails for submitted bookings
//! - [`status_refresh`] - periodic booking status derivation job

pub mod mailer;
pub mod status_refresh;
