//! # Booking Status Refresh Job
//!
//! Periodic in-process job that re-derives the time-window status of
//! submitted bookings and persists any change.
//!
//! ## Why A Job
//! `pending`, `booked` and `available` are functions of the clock, not of
//! user actions. The list view reads the stored status, so something has to
//! move bookings forward as their windows open and close.
//!
//! ## Loop Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Status Refresh Loop                                 │
//! │                                                                         │
//! │  every STATUS_REFRESH_INTERVAL_SECS:                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fetch bookings WHERE status IN (pending, booked)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  derive_status(start, end, now) per booking                            │
//! │       │                                                                 │
//! │       ├── unchanged → nothing                                          │
//! │       └── changed   → update_status()                                  │
//! │                                                                         │
//! │  shutdown channel flips → loop exits cleanly                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use booking_core::booking::derive_status;
use booking_db::{Database, DbResult};

/// Runs one refresh pass, returning how many bookings changed status.
pub async fn refresh_once(db: &Database) -> DbResult<usize> {
    let now = Utc::now();
    let active = db.bookings().active_bookings().await?;

    let mut changed = 0;
    for booking in &active {
        let derived = derive_status(booking.start_date, booking.end_date, now);
        if derived != booking.status {
            db.bookings().update_status(&booking.id, derived).await?;
            debug!(
                booking_id = %booking.id,
                from = ?booking.status,
                to = ?derived,
                "Booking status advanced"
            );
            changed += 1;
        }
    }

    Ok(changed)
}

/// Spawns the refresh loop.
///
/// The loop ticks every `interval_secs` and exits when the shutdown channel
/// flips to `true`. A failed pass is logged and retried on the next tick.
pub fn spawn(
    db: Database,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs, "Status refresh job started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match refresh_once(&db).await {
                        Ok(0) => debug!("Status refresh pass: no changes"),
                        Ok(changed) => info!(changed, "Status refresh pass complete"),
                        Err(e) => warn!(error = %e, "Status refresh pass failed"),
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Status refresh job shutting down");
                        break;
                    }
                }
            }
        }
    })
}
