//! # Booking Endpoints
//!
//! Create, read and lifecycle operations for bookings.
//!
//! ## Submission Side Effects
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   POST /api/bookings/{id}/submit                        │
//! │                                                                         │
//! │  draft booking                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. status ← derive_status(start, end, now)                            │
//! │  2. create_sales_invoice? → invoice snapshot of the booking lines      │
//! │  3. send_email?           → notification to the customer's contacts    │
//! │                                                                         │
//! │  Invoice failure fails the submit; email failure never does.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use booking_core::booking::{apply_amounts, booking_total, derive_status, invoice_from_booking};
use booking_core::validation::{
    validate_booking_window, validate_customer, validate_discount_percentage, validate_item_code,
    validate_line_qty,
};
use booking_core::{Booking, BookingItem, BookingStatus, CoreError, MAX_BOOKING_ITEMS};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// =============================================================================
// Request / Response DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub company: String,
    pub customer: String,
    pub customer_name: Option<String>,
    pub title: Option<String>,
    pub note: Option<String>,
    pub sales_person: Option<String>,
    pub email_template: Option<String>,
    #[serde(default)]
    pub send_email: bool,
    #[serde(default)]
    pub create_sales_invoice: bool,
    pub issue_date: NaiveDate,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub items: Vec<CreateBookingItem>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingItem {
    pub item_code: String,
    /// Defaults to the item master name.
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub qty: f64,
    /// Defaults to the item master stock UOM.
    pub uom: Option<String>,
    pub rate: f64,
    #[serde(default)]
    pub discount_percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub items: Vec<BookingItem>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub items: Vec<BookingItem>,
    /// Present when submission auto-created a sales invoice.
    pub invoice_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/bookings` — creates a draft booking.
///
/// Line amounts and the booking total are computed server-side from
/// qty, rate and discount (the validate-hook math); client-sent amounts
/// are never trusted.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    validate_customer(&req.customer)?;
    validate_booking_window(req.start_date, req.end_date)?;

    if req.items.len() > MAX_BOOKING_ITEMS {
        return Err(CoreError::TooManyItems {
            max: MAX_BOOKING_ITEMS,
        }
        .into());
    }

    let now = Utc::now();
    let booking_id = Uuid::new_v4().to_string();
    let items_repo = state.db.items();

    let mut items = Vec::with_capacity(req.items.len());
    for line in &req.items {
        validate_item_code(&line.item_code)?;
        validate_line_qty(line.qty)?;
        validate_discount_percentage(line.discount_percentage)?;

        let master = items_repo
            .get_by_code(&line.item_code)
            .await
            .map_err(|_| CoreError::ItemNotFound(line.item_code.clone()))?;

        items.push(BookingItem {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.clone(),
            item_code: line.item_code.clone(),
            item_name: line.item_name.clone().unwrap_or(master.item_name),
            description: line.description.clone(),
            qty: line.qty,
            uom: line.uom.clone().unwrap_or(master.stock_uom),
            rate: line.rate,
            discount_percentage: line.discount_percentage,
            amount: 0.0,
            created_at: now,
        });
    }

    apply_amounts(&mut items);
    let total = booking_total(&items);

    let booking = Booking {
        id: booking_id,
        company: req.company,
        customer: req.customer,
        customer_name: req.customer_name,
        title: req.title,
        note: req.note,
        sales_person: req.sales_person,
        email_template: req.email_template,
        send_email: req.send_email,
        create_sales_invoice: req.create_sales_invoice,
        issue_date: req.issue_date,
        start_date: req.start_date,
        end_date: req.end_date,
        status: BookingStatus::Draft,
        total,
        created_at: now,
        updated_at: now,
    };

    state.db.bookings().insert(&booking, &items).await?;

    info!(booking_id = %booking.id, customer = %booking.customer, "Booking created");

    Ok(Json(BookingResponse { booking, items }))
}

/// `GET /api/bookings/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingResponse>> {
    let booking = state.db.bookings().get_by_id(&id).await?;
    let items = state.db.bookings().get_items(&id).await?;

    Ok(Json(BookingResponse { booking, items }))
}

/// `GET /api/bookings`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Booking>>> {
    let bookings = state.db.bookings().list(params.limit).await?;
    Ok(Json(bookings))
}

/// `POST /api/bookings/{id}/submit`
///
/// Moves a draft booking into its derived time-window status, then runs
/// the submission side effects: sales invoice (when enabled, failure
/// aborts) and customer notification email (when enabled, failure only
/// warns).
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubmitResponse>> {
    let bookings = state.db.bookings();
    let booking = bookings.get_by_id(&id).await?;

    if booking.status != BookingStatus::Draft {
        return Err(CoreError::InvalidBookingStatus {
            booking_id: id,
            current_status: booking.status,
        }
        .into());
    }

    let items = bookings.get_items(&id).await?;
    if items.is_empty() {
        return Err(CoreError::EmptyBooking(id).into());
    }

    let now = Utc::now();
    let status = derive_status(booking.start_date, booking.end_date, now);

    let invoice = booking
        .create_sales_invoice
        .then(|| invoice_from_booking(&booking, &items, now));

    // Status and invoice commit in one transaction; a failed invoice write
    // leaves the booking in draft, so it can be resubmitted.
    bookings
        .submit(
            &id,
            status,
            invoice.as_ref().map(|(inv, lines)| (inv, lines.as_slice())),
        )
        .await?;

    let invoice_id = invoice.map(|(inv, _)| {
        info!(booking_id = %id, invoice_id = %inv.id, "Sales invoice auto-created");
        inv.id
    });

    if booking.send_email {
        let recipients = state
            .db
            .contacts()
            .emails_for_customer(&booking.customer)
            .await?;
        state
            .mailer
            .notify_booking(&booking, &items, &recipients)
            .await;
    }

    let booking = bookings.get_by_id(&id).await?;
    info!(booking_id = %id, status = ?booking.status, "Booking submitted");

    Ok(Json(SubmitResponse {
        booking,
        items,
        invoice_id,
    }))
}

/// `POST /api/bookings/{id}/cancel`
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Booking>> {
    let bookings = state.db.bookings();
    let booking = bookings.get_by_id(&id).await?;

    if booking.status == BookingStatus::Cancelled {
        return Err(ApiError::Conflict(format!(
            "Booking {id} is already cancelled"
        )));
    }

    bookings.update_status(&id, BookingStatus::Cancelled).await?;
    let booking = bookings.get_by_id(&id).await?;

    info!(booking_id = %id, "Booking cancelled");

    Ok(Json(booking))
}

// =============================================================================
// Unit Tests
// =============================================================================
