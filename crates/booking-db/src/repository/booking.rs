//! # Booking Repository
//!
//! Database operations for bookings and their line items.
//!
//! ## Status Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Booking Status Transitions                          │
//! │                                                                         │
//! │   draft ──submit──▶ pending ──window opens──▶ booked                   │
//! │     │                                            │                      │
//! │     └──cancel──▶ cancelled                       └──window ends──▶     │
//! │                                                       available         │
//! │                                                                         │
//! │  pending/booked/available are derived from the time window; the        │
//! │  background refresh job re-derives them and calls update_status().     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use booking_core::{Booking, BookingItem, BookingStatus, SalesInvoice, SalesInvoiceItem};

/// Columns selected for a full `Booking` row.
const BOOKING_COLUMNS: &str = r#"
    id, company, customer, customer_name, title, note, sales_person,
    email_template, send_email, create_sales_invoice,
    issue_date, start_date, end_date, status, total,
    created_at, updated_at
"#;

/// Repository for booking database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookingRepository::new(pool);
///
/// repo.insert(&booking, &items).await?;
/// repo.update_status(&booking.id, BookingStatus::Pending).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Inserts a booking together with its line items.
    ///
    /// ## Transaction
    /// Header and lines commit atomically.
    pub async fn insert(&self, booking: &Booking, items: &[BookingItem]) -> DbResult<()> {
        debug!(
            booking_id = %booking.id,
            customer = %booking.customer,
            items = items.len(),
            "Inserting booking"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, company, customer, customer_name, title, note, sales_person,
                email_template, send_email, create_sales_invoice,
                issue_date, start_date, end_date, status, total,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.company)
        .bind(&booking.customer)
        .bind(&booking.customer_name)
        .bind(&booking.title)
        .bind(&booking.note)
        .bind(&booking.sales_person)
        .bind(&booking.email_template)
        .bind(booking.send_email)
        .bind(booking.create_sales_invoice)
        .bind(booking.issue_date)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.status)
        .bind(booking.total)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO booking_items (
                    id, booking_id, item_code, item_name, description,
                    qty, uom, rate, discount_percentage, amount, created_at
                )
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&item.booking_id)
            .bind(&item.item_code)
            .bind(&item.item_name)
            .bind(&item.description)
            .bind(item.qty)
            .bind(&item.uom)
            .bind(item.rate)
            .bind(item.discount_percentage)
            .bind(item.amount)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a booking by ID.
    ///
    /// ## Errors
    /// - `NotFound` if the booking doesn't exist
    pub async fn get_by_id(&self, id: &str) -> DbResult<Booking> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?");

        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))?;

        Ok(booking)
    }

    /// Gets the line items of a booking, in insertion order.
    pub async fn get_items(&self, booking_id: &str) -> DbResult<Vec<BookingItem>> {
        let items = sqlx::query_as::<_, BookingItem>(
            r#"
            SELECT id, booking_id, item_code, item_name, description,
                   qty, uom, rate, discount_percentage, amount, created_at
            FROM booking_items
            WHERE booking_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists bookings, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Booking>> {
        let sql =
            format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC LIMIT ?");

        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    /// Updates a booking's status.
    ///
    /// ## Errors
    /// - `NotFound` if the booking doesn't exist (guarded by rows_affected)
    pub async fn update_status(&self, id: &str, status: BookingStatus) -> DbResult<()> {
        debug!(booking_id = %id, status = ?status, "Updating booking status");

        let result = sqlx::query(
            "UPDATE bookings SET status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(chrono::Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Persists a booking submission: the new status and, when the booking
    /// auto-creates one, the sales invoice with its lines.
    ///
    /// ## Transaction
    /// Status and invoice commit atomically. If the invoice write fails the
    /// status change rolls back too, so the booking stays submittable.
    ///
    /// ## Errors
    /// - `NotFound` if the booking doesn't exist
    pub async fn submit(
        &self,
        id: &str,
        status: BookingStatus,
        invoice: Option<(&SalesInvoice, &[SalesInvoiceItem])>,
    ) -> DbResult<()> {
        debug!(
            booking_id = %id,
            status = ?status,
            with_invoice = invoice.is_some(),
            "Submitting booking"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query("UPDATE bookings SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(chrono::Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        if let Some((invoice, lines)) = invoice {
            crate::repository::invoice::insert_invoice_on(&mut tx, invoice, lines).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Updates a booking's total.
    pub async fn update_total(&self, id: &str, total: f64) -> DbResult<()> {
        let result = sqlx::query("UPDATE bookings SET total = ?, updated_at = ? WHERE id = ?")
            .bind(total)
            .bind(chrono::Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Returns submitted bookings whose derived status can still change.
    ///
    /// Only `pending` and `booked` bookings can move forward; `available`
    /// is terminal for the refresh job, and draft/cancelled never derive.
    pub async fn active_bookings(&self) -> DbResult<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status IN ('pending', 'booked') ORDER BY start_date"
        );

        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, NaiveDate, Utc};
    use uuid::Uuid;

    fn demo_booking(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4().to_string(),
            company: "Acme Rentals".to_string(),
            customer: "CUST-001".to_string(),
            customer_name: Some("Jordan Lee".to_string()),
            title: None,
            note: None,
            sales_person: None,
            email_template: None,
            send_email: false,
            create_sales_invoice: false,
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            start_date: now + Duration::hours(1),
            end_date: now + Duration::hours(5),
            status,
            total: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    fn demo_item(booking_id: &str, qty: f64, rate: f64) -> BookingItem {
        BookingItem {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            item_code: "CHAIR-01".to_string(),
            item_name: "Folding Chair".to_string(),
            description: None,
            qty,
            uom: "Nos".to_string(),
            rate,
            discount_percentage: 0.0,
            amount: qty * rate,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bookings();

        let booking = demo_booking(BookingStatus::Draft);
        let items = vec![
            demo_item(&booking.id, 10.0, 100.0),
            demo_item(&booking.id, 2.0, 50.0),
        ];
        repo.insert(&booking, &items).await.unwrap();

        let loaded = repo.get_by_id(&booking.id).await.unwrap();
        assert_eq!(loaded.status, BookingStatus::Draft);
        assert_eq!(loaded.customer, "CUST-001");

        let loaded_items = repo.get_items(&booking.id).await.unwrap();
        assert_eq!(loaded_items.len(), 2);
    }

    #[tokio::test]
    async fn test_update_status_guard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bookings();

        let booking = demo_booking(BookingStatus::Draft);
        repo.insert(&booking, &[]).await.unwrap();

        repo.update_status(&booking.id, BookingStatus::Pending)
            .await
            .unwrap();
        let loaded = repo.get_by_id(&booking.id).await.unwrap();
        assert_eq!(loaded.status, BookingStatus::Pending);

        let err = repo
            .update_status("missing-id", BookingStatus::Booked)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_active_bookings_excludes_terminal_states() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bookings();

        for status in [
            BookingStatus::Draft,
            BookingStatus::Pending,
            BookingStatus::Booked,
            BookingStatus::Available,
            BookingStatus::Cancelled,
        ] {
            repo.insert(&demo_booking(status), &[]).await.unwrap();
        }

        let active = repo.active_bookings().await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active
            .iter()
            .all(|b| matches!(b.status, BookingStatus::Pending | BookingStatus::Booked)));
    }

    fn demo_invoice_for(booking: &Booking) -> (SalesInvoice, SalesInvoiceItem) {
        let now = Utc::now();
        let invoice = SalesInvoice {
            id: Uuid::new_v4().to_string(),
            booking_id: Some(booking.id.clone()),
            customer: booking.customer.clone(),
            company: booking.company.clone(),
            posting_date: now.date_naive(),
            posting_time: now.time(),
            due_date: now.date_naive(),
            total: 1000.0,
            created_at: now,
        };
        let line = SalesInvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice.id.clone(),
            item_code: "CHAIR-01".to_string(),
            qty: 10.0,
            uom: "Nos".to_string(),
            price_list_rate: 100.0,
            discount_percentage: 0.0,
            amount: 1000.0,
        };
        (invoice, line)
    }

    #[tokio::test]
    async fn test_submit_persists_status_and_invoice() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bookings();

        let booking = demo_booking(BookingStatus::Draft);
        repo.insert(&booking, &[demo_item(&booking.id, 10.0, 100.0)])
            .await
            .unwrap();

        let (invoice, line) = demo_invoice_for(&booking);
        repo.submit(
            &booking.id,
            BookingStatus::Pending,
            Some((&invoice, std::slice::from_ref(&line))),
        )
        .await
        .unwrap();

        let loaded = repo.get_by_id(&booking.id).await.unwrap();
        assert_eq!(loaded.status, BookingStatus::Pending);

        let found = db.invoices().for_booking(&booking.id).await.unwrap();
        assert_eq!(found.map(|i| i.id), Some(invoice.id));
    }

    #[tokio::test]
    async fn test_submit_rolls_back_status_when_invoice_write_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bookings();

        let booking = demo_booking(BookingStatus::Draft);
        repo.insert(&booking, &[demo_item(&booking.id, 10.0, 100.0)])
            .await
            .unwrap();

        // Duplicate line ids violate the primary key mid-transaction
        let (invoice, line) = demo_invoice_for(&booking);
        let lines = vec![line.clone(), line];
        let err = repo
            .submit(&booking.id, BookingStatus::Pending, Some((&invoice, &lines)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // Status change rolled back with the invoice, so a retry still works
        let loaded = repo.get_by_id(&booking.id).await.unwrap();
        assert_eq!(loaded.status, BookingStatus::Draft);
        assert!(db.invoices().for_booking(&booking.id).await.unwrap().is_none());

        let (invoice, line) = demo_invoice_for(&booking);
        repo.submit(
            &booking.id,
            BookingStatus::Pending,
            Some((&invoice, std::slice::from_ref(&line))),
        )
        .await
        .unwrap();
        assert_eq!(
            repo.get_by_id(&booking.id).await.unwrap().status,
            BookingStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_update_total() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bookings();

        let booking = demo_booking(BookingStatus::Draft);
        repo.insert(&booking, &[]).await.unwrap();

        repo.update_total(&booking.id, 1234.5).await.unwrap();
        assert_eq!(repo.get_by_id(&booking.id).await.unwrap().total, 1234.5);
    }
}
