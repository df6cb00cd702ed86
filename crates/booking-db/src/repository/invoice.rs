//! # Invoice Repository
//!
//! Database operations for sales invoices auto-created from submitted
//! bookings. The invoice is a snapshot of the booking's lines; pricing
//! rules are never re-resolved at invoice time.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use booking_core::{SalesInvoice, SalesInvoiceItem};

/// Writes an invoice header and its lines on an existing connection.
///
/// Used both by [`InvoiceRepository::insert`] and by the booking submit
/// transaction, which must commit the status change and the invoice
/// atomically.
pub(crate) async fn insert_invoice_on(
    conn: &mut SqliteConnection,
    invoice: &SalesInvoice,
    items: &[SalesInvoiceItem],
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sales_invoices (
            id, booking_id, customer, company,
            posting_date, posting_time, due_date, total, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&invoice.id)
    .bind(&invoice.booking_id)
    .bind(&invoice.customer)
    .bind(&invoice.company)
    .bind(invoice.posting_date)
    .bind(invoice.posting_time)
    .bind(invoice.due_date)
    .bind(invoice.total)
    .bind(invoice.created_at)
    .execute(&mut *conn)
    .await?;

    for item in items {
        sqlx::query(
            r#"
            INSERT INTO sales_invoice_items (
                id, invoice_id, item_code, qty, uom,
                price_list_rate, discount_percentage, amount
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.invoice_id)
        .bind(&item.item_code)
        .bind(item.qty)
        .bind(&item.uom)
        .bind(item.price_list_rate)
        .bind(item.discount_percentage)
        .bind(item.amount)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Columns selected for a full `SalesInvoice` row.
const INVOICE_COLUMNS: &str = r#"
    id, booking_id, customer, company,
    posting_date, posting_time, due_date, total, created_at
"#;

/// Repository for sales invoice database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = InvoiceRepository::new(pool);
///
/// repo.insert(&invoice, &lines).await?;
/// let history = repo.list_for_customer("CUST-001", 20).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Inserts a sales invoice together with its line items.
    ///
    /// ## Transaction
    /// Header and lines commit atomically.
    pub async fn insert(&self, invoice: &SalesInvoice, items: &[SalesInvoiceItem]) -> DbResult<()> {
        debug!(
            invoice_id = %invoice.id,
            customer = %invoice.customer,
            items = items.len(),
            "Inserting sales invoice"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        insert_invoice_on(&mut tx, invoice, items).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a sales invoice by ID.
    ///
    /// ## Errors
    /// - `NotFound` if the invoice doesn't exist
    pub async fn get_by_id(&self, id: &str) -> DbResult<SalesInvoice> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM sales_invoices WHERE id = ?");

        let invoice = sqlx::query_as::<_, SalesInvoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Sales invoice", id))?;

        Ok(invoice)
    }

    /// Gets the line items of a sales invoice.
    pub async fn items_of(&self, invoice_id: &str) -> DbResult<Vec<SalesInvoiceItem>> {
        let items = sqlx::query_as::<_, SalesInvoiceItem>(
            r#"
            SELECT id, invoice_id, item_code, qty, uom,
                   price_list_rate, discount_percentage, amount
            FROM sales_invoice_items
            WHERE invoice_id = ?
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Returns the invoice created from a booking, if any.
    pub async fn for_booking(&self, booking_id: &str) -> DbResult<Option<SalesInvoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM sales_invoices WHERE booking_id = ?");

        let invoice = sqlx::query_as::<_, SalesInvoice>(&sql)
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    /// Lists invoices for a customer, newest first.
    pub async fn list_for_customer(
        &self,
        customer: &str,
        limit: u32,
    ) -> DbResult<Vec<SalesInvoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM sales_invoices WHERE customer = ? ORDER BY created_at DESC LIMIT ?"
        );

        let invoices = sqlx::query_as::<_, SalesInvoice>(&sql)
            .bind(customer)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(invoices)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use uuid::Uuid;

    fn demo_invoice(customer: &str) -> SalesInvoice {
        SalesInvoice {
            id: Uuid::new_v4().to_string(),
            booking_id: None,
            customer: customer.to_string(),
            company: "Acme Rentals".to_string(),
            posting_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            posting_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            total: 900.0,
            created_at: Utc::now(),
        }
    }

    fn demo_line(invoice_id: &str) -> SalesInvoiceItem {
        SalesInvoiceItem {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            item_code: "CHAIR-01".to_string(),
            qty: 10.0,
            uom: "Nos".to_string(),
            price_list_rate: 100.0,
            discount_percentage: 10.0,
            amount: 900.0,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_with_lines() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        let invoice = demo_invoice("CUST-001");
        let lines = vec![demo_line(&invoice.id)];
        repo.insert(&invoice, &lines).await.unwrap();

        let loaded = repo.get_by_id(&invoice.id).await.unwrap();
        assert_eq!(loaded.total, 900.0);
        assert_eq!(loaded.posting_time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());

        let loaded_lines = repo.items_of(&invoice.id).await.unwrap();
        assert_eq!(loaded_lines.len(), 1);
        assert_eq!(loaded_lines[0].price_list_rate, 100.0);
    }

    #[tokio::test]
    async fn test_list_for_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.invoices();

        repo.insert(&demo_invoice("CUST-001"), &[]).await.unwrap();
        repo.insert(&demo_invoice("CUST-001"), &[]).await.unwrap();
        repo.insert(&demo_invoice("CUST-002"), &[]).await.unwrap();

        let invoices = repo.list_for_customer("CUST-001", 20).await.unwrap();
        assert_eq!(invoices.len(), 2);
    }

    #[tokio::test]
    async fn test_for_booking() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Invoice rows may reference a booking; create one to satisfy the FK
        let booking = {
            use booking_core::{Booking, BookingStatus};
            let now = Utc::now();
            Booking {
                id: Uuid::new_v4().to_string(),
                company: "Acme Rentals".to_string(),
                customer: "CUST-001".to_string(),
                customer_name: None,
                title: None,
                note: None,
                sales_person: None,
                email_template: None,
                send_email: false,
                create_sales_invoice: true,
                issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                start_date: now,
                end_date: now,
                status: BookingStatus::Pending,
                total: 0.0,
                created_at: now,
                updated_at: now,
            }
        };
        db.bookings().insert(&booking, &[]).await.unwrap();

        let repo = db.invoices();
        let mut invoice = demo_invoice("CUST-001");
        invoice.booking_id = Some(booking.id.clone());
        repo.insert(&invoice, &[]).await.unwrap();

        let found = repo.for_booking(&booking.id).await.unwrap();
        assert_eq!(found.map(|i| i.id), Some(invoice.id));

        assert!(repo.for_booking("missing").await.unwrap().is_none());
    }
}
