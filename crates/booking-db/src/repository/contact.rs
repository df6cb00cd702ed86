//! # Contact Repository
//!
//! Database operations for customers, contacts and their email addresses.
//!
//! ## Email Lookup Walk
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Customer → Contact → Email Walk                           │
//! │                                                                         │
//! │  customers ──┐                                                         │
//! │              │ customer_id                                              │
//! │              ▼                                                          │
//! │  contacts ───┐                                                         │
//! │              │ contact_id                                               │
//! │              ▼                                                          │
//! │  contact_emails → [alex@example.com, billing@example.com]              │
//! │                                                                         │
//! │  Used by the notification mailer: a customer with zero addresses       │
//! │  simply gets no email (not an error).                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// Repository for customer contact database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ContactRepository::new(pool);
///
/// let recipients = repo.emails_for_customer("CUST-001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    /// Creates a new ContactRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ContactRepository { pool }
    }

    /// Inserts a customer.
    pub async fn insert_customer(&self, id: &str, customer_name: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO customers (id, customer_name, created_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(customer_name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Inserts a contact for a customer, returning the new contact ID.
    pub async fn insert_contact(
        &self,
        customer_id: &str,
        contact_name: Option<&str>,
    ) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO contacts (id, customer_id, contact_name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(customer_id)
        .bind(contact_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Adds an email address to a contact.
    pub async fn add_email(&self, contact_id: &str, email: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO contact_emails (id, contact_id, email_id) VALUES (?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(contact_id)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns every email address reachable from a customer's contacts.
    ///
    /// An unknown customer or a customer without contacts yields an empty
    /// list; callers decide whether that is worth a warning.
    pub async fn emails_for_customer(&self, customer_id: &str) -> DbResult<Vec<String>> {
        debug!(customer_id = %customer_id, "Collecting contact emails");

        let emails: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT e.email_id
            FROM contacts c
            JOIN contact_emails e ON e.contact_id = c.id
            WHERE c.customer_id = ?
            ORDER BY e.email_id
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(emails)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
