//! # Item Repository
//!
//! Database operations for the item master and price list entries.
//!
//! ## Key Operations
//! - Item CRUD and item-group lookup
//! - Price list upserts
//! - Base rate lookup for pricing resolution
//!
//! ## Base Rate Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where the Base Rate Comes From                       │
//! │                                                                         │
//! │  resolve request: item_code = "CHAIR-01", price_list = "Standard"      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  item_prices                                                           │
//! │  ┌──────────┬──────────┬──────────────────┐                            │
//! │  │ CHAIR-01 │ Standard │ 100.0            │ ← stored rate              │
//! │  │ CHAIR-01 │ Retail   │ 120.0            │                            │
//! │  └──────────┴──────────┴──────────────────┘                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  price_for() → Some(100.0)                                             │
//! │  (no row → None; caller falls back to the request's base rate)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use booking_core::{Item, ItemPrice};

/// Repository for item master database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let item = repo.get_by_code("CHAIR-01").await?;
/// let rate = repo.price_for("CHAIR-01", "Standard Selling").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a new item into the item master.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the item code already exists
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(item_code = %item.item_code, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (item_code, item_name, item_group, stock_uom, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.item_code)
        .bind(&item.item_name)
        .bind(&item.item_group)
        .bind(&item.stock_uom)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an item by its code.
    ///
    /// ## Errors
    /// - `NotFound` if no item has this code
    pub async fn get_by_code(&self, item_code: &str) -> DbResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT item_code, item_name, item_group, stock_uom, is_active, created_at, updated_at
            FROM items
            WHERE item_code = ?
            "#,
        )
        .bind(item_code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Item", item_code))?;

        Ok(item)
    }

    /// Returns the item group of an item, or `None` if the item is unknown.
    ///
    /// Used by pricing resolution to pull item-group rules without failing
    /// the whole request when the item master has no entry.
    pub async fn item_group_of(&self, item_code: &str) -> DbResult<Option<String>> {
        let group: Option<String> =
            sqlx::query_scalar("SELECT item_group FROM items WHERE item_code = ?")
                .bind(item_code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(group)
    }

    /// Lists active items, alphabetical by code.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT item_code, item_name, item_group, stock_uom, is_active, created_at, updated_at
            FROM items
            WHERE is_active = 1
            ORDER BY item_code
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Sets the base rate for an (item, price list) pair.
    ///
    /// Upsert: inserts a new price entry or overwrites the existing rate.
    pub async fn set_price(
        &self,
        item_code: &str,
        price_list: &str,
        price_list_rate: f64,
    ) -> DbResult<()> {
        debug!(
            item_code = %item_code,
            price_list = %price_list,
            rate = %price_list_rate,
            "Setting item price"
        );

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO item_prices (id, item_code, price_list, price_list_rate, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (item_code, price_list)
            DO UPDATE SET price_list_rate = excluded.price_list_rate,
                          updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(item_code)
        .bind(price_list)
        .bind(price_list_rate)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the stored base rate for an (item, price list) pair.
    ///
    /// ## Returns
    /// - `Some(rate)` when a price entry exists (rate may be 0)
    /// - `None` when no entry exists
    pub async fn price_for(&self, item_code: &str, price_list: &str) -> DbResult<Option<f64>> {
        let rate: Option<f64> = sqlx::query_scalar(
            "SELECT price_list_rate FROM item_prices WHERE item_code = ? AND price_list = ?",
        )
        .bind(item_code)
        .bind(price_list)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rate)
    }

    /// Lists all price entries for an item.
    pub async fn prices_of(&self, item_code: &str) -> DbResult<Vec<ItemPrice>> {
        let prices = sqlx::query_as::<_, ItemPrice>(
            r#"
            SELECT id, item_code, price_list, price_list_rate, created_at, updated_at
            FROM item_prices
            WHERE item_code = ?
            ORDER BY price_list
            "#,
        )
        .bind(item_code)
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }

    /// Counts items in the item master.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn demo_item(code: &str, group: &str) -> Item {
        let now = Utc::now();
        Item {
            item_code: code.to_string(),
            item_name: format!("{code} name"),
            item_group: group.to_string(),
            stock_uom: "Nos".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.items();

        repo.insert(&demo_item("CHAIR-01", "Furniture")).await.unwrap();

        let item = repo.get_by_code("CHAIR-01").await.unwrap();
        assert_eq!(item.item_group, "Furniture");
        assert!(item.is_active);

        let err = repo.get_by_code("MISSING").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_item_code_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.items();

        repo.insert(&demo_item("CHAIR-01", "Furniture")).await.unwrap();
        let err = repo.insert(&demo_item("CHAIR-01", "Furniture")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_item_group_of() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.items();

        repo.insert(&demo_item("DESK-01", "Furniture")).await.unwrap();

        assert_eq!(
            repo.item_group_of("DESK-01").await.unwrap(),
            Some("Furniture".to_string())
        );
        assert_eq!(repo.item_group_of("MISSING").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_price_upsert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.items();

        repo.insert(&demo_item("CHAIR-01", "Furniture")).await.unwrap();

        // No entry yet
        assert_eq!(
            repo.price_for("CHAIR-01", "Standard Selling").await.unwrap(),
            None
        );

        repo.set_price("CHAIR-01", "Standard Selling", 100.0)
            .await
            .unwrap();
        assert_eq!(
            repo.price_for("CHAIR-01", "Standard Selling").await.unwrap(),
            Some(100.0)
        );

        // Upsert overwrites
        repo.set_price("CHAIR-01", "Standard Selling", 110.0)
            .await
            .unwrap();
        assert_eq!(
            repo.price_for("CHAIR-01", "Standard Selling").await.unwrap(),
            Some(110.0)
        );

        let prices = repo.prices_of("CHAIR-01").await.unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].price_list_rate, 110.0);
    }
}
