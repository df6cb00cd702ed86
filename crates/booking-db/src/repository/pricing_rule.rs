//! # Pricing Rule Repository
//!
//! Database operations for pricing rules and their item/group link tables.
//!
//! ## Candidate Fetching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Candidate Fetch vs. Rule Qualification                     │
//! │                                                                         │
//! │  SQL narrows to a SUPERSET of the qualifying rules:                    │
//! │                                                                         │
//! │    selling = 1                                                          │
//! │    apply_on = 'item_code' (or 'item_group')                             │
//! │    link table joins the requested item code / group                     │
//! │                                                                         │
//! │  Everything else (validity window, qty bounds, company, customer,      │
//! │  price list) is judged in booking-core::pricing::rule_qualifies so     │
//! │  the full contract stays purely unit-testable.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use booking_core::PricingRule;

/// Columns selected for a full `PricingRule` row.
const RULE_COLUMNS: &str = r#"
    r.id, r.title, r.apply_on, r.rate_or_discount,
    r.discount_percentage, r.discount_amount, r.rate,
    r.min_qty, r.max_qty, r.valid_from, r.valid_upto,
    r.company, r.customer, r.for_price_list, r.selling,
    r.created_at, r.updated_at
"#;

/// Repository for pricing rule database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = PricingRuleRepository::new(pool);
///
/// repo.insert(&rule, &["CHAIR-01".into()], &[]).await?;
/// let candidates = repo.item_code_candidates("CHAIR-01").await?;
/// ```
#[derive(Debug, Clone)]
pub struct PricingRuleRepository {
    pool: SqlitePool,
}

impl PricingRuleRepository {
    /// Creates a new PricingRuleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PricingRuleRepository { pool }
    }

    /// Inserts a pricing rule together with its item-code and item-group links.
    ///
    /// ## Transaction
    /// The rule row and all link rows commit atomically; a partial rule with
    /// missing links never becomes visible.
    pub async fn insert(
        &self,
        rule: &PricingRule,
        item_codes: &[String],
        item_groups: &[String],
    ) -> DbResult<()> {
        debug!(
            rule_id = %rule.id,
            title = %rule.title,
            codes = item_codes.len(),
            groups = item_groups.len(),
            "Inserting pricing rule"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO pricing_rules (
                id, title, apply_on, rate_or_discount,
                discount_percentage, discount_amount, rate,
                min_qty, max_qty, valid_from, valid_upto,
                company, customer, for_price_list, selling,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rule.id)
        .bind(&rule.title)
        .bind(rule.apply_on)
        .bind(rule.rate_or_discount)
        .bind(rule.discount_percentage)
        .bind(rule.discount_amount)
        .bind(rule.rate)
        .bind(rule.min_qty)
        .bind(rule.max_qty)
        .bind(rule.valid_from)
        .bind(rule.valid_upto)
        .bind(&rule.company)
        .bind(&rule.customer)
        .bind(&rule.for_price_list)
        .bind(rule.selling)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(&mut *tx)
        .await?;

        for item_code in item_codes {
            sqlx::query(
                "INSERT INTO pricing_rule_item_codes (pricing_rule_id, item_code) VALUES (?, ?)",
            )
            .bind(&rule.id)
            .bind(item_code)
            .execute(&mut *tx)
            .await?;
        }

        for item_group in item_groups {
            sqlx::query(
                "INSERT INTO pricing_rule_item_groups (pricing_rule_id, item_group) VALUES (?, ?)",
            )
            .bind(&rule.id)
            .bind(item_group)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }

    /// Gets a pricing rule by ID.
    ///
    /// ## Errors
    /// - `NotFound` if the rule doesn't exist
    pub async fn get_by_id(&self, id: &str) -> DbResult<PricingRule> {
        let sql = format!("SELECT {RULE_COLUMNS} FROM pricing_rules r WHERE r.id = ?");

        let rule = sqlx::query_as::<_, PricingRule>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Pricing rule", id))?;

        Ok(rule)
    }

    /// Lists all pricing rules, newest first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<PricingRule>> {
        let sql = format!(
            "SELECT {RULE_COLUMNS} FROM pricing_rules r ORDER BY r.created_at DESC LIMIT ?"
        );

        let rules = sqlx::query_as::<_, PricingRule>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rules)
    }

    /// Deletes a pricing rule (link rows cascade).
    ///
    /// ## Errors
    /// - `NotFound` if the rule doesn't exist
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM pricing_rules WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Pricing rule", id));
        }

        Ok(())
    }

    /// Fetches selling rules linked to an item code.
    ///
    /// Returns a superset of the qualifying rules; the caller runs each
    /// candidate through `booking_core::pricing::rule_qualifies`.
    pub async fn item_code_candidates(&self, item_code: &str) -> DbResult<Vec<PricingRule>> {
        debug!(item_code = %item_code, "Fetching item-code rule candidates");

        let sql = format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM pricing_rules r
            JOIN pricing_rule_item_codes l ON l.pricing_rule_id = r.id
            WHERE r.selling = 1
              AND r.apply_on = 'item_code'
              AND l.item_code = ?
            "#
        );

        let rules = sqlx::query_as::<_, PricingRule>(&sql)
            .bind(item_code)
            .fetch_all(&self.pool)
            .await?;

        Ok(rules)
    }

    /// Fetches selling rules linked to an item group.
    pub async fn item_group_candidates(&self, item_group: &str) -> DbResult<Vec<PricingRule>> {
        debug!(item_group = %item_group, "Fetching item-group rule candidates");

        let sql = format!(
            r#"
            SELECT {RULE_COLUMNS}
            FROM pricing_rules r
            JOIN pricing_rule_item_groups l ON l.pricing_rule_id = r.id
            WHERE r.selling = 1
              AND r.apply_on = 'item_group'
              AND l.item_group = ?
            "#
        );

        let rules = sqlx::query_as::<_, PricingRule>(&sql)
            .bind(item_group)
            .fetch_all(&self.pool)
            .await?;

        Ok(rules)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use booking_core::{ApplyOn, RateOrDiscount};
    use chrono::Utc;
    use uuid::Uuid;

    fn demo_rule(title: &str, apply_on: ApplyOn) -> PricingRule {
        let now = Utc::now();
        PricingRule {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            apply_on,
            rate_or_discount: RateOrDiscount::DiscountPercentage,
            discount_percentage: 10.0,
            discount_amount: 0.0,
            rate: 0.0,
            min_qty: Some(5.0),
            max_qty: None,
            valid_from: None,
            valid_upto: None,
            company: None,
            customer: None,
            for_price_list: None,
            selling: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.pricing_rules();

        let rule = demo_rule("10% off chairs", ApplyOn::ItemCode);
        repo.insert(&rule, &["CHAIR-01".to_string()], &[])
            .await
            .unwrap();

        let loaded = repo.get_by_id(&rule.id).await.unwrap();
        assert_eq!(loaded.title, "10% off chairs");
        assert_eq!(loaded.apply_on, ApplyOn::ItemCode);
        assert_eq!(loaded.min_qty, Some(5.0));
        assert_eq!(loaded.max_qty, None);
        assert!(loaded.selling);
    }

    #[tokio::test]
    async fn test_item_code_candidates_filter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.pricing_rules();

        let linked = demo_rule("linked", ApplyOn::ItemCode);
        repo.insert(&linked, &["CHAIR-01".to_string()], &[])
            .await
            .unwrap();

        let other_item = demo_rule("other item", ApplyOn::ItemCode);
        repo.insert(&other_item, &["DESK-01".to_string()], &[])
            .await
            .unwrap();

        let mut buying = demo_rule("buying rule", ApplyOn::ItemCode);
        buying.selling = false;
        repo.insert(&buying, &["CHAIR-01".to_string()], &[])
            .await
            .unwrap();

        let candidates = repo.item_code_candidates("CHAIR-01").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, linked.id);
    }

    #[tokio::test]
    async fn test_item_group_candidates() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.pricing_rules();

        let group_rule = demo_rule("furniture deal", ApplyOn::ItemGroup);
        repo.insert(&group_rule, &[], &["Furniture".to_string()])
            .await
            .unwrap();

        // Item-code rule must never surface as a group candidate
        let code_rule = demo_rule("chair deal", ApplyOn::ItemCode);
        repo.insert(&code_rule, &["CHAIR-01".to_string()], &[])
            .await
            .unwrap();

        let candidates = repo.item_group_candidates("Furniture").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, group_rule.id);

        assert!(repo.item_group_candidates("Electronics").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_links() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.pricing_rules();

        let rule = demo_rule("temp", ApplyOn::ItemCode);
        repo.insert(&rule, &["CHAIR-01".to_string()], &[])
            .await
            .unwrap();

        repo.delete(&rule.id).await.unwrap();
        assert!(repo.item_code_candidates("CHAIR-01").await.unwrap().is_empty());

        let err = repo.delete(&rule.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
