//! # Pricing Rule Resolver
//!
//! Resolves the best applicable quantity discount for an item.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Pricing Resolution Pipeline                         │
//! │                                                                         │
//! │  PricingQuery { item_code, qty, price_list, company?, customer?, ... } │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Base rate = stored item price, else caller fallback, else 0           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Filter candidates (per group):                                        │
//! │    selling ∧ price-list ∧ validity dates ∧ qty bounds                  │
//! │    ∧ company clause ∧ customer clause                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Best per group: min_qty DESC, then max_qty ASC                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Cross-group tie-break: higher min_qty wins,                           │
//! │  item-group wins an exact tie                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Apply discount (pct / amount / rate override), round to 6 decimals    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one rule is ever applied per resolution - an item-code rule and
//! an item-group rule are never blended.
//!
//! This module is pure: candidates are passed in as slices, the data layer
//! is responsible only for fetching the selling rules linked to the item
//! code and item group. All qualification happens here so there is a single
//! source of truth for the filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{PricingRule, RateOrDiscount};
use crate::RATE_PRECISION;

// =============================================================================
// Query and Result Types
// =============================================================================

/// Input to a pricing resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingQuery {
    /// Item being priced. Required.
    pub item_code: String,

    /// Requested quantity. Absent or invalid values are coerced to 0.
    pub qty: Option<f64>,

    /// Price list the base rate is looked up on. Required.
    pub price_list: String,

    /// Restricting company; when absent, company-scoped rules stay eligible.
    pub company: Option<String>,

    /// Requesting customer; when absent, only customer-agnostic rules apply.
    pub customer: Option<String>,

    /// Item classification. When absent the caller looks it up from the
    /// item master; when still unknown, item-group rules are skipped.
    pub item_group: Option<String>,

    /// Fallback base rate, used only when no stored price exists or the
    /// stored price is exactly zero.
    pub base_rate: Option<f64>,
}

/// Output of a pricing resolution. All fields are rounded to 6 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceResolution {
    /// The base rate the discount was applied to.
    pub price_list_rate: f64,

    /// Applied (or equivalent) discount percentage.
    pub discount_percentage: f64,

    /// Final rate after the chosen rule, equal to the base rate when no
    /// rule qualified.
    pub discounted_rate: f64,
}

// =============================================================================
// Input Coercion
// =============================================================================

/// Coerces a caller-supplied quantity to a non-negative finite number.
///
/// Absent, NaN, infinite or negative quantities become 0; this is a defined
/// degenerate input, not an error.
pub fn coerce_qty(qty: Option<f64>) -> f64 {
    match qty {
        Some(q) if q.is_finite() && q > 0.0 => q,
        _ => 0.0,
    }
}

/// Resolves the effective base rate.
///
/// The stored price wins unless it is absent or exactly zero, in which case
/// the caller-supplied fallback applies (defaulting to 0).
pub fn effective_base_rate(stored_price: Option<f64>, fallback: Option<f64>) -> f64 {
    match stored_price {
        Some(rate) if rate != 0.0 => rate,
        _ => fallback.unwrap_or(0.0),
    }
}

/// Rounds to [`RATE_PRECISION`] decimal places.
pub fn round_rate(value: f64) -> f64 {
    let factor = 10f64.powi(RATE_PRECISION as i32);
    (value * factor).round() / factor
}

// =============================================================================
// Candidate Qualification
// =============================================================================

/// Checks whether a rule qualifies for the given query on `today`.
///
/// ## Filter
/// - `selling` must be set.
/// - `for_price_list` is unset or equals the requested price list.
/// - `valid_from` is unset or ≤ today; `valid_upto` is unset or ≥ today.
/// - `min_qty` is unset, zero, or ≤ qty; `max_qty` is unset, zero, or ≥ qty.
/// - The company clause (`company` unset or equal) is applied only when the
///   query carries a company; without one, no company filter exists at all.
/// - With a customer on the query, the rule's customer must be unset or
///   equal; without one, only customer-agnostic rules qualify.
///
/// Linkage (`apply_on` plus the item-code / item-group association) is the
/// data layer's concern; callers pass per-group candidate slices.
pub fn rule_qualifies(rule: &PricingRule, query: &PricingQuery, qty: f64, today: NaiveDate) -> bool {
    if !rule.selling {
        return false;
    }

    if let Some(ref price_list) = rule.for_price_list {
        if *price_list != query.price_list {
            return false;
        }
    }

    if let Some(from) = rule.valid_from {
        if from > today {
            return false;
        }
    }
    if let Some(upto) = rule.valid_upto {
        if upto < today {
            return false;
        }
    }

    // A zero bound means "unbounded", same as an absent one.
    if let Some(min) = rule.min_qty {
        if min != 0.0 && min > qty {
            return false;
        }
    }
    if let Some(max) = rule.max_qty {
        if max != 0.0 && max < qty {
            return false;
        }
    }

    if let Some(ref company) = query.company {
        if let Some(ref rule_company) = rule.company {
            if rule_company != company {
                return false;
            }
        }
    }

    match (&query.customer, &rule.customer) {
        (Some(customer), Some(rule_customer)) if customer != rule_customer => return false,
        (None, Some(_)) => return false,
        _ => {}
    }

    true
}

// =============================================================================
// Selection
// =============================================================================

/// Effective minimum quantity for ordering: unset sorts as 0.
fn min_qty_key(rule: &PricingRule) -> f64 {
    rule.min_qty.unwrap_or(0.0)
}

/// Effective maximum quantity for ordering: unset (or stored 0) sorts last.
fn max_qty_key(rule: &PricingRule) -> f64 {
    match rule.max_qty {
        Some(max) if max != 0.0 => max,
        _ => f64::INFINITY,
    }
}

/// Picks the best candidate within one group.
///
/// Order: `min_qty` descending, then `max_qty` ascending - the most
/// specific minimum first, and among equals the tightest ceiling.
pub fn best_candidate<'a>(rules: &[&'a PricingRule]) -> Option<&'a PricingRule> {
    rules.iter().copied().min_by(|a, b| {
        min_qty_key(b)
            .total_cmp(&min_qty_key(a))
            .then_with(|| max_qty_key(a).total_cmp(&max_qty_key(b)))
    })
}

/// Cross-group tie-break between the item-code and item-group winners.
///
/// The candidate with the higher `min_qty` wins; on an exact tie the
/// item-group rule wins. The equal-minimum preference for the group rule
/// mirrors upstream behavior and should be confirmed with the pricing
/// owners before being changed.
fn pick_winner<'a>(
    code_best: Option<&'a PricingRule>,
    group_best: Option<&'a PricingRule>,
) -> Option<&'a PricingRule> {
    match (code_best, group_best) {
        (Some(code), Some(group)) => {
            if min_qty_key(group) >= min_qty_key(code) {
                Some(group)
            } else {
                Some(code)
            }
        }
        (Some(code), None) => Some(code),
        (None, Some(group)) => Some(group),
        (None, None) => None,
    }
}

// =============================================================================
// Discount Application
// =============================================================================

/// Applies the chosen rule's adjustment to the base rate.
fn apply_rule(rule: &PricingRule, base_rate: f64) -> (f64, f64) {
    match rule.rate_or_discount {
        RateOrDiscount::DiscountPercentage => {
            let pct = rule.discount_percentage;
            let discounted = base_rate * (1.0 - pct / 100.0);
            (pct, discounted)
        }
        RateOrDiscount::DiscountAmount => {
            // Never drive the rate below zero, no matter how large the
            // discount amount is relative to the base.
            let discounted = (base_rate - rule.discount_amount).max(0.0);
            (equivalent_percentage(base_rate, discounted), discounted)
        }
        RateOrDiscount::Rate => {
            let discounted = rule.rate;
            (equivalent_percentage(base_rate, discounted), discounted)
        }
    }
}

/// Equivalent discount percentage for an absolute adjustment.
///
/// Guarded against a zero base rate, in which case the percentage is 0.
fn equivalent_percentage(base_rate: f64, discounted_rate: f64) -> f64 {
    if base_rate == 0.0 {
        0.0
    } else {
        100.0 * (base_rate - discounted_rate) / base_rate
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves the discounted rate for a query.
///
/// `item_code_rules` and `item_group_rules` are the selling rules linked to
/// the query's item code and item group respectively; the item-group slice
/// is ignored unless the query carries an item group.
///
/// Pure and idempotent: repeated calls with identical inputs yield
/// identical output. No rule qualifying is not an error - the base rate
/// passes through with a zero discount.
pub fn resolve(
    query: &PricingQuery,
    today: NaiveDate,
    stored_price: Option<f64>,
    item_code_rules: &[PricingRule],
    item_group_rules: &[PricingRule],
) -> PriceResolution {
    let qty = coerce_qty(query.qty);
    let base_rate = effective_base_rate(stored_price, query.base_rate);

    let code_candidates: Vec<&PricingRule> = item_code_rules
        .iter()
        .filter(|rule| rule_qualifies(rule, query, qty, today))
        .collect();

    let group_candidates: Vec<&PricingRule> = if query.item_group.is_some() {
        item_group_rules
            .iter()
            .filter(|rule| rule_qualifies(rule, query, qty, today))
            .collect()
    } else {
        Vec::new()
    };

    let winner = pick_winner(
        best_candidate(&code_candidates),
        best_candidate(&group_candidates),
    );

    let (discount_percentage, discounted_rate) = match winner {
        Some(rule) => apply_rule(rule, base_rate),
        None => (0.0, base_rate),
    };

    PriceResolution {
        price_list_rate: round_rate(base_rate),
        discount_percentage: round_rate(discount_percentage),
        discounted_rate: round_rate(discounted_rate),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApplyOn;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn rule(apply_on: ApplyOn) -> PricingRule {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        PricingRule {
            id: "rule".to_string(),
            title: "Test rule".to_string(),
            apply_on,
            rate_or_discount: RateOrDiscount::DiscountPercentage,
            discount_percentage: 10.0,
            discount_amount: 0.0,
            rate: 0.0,
            min_qty: None,
            max_qty: None,
            valid_from: None,
            valid_upto: None,
            company: None,
            customer: None,
            for_price_list: None,
            selling: true,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn query(qty: f64) -> PricingQuery {
        PricingQuery {
            item_code: "CHAIR-01".to_string(),
            qty: Some(qty),
            price_list: "Standard Selling".to_string(),
            company: None,
            customer: None,
            item_group: Some("Furniture".to_string()),
            base_rate: None,
        }
    }

    #[test]
    fn test_coerce_qty() {
        assert_eq!(coerce_qty(Some(5.0)), 5.0);
        assert_eq!(coerce_qty(Some(-3.0)), 0.0);
        assert_eq!(coerce_qty(Some(f64::NAN)), 0.0);
        assert_eq!(coerce_qty(Some(f64::INFINITY)), 0.0);
        assert_eq!(coerce_qty(None), 0.0);
    }

    #[test]
    fn test_effective_base_rate_prefers_stored_price() {
        assert_eq!(effective_base_rate(Some(120.0), Some(80.0)), 120.0);
        // Zero stored price falls back
        assert_eq!(effective_base_rate(Some(0.0), Some(80.0)), 80.0);
        assert_eq!(effective_base_rate(None, Some(80.0)), 80.0);
        assert_eq!(effective_base_rate(None, None), 0.0);
    }

    #[test]
    fn test_ten_percent_rule() {
        let mut r = rule(ApplyOn::ItemCode);
        r.min_qty = Some(0.0);
        let res = resolve(&query(5.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.price_list_rate, 100.0);
        assert_eq!(res.discount_percentage, 10.0);
        assert_eq!(res.discounted_rate, 90.0);
    }

    #[test]
    fn test_no_qualifying_rule_passes_base_through() {
        let mut r = rule(ApplyOn::ItemCode);
        r.min_qty = Some(10.0);
        let res = resolve(&query(5.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.price_list_rate, 100.0);
        assert_eq!(res.discount_percentage, 0.0);
        assert_eq!(res.discounted_rate, 100.0);
    }

    #[test]
    fn test_discount_amount_floors_at_zero() {
        let mut r = rule(ApplyOn::ItemCode);
        r.rate_or_discount = RateOrDiscount::DiscountAmount;
        r.discount_amount = 150.0;
        let res = resolve(&query(1.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.price_list_rate, 100.0);
        assert_eq!(res.discount_percentage, 100.0);
        assert_eq!(res.discounted_rate, 0.0);
    }

    #[test]
    fn test_rate_override_with_zero_base_skips_percentage() {
        let mut r = rule(ApplyOn::ItemCode);
        r.rate_or_discount = RateOrDiscount::Rate;
        r.rate = 50.0;
        let res = resolve(&query(1.0), today(), None, &[r], &[]);
        assert_eq!(res.price_list_rate, 0.0);
        assert_eq!(res.discount_percentage, 0.0);
        assert_eq!(res.discounted_rate, 50.0);
    }

    #[test]
    fn test_rate_override_recomputes_equivalent_percentage() {
        let mut r = rule(ApplyOn::ItemCode);
        r.rate_or_discount = RateOrDiscount::Rate;
        r.rate = 75.0;
        let res = resolve(&query(1.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.discount_percentage, 25.0);
        assert_eq!(res.discounted_rate, 75.0);
    }

    #[test]
    fn test_higher_min_qty_wins_across_groups() {
        let mut code = rule(ApplyOn::ItemCode);
        code.id = "code".to_string();
        code.min_qty = Some(10.0);
        code.discount_percentage = 20.0;

        let mut group = rule(ApplyOn::ItemGroup);
        group.id = "group".to_string();
        group.min_qty = Some(5.0);
        group.discount_percentage = 5.0;

        let res = resolve(&query(12.0), today(), Some(100.0), &[code], &[group]);
        assert_eq!(res.discount_percentage, 20.0);
        assert_eq!(res.discounted_rate, 80.0);
    }

    #[test]
    fn test_equal_min_qty_prefers_item_group_rule() {
        let mut code = rule(ApplyOn::ItemCode);
        code.id = "code".to_string();
        code.min_qty = Some(5.0);
        code.discount_percentage = 20.0;

        let mut group = rule(ApplyOn::ItemGroup);
        group.id = "group".to_string();
        group.min_qty = Some(5.0);
        group.discount_percentage = 5.0;

        let res = resolve(&query(8.0), today(), Some(100.0), &[code], &[group]);
        assert_eq!(res.discount_percentage, 5.0);
        assert_eq!(res.discounted_rate, 95.0);
    }

    #[test]
    fn test_group_rules_skipped_without_item_group() {
        let mut group = rule(ApplyOn::ItemGroup);
        group.discount_percentage = 50.0;

        let mut q = query(5.0);
        q.item_group = None;
        let res = resolve(&q, today(), Some(100.0), &[], &[group]);
        assert_eq!(res.discounted_rate, 100.0);
    }

    #[test]
    fn test_within_group_prefers_highest_min_then_tightest_max() {
        let mut loose = rule(ApplyOn::ItemCode);
        loose.id = "loose".to_string();
        loose.min_qty = Some(5.0);
        loose.max_qty = None;
        loose.discount_percentage = 5.0;

        let mut tight = rule(ApplyOn::ItemCode);
        tight.id = "tight".to_string();
        tight.min_qty = Some(5.0);
        tight.max_qty = Some(20.0);
        tight.discount_percentage = 15.0;

        let mut low = rule(ApplyOn::ItemCode);
        low.id = "low".to_string();
        low.min_qty = Some(1.0);
        low.discount_percentage = 2.0;

        let res = resolve(
            &query(10.0),
            today(),
            Some(100.0),
            &[loose, tight, low],
            &[],
        );
        // min_qty 5 beats 1; among the two fives the bounded ceiling wins
        assert_eq!(res.discount_percentage, 15.0);
    }

    #[test]
    fn test_validity_window_filtering() {
        let mut expired = rule(ApplyOn::ItemCode);
        expired.valid_upto = NaiveDate::from_ymd_opt(2025, 6, 1);

        let mut upcoming = rule(ApplyOn::ItemCode);
        upcoming.valid_from = NaiveDate::from_ymd_opt(2025, 7, 1);

        let mut active = rule(ApplyOn::ItemCode);
        active.valid_from = NaiveDate::from_ymd_opt(2025, 6, 1);
        active.valid_upto = NaiveDate::from_ymd_opt(2025, 6, 30);
        active.discount_percentage = 7.5;

        let res = resolve(
            &query(1.0),
            today(),
            Some(100.0),
            &[expired, upcoming, active],
            &[],
        );
        assert_eq!(res.discount_percentage, 7.5);
        assert_eq!(res.discounted_rate, 92.5);
    }

    #[test]
    fn test_qty_above_max_qty_disqualifies() {
        let mut r = rule(ApplyOn::ItemCode);
        r.min_qty = Some(1.0);
        r.max_qty = Some(5.0);

        // Over the ceiling: base rate passes through untouched
        let res = resolve(&query(10.0), today(), Some(100.0), &[r.clone()], &[]);
        assert_eq!(res.discount_percentage, 0.0);
        assert_eq!(res.discounted_rate, 100.0);

        // The ceiling itself still qualifies
        let res = resolve(&query(5.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.discounted_rate, 90.0);
    }

    #[test]
    fn test_zero_max_qty_means_unbounded() {
        let mut r = rule(ApplyOn::ItemCode);
        r.max_qty = Some(0.0);
        let res = resolve(&query(1000.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.discounted_rate, 90.0);
    }

    #[test]
    fn test_customer_scoping() {
        let mut scoped = rule(ApplyOn::ItemCode);
        scoped.customer = Some("ACME".to_string());

        // No customer on the query: scoped rule is ineligible
        let res = resolve(&query(1.0), today(), Some(100.0), &[scoped.clone()], &[]);
        assert_eq!(res.discounted_rate, 100.0);

        // Matching customer qualifies
        let mut q = query(1.0);
        q.customer = Some("ACME".to_string());
        let res = resolve(&q, today(), Some(100.0), &[scoped.clone()], &[]);
        assert_eq!(res.discounted_rate, 90.0);

        // Different customer does not
        q.customer = Some("OTHER".to_string());
        let res = resolve(&q, today(), Some(100.0), &[scoped], &[]);
        assert_eq!(res.discounted_rate, 100.0);
    }

    #[test]
    fn test_company_clause_only_with_company_argument() {
        let mut scoped = rule(ApplyOn::ItemCode);
        scoped.company = Some("North Branch".to_string());

        // Without a company argument no company filter is applied at all
        let res = resolve(&query(1.0), today(), Some(100.0), &[scoped.clone()], &[]);
        assert_eq!(res.discounted_rate, 90.0);

        let mut q = query(1.0);
        q.company = Some("South Branch".to_string());
        let res = resolve(&q, today(), Some(100.0), &[scoped], &[]);
        assert_eq!(res.discounted_rate, 100.0);
    }

    #[test]
    fn test_non_selling_rule_never_qualifies() {
        let mut r = rule(ApplyOn::ItemCode);
        r.selling = false;
        let res = resolve(&query(1.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.discounted_rate, 100.0);
    }

    #[test]
    fn test_price_list_scoping() {
        let mut other_list = rule(ApplyOn::ItemCode);
        other_list.for_price_list = Some("Wholesale".to_string());
        let res = resolve(&query(1.0), today(), Some(100.0), &[other_list], &[]);
        assert_eq!(res.discounted_rate, 100.0);
    }

    #[test]
    fn test_rounding_to_six_decimals() {
        let mut r = rule(ApplyOn::ItemCode);
        r.discount_percentage = 100.0 / 3.0;
        let res = resolve(&query(1.0), today(), Some(100.0), &[r], &[]);
        assert_eq!(res.discount_percentage, 33.333333);
        assert_eq!(res.discounted_rate, 66.666667);
    }

    #[test]
    fn test_idempotence() {
        let r = rule(ApplyOn::ItemCode);
        let q = query(3.0);
        let first = resolve(&q, today(), Some(99.99), &[r.clone()], &[]);
        let second = resolve(&q, today(), Some(99.99), &[r], &[]);
        assert_eq!(first, second);
    }
}
