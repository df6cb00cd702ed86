//! # Pricing Resolution Endpoint
//!
//! `POST /api/pricing/resolve` — the network-callable discount resolver.
//!
//! ## Orchestration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Resolve Request Flow                                │
//! │                                                                         │
//! │  { item_code, qty, price_list, company?, customer?, base_rate? }       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate item_code / price_list                                    │
//! │  2. Stored base rate  ← item_prices (may be absent)                    │
//! │  3. Item group        ← request, else item master (may be absent)      │
//! │  4. Candidate rules   ← link tables (superset, selling only)           │
//! │  5. booking_core::pricing::resolve (pure)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { price_list_rate, discount_percentage, discounted_rate }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The endpoint is read-only. An unknown item is not an error: with no
//! stored price and no rules the base rate (or 0) passes through.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use tracing::debug;

use booking_core::pricing::{PriceResolution, PricingQuery};
use booking_core::validation::{validate_item_code, validate_price_list};

use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /api/pricing/resolve`
pub async fn resolve(
    State(state): State<AppState>,
    Json(mut query): Json<PricingQuery>,
) -> ApiResult<Json<PriceResolution>> {
    validate_item_code(&query.item_code)?;
    validate_price_list(&query.price_list)?;

    debug!(
        item_code = %query.item_code,
        price_list = %query.price_list,
        qty = ?query.qty,
        "Resolving price"
    );

    let items = state.db.items();

    let stored_price = items.price_for(&query.item_code, &query.price_list).await?;

    // Request may carry the group; otherwise look it up from the item
    // master. Unknown item → no group → item-group rules are skipped.
    if query.item_group.is_none() {
        query.item_group = items.item_group_of(&query.item_code).await?;
    }

    let rules = state.db.pricing_rules();
    let item_code_rules = rules.item_code_candidates(&query.item_code).await?;
    let item_group_rules = match &query.item_group {
        Some(group) => rules.item_group_candidates(group).await?,
        None => Vec::new(),
    };

    let resolution = booking_core::pricing::resolve(
        &query,
        Utc::now().date_naive(),
        stored_price,
        &item_code_rules,
        &item_group_rules,
    );

    Ok(Json(resolution))
}

// =============================================================================
// Unit Tests
// =============================================================================
