//! # Seed Data Generator
//!
//! Populates the database with demo items, prices, pricing rules and
//! customers for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p booking-db --bin seed
//!
//! # Specify database path
//! cargo run -p booking-db --bin seed -- --db ./data/bookings.db
//! ```
//!
//! ## Generated Data
//! - Item master across a few rental-style groups (Furniture, AV, Catering)
//! - Base rates on the "Standard Selling" price list
//! - Quantity-discount pricing rules (item-code and item-group scoped)
//! - A couple of customers with contacts and email addresses

use chrono::{NaiveDate, Utc};
use std::env;
use uuid::Uuid;

use booking_core::{ApplyOn, Item, PricingRule, RateOrDiscount};
use booking_db::{Database, DbConfig};

/// Demo items: (code, name, group, base rate)
const ITEMS: &[(&str, &str, &str, f64)] = &[
    ("CHAIR-01", "Folding Chair", "Furniture", 5.0),
    ("CHAIR-02", "Banquet Chair", "Furniture", 8.0),
    ("TABLE-01", "Round Table 6ft", "Furniture", 25.0),
    ("TABLE-02", "Trestle Table 8ft", "Furniture", 30.0),
    ("STAGE-01", "Stage Deck 2x1m", "Furniture", 60.0),
    ("PROJ-01", "HD Projector", "AV", 120.0),
    ("SCREEN-01", "Projection Screen", "AV", 45.0),
    ("SPKR-01", "PA Speaker Pair", "AV", 90.0),
    ("MIC-01", "Wireless Microphone", "AV", 35.0),
    ("URN-01", "Hot Water Urn", "Catering", 20.0),
    ("CUTLERY-01", "Cutlery Set (50)", "Catering", 15.0),
    ("GLASS-01", "Wine Glass Crate", "Catering", 12.0),
];

const PRICE_LIST: &str = "Standard Selling";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./booking_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Booking Suite Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./booking_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Booking Suite Seed Data Generator");
    println!("====================================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing items
    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding items and prices...");

    let now = Utc::now();
    for (code, name, group, rate) in ITEMS {
        let item = Item {
            item_code: code.to_string(),
            item_name: name.to_string(),
            item_group: group.to_string(),
            stock_uom: "Nos".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.items().insert(&item).await?;
        db.items().set_price(code, PRICE_LIST, *rate).await?;
    }
    println!("  {} items on price list '{}'", ITEMS.len(), PRICE_LIST);

    println!("Seeding pricing rules...");

    // Bulk chair discount: 10% off from 20 chairs
    let chair_bulk = rule_base("Bulk chairs 10%", ApplyOn::ItemCode);
    let chair_bulk = PricingRule {
        rate_or_discount: RateOrDiscount::DiscountPercentage,
        discount_percentage: 10.0,
        min_qty: Some(20.0),
        ..chair_bulk
    };
    db.pricing_rules()
        .insert(
            &chair_bulk,
            &["CHAIR-01".to_string(), "CHAIR-02".to_string()],
            &[],
        )
        .await?;

    // Big chair orders: 15% off from 100, beats the 10% rule on min_qty
    let chair_big = rule_base("Bulk chairs 15%", ApplyOn::ItemCode);
    let chair_big = PricingRule {
        rate_or_discount: RateOrDiscount::DiscountPercentage,
        discount_percentage: 15.0,
        min_qty: Some(100.0),
        ..chair_big
    };
    db.pricing_rules()
        .insert(
            &chair_big,
            &["CHAIR-01".to_string(), "CHAIR-02".to_string()],
            &[],
        )
        .await?;

    // Whole AV group: flat 5 off per unit from 2 units
    let av_group = rule_base("AV group 5 off", ApplyOn::ItemGroup);
    let av_group = PricingRule {
        rate_or_discount: RateOrDiscount::DiscountAmount,
        discount_amount: 5.0,
        min_qty: Some(2.0),
        ..av_group
    };
    db.pricing_rules()
        .insert(&av_group, &[], &["AV".to_string()])
        .await?;

    // Seasonal projector override, only valid through summer 2025
    let proj_season = rule_base("Summer projector rate", ApplyOn::ItemCode);
    let proj_season = PricingRule {
        rate_or_discount: RateOrDiscount::Rate,
        rate: 99.0,
        valid_from: NaiveDate::from_ymd_opt(2025, 6, 1),
        valid_upto: NaiveDate::from_ymd_opt(2025, 8, 31),
        ..proj_season
    };
    db.pricing_rules()
        .insert(&proj_season, &["PROJ-01".to_string()], &[])
        .await?;

    println!("  4 pricing rules");

    println!("Seeding customers and contacts...");

    let contacts = db.contacts();
    contacts.insert_customer("CUST-001", "Jordan Lee").await?;
    let c1 = contacts
        .insert_contact("CUST-001", Some("Jordan Lee"))
        .await?;
    contacts.add_email(&c1, "jordan@example.com").await?;

    contacts
        .insert_customer("CUST-002", "Riverside Events Ltd")
        .await?;
    let c2 = contacts
        .insert_contact("CUST-002", Some("Front Desk"))
        .await?;
    contacts.add_email(&c2, "bookings@riverside.example").await?;
    contacts.add_email(&c2, "accounts@riverside.example").await?;

    println!("  2 customers with contact emails");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// A neutral selling rule with no scope restrictions; callers override the
/// adjustment fields they need.
fn rule_base(title: &str, apply_on: ApplyOn) -> PricingRule {
    let now = Utc::now();
    PricingRule {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        apply_on,
        rate_or_discount: RateOrDiscount::DiscountPercentage,
        discount_percentage: 0.0,
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
        created_at: now,
        updated_at: now,
    }
}
