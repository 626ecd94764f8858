//! # Seed Data Generator
//!
//! Populates the database with customers and orders for development.
//!
//! ## Usage
//! ```bash
//! # 40 orders (default)
//! cargo run -p stitch-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p stitch-db --bin seed -- --count 200 --db ./data/stitch.db
//! ```
//!
//! ## Generated Orders
//! Each order mixes stitching lines (with measurements, some with a fabric
//! split, some on the customer's own fabric), ready-made stock and fabric by
//! the metre. Advances, delivery dates and statuses vary so the dues board
//! and both documents have something to show.

use chrono::{Duration, Utc};
use clap::Parser;
use std::path::PathBuf;
use stitch_core::ledger::OrderDraft;
use stitch_core::{Customer, Measurements, Money, OrderItem, OrderStatus, StitchingDetails};
use stitch_db::{Database, DbConfig};
use uuid::Uuid;

const CUSTOMERS: &[(&str, &str)] = &[
    ("Asha Kulkarni", "9822012345"),
    ("Ravi Menon", "9812345678"),
    ("Farhan Qureshi", "9930011223"),
    ("Meera Iyer", "8890045612"),
    ("Gurpreet Singh", "7009988776"),
    ("Lakshmi Narayanan", "9445566778"),
    ("Ankit Agarwal", "9001122334"),
    ("Sneha Patil", "9765432109"),
];

/// Garment, price in rupees, measurement fields.
const GARMENTS: &[(&str, i64, &[&str])] = &[
    ("Shirt", 900, &["chest", "waist", "shirtLength", "sleeveLength", "collar"]),
    ("Trouser", 800, &["waist", "hip", "trouserLength", "bottom"]),
    ("Kurta", 1100, &["chest", "kurtaLength", "sleeveLength", "shoulder"]),
    ("Blouse", 750, &["bust", "blouseLength", "armhole", "backNeck"]),
    ("Sherwani", 4500, &["chest", "shoulder", "sherwaniLength", "sleeveLength"]),
    ("Blazer", 3800, &["chest", "shoulder", "jacketLength", "sleeveLength"]),
];

const STOCK: &[(&str, i64)] = &[
    ("Silk Tie", 450),
    ("Leather Belt", 650),
    ("Cotton Handkerchief (Pack of 3)", 180),
    ("Pocket Square", 250),
];

const FABRICS: &[(&str, i64)] = &[
    ("Linen (per metre)", 520),
    ("Raw Silk (per metre)", 1400),
    ("Poplin Cotton (per metre)", 280),
];

/// Stitch Desk seed data generator
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Number of orders to generate
    #[arg(short, long, default_value_t = 40)]
    count: usize,

    /// Database file path
    #[arg(short, long, default_value = "./stitch_dev.db")]
    db: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Args { count, db: db_path } = Args::parse();

    println!("Stitch Desk Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path.display());
    println!("Orders:   {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");

    let existing = db.orders().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} orders", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let now = Utc::now();
    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (idx, (name, phone)) in CUSTOMERS.iter().enumerate() {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: None,
            measurements: None,
            created_at: Some(now - Duration::days(90 - idx as i64)),
        };
        db.customers().insert(&customer).await?;
        customer_ids.push(customer.id);
    }
    println!("✓ Inserted {} customers", customer_ids.len());

    let mut generated = 0;
    for seed in 0..count {
        let order_number = db.orders().next_order_number().await?;
        let customer_id = &customer_ids[seed % customer_ids.len()];
        let mut order = match generate_order(seed, customer_id) {
            Ok(draft) => draft.into_order(
                Uuid::new_v4().to_string(),
                order_number,
                now - Duration::days((count - seed) as i64 % 30),
            )?,
            Err(e) => {
                eprintln!("Skipping order {}: {}", seed, e);
                continue;
            }
        };

        order.status = [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ][seed % 5];

        if let Err(e) = db.orders().insert(&order).await {
            eprintln!("Failed to insert order #{}: {}", order.order_number, e);
            continue;
        }
        generated += 1;
    }

    println!("✓ Generated {} orders", generated);

    let dues = db.orders().list_outstanding().await?;
    println!("  Orders with dues: {}", dues.len());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one order draft. Item mix and amounts are derived from `seed`.
fn generate_order(seed: usize, customer_id: &str) -> stitch_core::CoreResult<OrderDraft> {
    let mut draft = OrderDraft::new(customer_id);

    // 1-4 stitching lines; every seventh order is large enough to paginate.
    let stitching_lines = if seed % 7 == 6 { 14 } else { 1 + seed % 4 };
    for line in 0..stitching_lines {
        let (apparel, price, fields) = GARMENTS[(seed + line) % GARMENTS.len()];
        let measurements: Measurements = fields
            .iter()
            .enumerate()
            .map(|(n, field)| (*field, format!("{}", 14 + (seed + n * 3) % 30)))
            .collect();

        let own_fabric = (seed + line) % 3 == 0;
        let fabric_price = if !own_fabric && line % 2 == 1 {
            Some(Money::from_rupees(price / 2))
        } else {
            None
        };
        let unit_price = Money::from_rupees(price) + fabric_price.unwrap_or_default();

        draft.add_item(OrderItem::stitching(
            format!("{} Stitching", apparel),
            unit_price,
            1 + (line % 2) as i64,
            StitchingDetails {
                apparel: apparel.to_string(),
                measurements,
                is_own_fabric: own_fabric,
                stitching_price: fabric_price.map(|_| Money::from_rupees(price)),
                fabric_price,
            },
        ))?;
    }

    if seed % 2 == 0 {
        let (name, price) = STOCK[seed % STOCK.len()];
        draft.add_item(OrderItem::stock(name, Money::from_rupees(price), 1))?;
    }
    if seed % 3 == 1 {
        let (name, price) = FABRICS[seed % FABRICS.len()];
        draft.add_item(OrderItem::fabric(
            name,
            Money::from_rupees(price),
            2 + (seed % 3) as i64,
        ))?;
    }

    // Advance: none, a round half, or paid in full.
    let subtotal = draft.subtotal();
    let advance = match seed % 4 {
        0 => Money::zero(),
        3 => subtotal,
        _ => Money::from_rupees(subtotal.rupees() / 200 * 100),
    };

    let mut draft = draft.with_advance(advance);
    if seed % 5 != 4 {
        draft = draft.with_delivery_date(Utc::now() + Duration::days(seed as i64 % 21 - 5));
    }

    Ok(draft)
}
