//! # Seed Data Generator
//!
//! Populates the database with clothing products for development.
//!
//! ## Usage
//! ```bash
//! # Generate the full sample catalog
//! cargo run -p velora-db --bin seed
//!
//! # Cap the number of products
//! cargo run -p velora-db --bin seed -- --count 50
//!
//! # Specify database path
//! cargo run -p velora-db --bin seed -- --db ./data/velora.db
//! ```
//!
//! Each product gets a UUID, a brand, a category, a price in centavos and
//! a deterministic pseudo-random stock level.

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use velora_core::Product;
use velora_db::{Database, DbConfig};

/// (brand, [product names]) pairs for realistic test data.
const BRANDS: &[(&str, &[&str])] = &[
    (
        "Levi's",
        &["Denim Jacket", "501 Jeans", "Trucker Jacket", "Denim Shorts"],
    ),
    (
        "Uniqlo",
        &["Airism Tee", "Linen Shirt", "Ultra Light Down", "Chino Pants"],
    ),
    (
        "Zara",
        &["Summer Dress", "Pleated Skirt", "Oversized Blazer", "Satin Top"],
    ),
    (
        "Penshoppe",
        &["Graphic Tee", "Relaxed Hoodie", "Jogger Pants", "Varsity Jacket"],
    ),
    (
        "Bench",
        &["Basic Polo", "Cargo Shorts", "Crewneck Sweater", "Track Pants"],
    ),
];

/// Category per product-name index above.
const CATEGORIES: &[&str] = &["jacket", "pants", "jacket", "shorts"];

/// Sizes cycled across generated products.
const SIZES: &[&str] = &["S", "M", "L", "XL"];

/// Colors cycled across generated products.
const COLORS: &[&str] = &["Black", "White", "Navy", "Red", "Olive"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX;
    let mut db_path = String::from("./velora_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(usize::MAX);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Velora Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Maximum products to generate (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./velora_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Velora Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    'outer: for (brand_idx, (brand, names)) in BRANDS.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (color_idx, color) in COLORS.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = brand_idx * 100 + name_idx * 10 + color_idx;
                let category = CATEGORIES[name_idx % CATEGORIES.len()];
                let product = generate_product(brand, name, category, color, seed);

                if let Err(e) = db.products().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;
            }
        }
    }

    println!("✓ Generated {} products", generated);

    let hits = db.products().search("denim", 10).await?;
    println!("  Search 'denim': {} results", hits.len());

    let brands = db.products().list_brands().await?;
    println!("  Brands: {}", brands.join(", "));

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(brand: &str, name: &str, category: &str, color: &str, seed: usize) -> Product {
    let now = Utc::now();

    // Price: ₱299.00 - ₱2,299.00 in ₱100 steps
    let price_cents = 29900 + ((seed * 37) % 21) as i64 * 10000;

    // Stock: 0-24, with a few deliberately out of stock
    let stock = ((seed * 13) % 25) as i64;

    Product {
        id: Uuid::new_v4().to_string(),
        name: format!("{} {}", name, color),
        brand: brand.to_string(),
        category: category.to_string(),
        description: Some(format!("{} in {} by {}", name, color, brand)),
        price_cents,
        image_url: Some(format!(
            "https://img.velora.ph/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        )),
        size: Some(SIZES[seed % SIZES.len()].to_string()),
        color: Some(color.to_string()),
        stock,
        created_at: now,
        updated_at: now,
    }
}
