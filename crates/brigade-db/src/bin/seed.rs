//! # Seed Data Generator
//!
//! Populates the database with a development menu and demo users.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p brigade-db --bin seed
//!
//! # Specify database path
//! cargo run -p brigade-db --bin seed -- --db ./data/brigade.db
//! ```
//!
//! Each menu item gets a realistic price, a starting stock level, and a
//! few get a promotional window so discount paths have data to exercise.

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

use brigade_core::{MenuItem, Role, User};
use brigade_db::{Database, DbConfig};

/// Menu sections: (category, [(name, price_cents, qty_on_hand)]).
const MENU: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "starters",
        &[
            ("Garlic Bread", 650, 40),
            ("Bruschetta", 850, 30),
            ("Calamari Fritti", 1250, 20),
            ("Caprese Salad", 1050, 25),
        ],
    ),
    (
        "mains",
        &[
            ("Margherita", 1299, 30),
            ("Carbonara", 1450, 25),
            ("Lasagne al Forno", 1550, 20),
            ("Risotto ai Funghi", 1650, 15),
            ("Bistecca", 2850, 10),
            ("Branzino", 2450, 12),
        ],
    ),
    (
        "desserts",
        &[
            ("Tiramisu", 850, 18),
            ("Panna Cotta", 750, 18),
            ("Gelato (3 scoops)", 650, 50),
        ],
    ),
    (
        "drinks",
        &[
            ("Espresso", 300, 200),
            ("San Pellegrino", 450, 80),
            ("House Red (glass)", 750, 60),
            ("House White (glass)", 750, 60),
        ],
    ),
];

/// Demo users: (id-ish name, roles).
const USERS: &[(&str, &[Role])] = &[
    ("alice", &[Role::Customer]),
    ("bob", &[Role::Customer]),
    ("carol", &[Role::Staff]),
    ("dan", &[Role::Staff, Role::Manager]),
    ("erin", &[Role::Admin]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./brigade_dev.db");

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
                println!("Brigade Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./brigade_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Brigade Seed Data Generator");
    println!("===========================");
    println!("Database: {db_path}");
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected, migrations applied");

    let existing = db.menu().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {existing} menu items");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    println!();
    println!("Seeding users...");
    for (idx, (name, roles)) in USERS.iter().enumerate() {
        let user = User {
            id: format!("user-{:03}", idx + 1),
            name: capitalize(name),
            email: format!("{name}@brigade.example"),
            roles: roles.to_vec(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.staff().insert_user(&user).await?;
    }
    println!("✓ Seeded {} users", USERS.len());

    println!();
    println!("Seeding menu...");
    let mut seeded = 0usize;
    for (category, items) in MENU {
        for (idx, (name, price_cents, qty)) in items.iter().enumerate() {
            // Every fourth item gets a week-long 15% promotion
            let on_promo = idx % 4 == 3;

            let item = MenuItem {
                id: format!("menu-{category}-{:03}", idx + 1),
                name: (*name).to_string(),
                category: (*category).to_string(),
                price_cents: *price_cents,
                qty_on_hand: *qty,
                is_active: true,
                promo_bps: on_promo.then_some(1500),
                promo_starts_at: on_promo.then_some(now),
                promo_ends_at: on_promo.then_some(now + Duration::days(7)),
                created_at: now,
                updated_at: now,
            };
            db.menu().insert(&item).await?;
            seeded += 1;
        }
    }
    println!("✓ Seeded {seeded} menu items");

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Uppercases the first letter of a name.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
