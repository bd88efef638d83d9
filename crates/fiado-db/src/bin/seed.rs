//! # Seed Data Generator
//!
//! Populates the database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Default database path (./fiado_dev.db)
//! cargo run -p fiado-db --bin seed
//!
//! # Specify database path
//! cargo run -p fiado-db --bin seed -- --db ./data/fiado.db
//! ```
//!
//! ## What Gets Seeded
//! - A corner-shop catalog, stocked through the stock ledger so the
//!   movement audit trail is complete from the first row
//! - A handful of named clients (the walk-in client comes from the
//!   migration itself)
//! - One demo credit sale with a deposit, plus one abono, so the debt
//!   reports have something to show

use chrono::Utc;
use std::env;
use uuid::Uuid;

use fiado_core::{
    Client, CreateSaleInput, PaymentMethod, PaymentTerms, Product, RegisterPaymentInput,
    SaleLineInput,
};
use fiado_db::{Database, DbConfig};

/// Demo catalog: (name, cost_cents, price_cents, initial_stock)
const CATALOG: &[(&str, i64, i64, i64)] = &[
    ("Leche Entera 1L", 1500, 2200, 40),
    ("Coca-Cola 600ml", 900, 1500, 60),
    ("Pan Blanco", 1800, 2800, 25),
    ("Arroz 1kg", 2400, 3500, 50),
    ("Frijol 500g", 1900, 2900, 35),
    ("Aceite 900ml", 3800, 5500, 20),
    ("Azucar 1kg", 1600, 2400, 45),
    ("Huevos 12pz", 2600, 3800, 30),
    ("Jabon de Bano", 800, 1400, 55),
    ("Papel Higienico 4pz", 2100, 3200, 28),
    ("Cafe Soluble 200g", 5200, 7800, 15),
    ("Galletas Maria", 700, 1200, 70),
];

/// Demo clients: (name, phone)
const CLIENTS: &[(&str, &str)] = &[
    ("Maria Lopez", "555-0101"),
    ("Jorge Ramirez", "555-0102"),
    ("Ana Torres", "555-0103"),
    ("Luis Hernandez", "555-0104"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./fiado_dev.db");

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
                println!("Fiado POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fiado_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Fiado POS Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("* Connected to database");
    println!("* Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("! Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Products: insert with zero stock, then stock up through the ledger so
    // every unit on hand is covered by a movement row.
    println!();
    println!("Seeding products...");
    let now = Utc::now();
    let mut product_ids = Vec::with_capacity(CATALOG.len());

    for (name, cost_cents, price_cents, initial_stock) in CATALOG {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            cost_cents: *cost_cents,
            price_cents: *price_cents,
            stock: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        db.stock()
            .adjust(&product.id, *initial_stock, "initial stock")
            .await?;
        product_ids.push(product.id);
    }
    println!("  {} products stocked", product_ids.len());

    println!("Seeding clients...");
    let mut client_ids = Vec::with_capacity(CLIENTS.len());
    for (name, phone) in CLIENTS {
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            phone: Some((*phone).to_string()),
            email: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.clients().insert(&client).await?;
        client_ids.push(client.id);
    }
    println!("  {} clients created", client_ids.len());

    // One demo credit sale with a deposit, then an abono against it.
    println!("Creating demo credit sale...");
    let ledger = db.ledger();

    let created = ledger
        .create_sale(CreateSaleInput {
            client_id: client_ids[0].clone(),
            items: vec![
                SaleLineInput {
                    product_id: product_ids[0].clone(),
                    quantity: 2,
                    unit_price_cents: CATALOG[0].2,
                },
                SaleLineInput {
                    product_id: product_ids[3].clone(),
                    quantity: 1,
                    unit_price_cents: CATALOG[3].2,
                },
            ],
            discount_cents: 0,
            method: PaymentMethod::Cash,
            terms: PaymentTerms::Credit { deposit_cents: 2000 },
            notes: Some("demo credit sale".to_string()),
        })
        .await?;

    let registered = ledger
        .register_payment(RegisterPaymentInput {
            sale_id: created.sale_id.clone(),
            client_id: client_ids[0].clone(),
            amount_cents: 1500,
            method: PaymentMethod::Cash,
            notes: None,
        })
        .await?;

    println!(
        "  Sale {} for {} cents, pending after abono: {} cents",
        created.sale_id, created.total_cents, registered.new_pending_cents
    );

    let summary = ledger.portfolio_summary().await?;
    println!();
    println!("Portfolio after seed:");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!();
    println!("Seed complete!");

    Ok(())
}
