//! Database seeder for Defter development and testing.
//!
//! Seeds a test company with cari accounts and products, then prints a
//! development bearer token for the company scope.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use defter_db::entities::{accounts, products, sea_orm_active_enums::AccountKind};
use defter_shared::{JwtConfig, JwtService};

/// Test company ID (consistent for all seeds)
const TEST_COMPANY_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test user ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = defter_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding cari accounts...");
    seed_accounts(&db).await;

    println!("Seeding products...");
    seed_products(&db).await;

    print_dev_token();

    println!("Seeding complete!");
}

fn test_company_id() -> Uuid {
    Uuid::parse_str(TEST_COMPANY_ID).unwrap()
}

fn test_user_id() -> Uuid {
    Uuid::parse_str(TEST_USER_ID).unwrap()
}

/// Seeds a customer and a supplier cari for the test company.
async fn seed_accounts(db: &DatabaseConnection) {
    let existing = accounts::Entity::find()
        .filter(accounts::Column::CompanyId.eq(test_company_id()))
        .all(db)
        .await
        .unwrap_or_default();

    if !existing.is_empty() {
        println!("  Accounts already exist, skipping...");
        return;
    }

    let now = Utc::now();
    let seeds = [
        ("Yilmaz Ticaret", AccountKind::Customer),
        ("Demir Tedarik", AccountKind::Supplier),
    ];

    for (name, kind) in seeds {
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(Some(test_company_id())),
            legacy_user_id: Set(None),
            name: Set(name.to_string()),
            kind: Set(kind),
            currency: Set("TRY".to_string()),
            balance: Set(Decimal::ZERO),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = account.insert(db).await {
            eprintln!("Failed to insert account {name}: {e}");
        } else {
            println!("  Created account: {name}");
        }
    }
}

/// Seeds a few products with opening stock.
async fn seed_products(db: &DatabaseConnection) {
    let existing = products::Entity::find()
        .filter(products::Column::CompanyId.eq(test_company_id()))
        .all(db)
        .await
        .unwrap_or_default();

    if !existing.is_empty() {
        println!("  Products already exist, skipping...");
        return;
    }

    let now = Utc::now();
    let seeds = [
        ("Kirmizi Kalem", "KLM-001", Decimal::new(2500, 2), Decimal::from(100)),
        ("Defter A5", "DFT-005", Decimal::new(4000, 2), Decimal::from(250)),
        ("Zimba Teli", "ZMB-010", Decimal::new(1250, 2), Decimal::from(500)),
    ];

    for (name, sku, unit_price, on_hand) in seeds {
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(Some(test_company_id())),
            legacy_user_id: Set(None),
            name: Set(name.to_string()),
            sku: Set(Some(sku.to_string())),
            unit_price: Set(unit_price),
            on_hand: Set(on_hand),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        if let Err(e) = product.insert(db).await {
            eprintln!("Failed to insert product {name}: {e}");
        } else {
            println!("  Created product: {name} ({sku})");
        }
    }
}

/// Prints a development bearer token for the test company scope.
fn print_dev_token() {
    let secret =
        std::env::var("DEFTER__JWT__SECRET").unwrap_or_else(|_| "change-me-in-production".into());
    let jwt_service = JwtService::new(JwtConfig {
        secret,
        access_token_expires_minutes: 8 * 60,
    });

    match jwt_service.generate_access_token(test_user_id(), Some(test_company_id()), "admin") {
        Ok(token) => {
            println!("Dev token (company scope, 8h):");
            println!("  {token}");
        }
        Err(e) => eprintln!("Failed to generate dev token: {e}"),
    }
}
