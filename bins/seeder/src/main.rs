//! Database seeder for Mikopo development and testing.
//!
//! Seeds one staff user per approval role plus a demo loan
//! application for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use mikopo_core::auth::hash_password;
use mikopo_db::entities::users;
use mikopo_db::repositories::loan::{CreateLoanInput, LoanRepository};

/// Seed staff IDs (consistent for all seeds), one per role in chain order.
const STAFF: [(&str, &str, &str); 5] = [
    (
        "00000000-0000-0000-0000-000000000001",
        "field_officer",
        "Juma Okello",
    ),
    (
        "00000000-0000-0000-0000-000000000002",
        "manager",
        "Asha Mwangi",
    ),
    (
        "00000000-0000-0000-0000-000000000003",
        "director",
        "Daniel Kiprotich",
    ),
    (
        "00000000-0000-0000-0000-000000000004",
        "chairperson",
        "Grace Nakato",
    ),
    ("00000000-0000-0000-0000-000000000005", "ceo", "Samuel Banda"),
];

/// Password shared by all seeded staff accounts.
const SEED_PASSWORD: &str = "mikopo-dev";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = mikopo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding staff users...");
    seed_staff(&db).await;

    println!("Seeding demo loan application...");
    seed_demo_loan(&db).await;

    println!("Seeding complete!");
}

/// Seeds one active staff user per approval role.
async fn seed_staff(db: &DatabaseConnection) {
    let password_hash = hash_password(SEED_PASSWORD).expect("Failed to hash seed password");

    for (id, role, full_name) in STAFF {
        let user_id = Uuid::parse_str(id).expect("Invalid seed UUID");

        if users::Entity::find_by_id(user_id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  {role} already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(user_id),
            email: Set(format!("{role}@mikopo.dev")),
            password_hash: Set(password_hash.clone()),
            full_name: Set(full_name.to_string()),
            role: Set(role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(db).await.expect("Failed to seed staff user");
        println!("  Seeded {role}: {full_name}");
    }
}

/// Seeds one demo loan application submitted by the seed field officer.
async fn seed_demo_loan(db: &DatabaseConnection) {
    let (officer_id, _, officer_name) = STAFF[0];
    let officer_id = Uuid::parse_str(officer_id).expect("Invalid seed UUID");

    let repo = LoanRepository::new(db.clone());
    let application = repo
        .create(CreateLoanInput {
            client_name: "Neema Hassan".to_string(),
            client_phone: Some("+255700000001".to_string()),
            amount: Decimal::new(2_500_000_00, 2),
            purpose: "Poultry stock expansion".to_string(),
            monthly_income: Decimal::new(450_000_00, 2),
            created_by: officer_id,
            officer_name: officer_name.to_string(),
        })
        .await
        .expect("Failed to seed demo loan");

    println!("  Seeded loan {} (status {})", application.id, application.status);
}
