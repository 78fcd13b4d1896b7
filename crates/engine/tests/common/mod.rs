#![allow(dead_code)]

use api_types::{
    party::PartyNew,
    purchase::PurchaseNew,
    user::{RoleName, UserNew},
};
use chrono::{DateTime, FixedOffset};
use engine::{Actor, Engine, Party, Purchase, User};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn at(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).unwrap()
}

pub async fn admin(engine: &Engine) -> Actor {
    let user: User = engine
        .new_user(
            &UserNew {
                name: "Admin".to_string(),
                email: "admin@mill.test".to_string(),
                phone: Some("03001234567".to_string()),
                password: "secret".to_string(),
                role_name: Some(RoleName::AdminRole),
            },
            &Actor::system(),
        )
        .await
        .unwrap();
    Actor::from(&user)
}

pub async fn seller(engine: &Engine, actor: &Actor, name: &str) -> Party {
    engine
        .new_seller(
            &PartyNew {
                name: name.to_string(),
                phone: None,
                company_name: None,
            },
            actor,
        )
        .await
        .unwrap()
}

pub async fn customer(engine: &Engine, actor: &Actor, name: &str) -> Party {
    engine
        .new_customer(
            &PartyNew {
                name: name.to_string(),
                phone: None,
                company_name: None,
            },
            actor,
        )
        .await
        .unwrap()
}

pub async fn wheat(engine: &Engine, actor: &Actor, amount: f64) -> Purchase {
    engine
        .new_purchase(
            &PurchaseNew {
                name: "Wheat".to_string(),
                price: 3.5,
                amount,
                purchase_date: at("2025-03-01T10:00:00+00:00"),
                transaction_type: None,
                seller_id: None,
            },
            actor,
        )
        .await
        .unwrap()
}
