mod common;

use api_types::{
    ledger::{LedgerNew, LedgerSearch, LedgerUpdate},
    stock::{StockNew, StockSearch, StockUpdate},
};
use common::{admin, customer, engine_with_db};
use engine::{Amount, EngineError, PageRequest};
use uuid::Uuid;

#[tokio::test]
async fn ledger_remaining_tracks_previous_minus_deposit() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    let customer = customer(&engine, &actor, "Bakery").await;

    let ledger = engine
        .new_ledger(
            &LedgerNew {
                previous_ledger: 500.0,
                deposit_amount: 120.25,
                customer_id: customer.audit.id,
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(ledger.remaining_ledger, Amount::from_micros(379_750_000));
    assert_eq!(ledger.customer.as_ref().map(|c| c.name.as_str()), Some("Bakery"));

    let ledger = engine
        .update_ledger(
            ledger.audit.id,
            &LedgerUpdate {
                deposit_amount: Some(600.0),
                ..LedgerUpdate::default()
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(ledger.remaining_ledger, Amount::from_micros(-100_000_000));

    let stored = engine.ledger(ledger.audit.id).await.unwrap();
    assert_eq!(stored.remaining_ledger, ledger.remaining_ledger);
}

#[tokio::test]
async fn ledger_needs_an_active_customer() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    let err = engine
        .new_ledger(
            &LedgerNew {
                previous_ledger: 1.0,
                deposit_amount: 1.0,
                customer_id: Uuid::new_v4(),
            },
            &actor,
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("Customer Not Found!!".to_string()));
}

#[tokio::test]
async fn ledger_page_for_unknown_customer_is_empty() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    let bakery = customer(&engine, &actor, "Bakery").await;
    let shop = customer(&engine, &actor, "Shop").await;
    for customer_id in [bakery.audit.id, bakery.audit.id, shop.audit.id] {
        engine
            .new_ledger(
                &LedgerNew {
                    previous_ledger: 10.0,
                    deposit_amount: 1.0,
                    customer_id,
                },
                &actor,
            )
            .await
            .unwrap();
    }

    let request = PageRequest::default();
    let page = engine
        .ledgers_page(
            &LedgerSearch {
                customer_id: Some(bakery.audit.id),
            },
            &request,
        )
        .await
        .unwrap();
    assert_eq!(page.count, 2);
    assert!(page.data.iter().all(|l| l.customer_id == bakery.audit.id));

    let page = engine
        .ledgers_page(
            &LedgerSearch {
                customer_id: Some(Uuid::new_v4()),
            },
            &request,
        )
        .await
        .unwrap();
    assert_eq!(page.count, 0);
    assert!(page.data.is_empty());

    engine.remove_customer(shop.audit.id, &actor).await.unwrap();
    let page = engine
        .ledgers_page(
            &LedgerSearch {
                customer_id: Some(shop.audit.id),
            },
            &request,
        )
        .await
        .unwrap();
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn stock_remaining_follows_in_stock_and_sold() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    let stock = engine
        .new_stock(
            &StockNew {
                name: "Flour 10kg".to_string(),
                in_stock: 200.0,
                sold: 50.0,
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(stock.remaining, Amount::from_micros(150_000_000));

    let stock = engine
        .update_stock(
            stock.audit.id,
            &StockUpdate {
                sold: Some(80.5),
                ..StockUpdate::default()
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(stock.in_stock, Amount::from_micros(200_000_000));
    assert_eq!(stock.remaining, Amount::from_micros(119_500_000));

    let page = engine
        .stocks_page(
            &StockSearch {
                name: Some("10KG".to_string()),
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.count, 1);

    engine.remove_stock(stock.audit.id, &actor).await.unwrap();
    assert!(engine.stocks().await.unwrap().is_empty());
}
