mod common;

use api_types::party::{PartyNew, PartySearch, PartyUpdate};
use common::{admin, engine_with_db};
use engine::{EngineError, PageRequest};

fn party(name: &str, phone: Option<&str>, company_name: Option<&str>) -> PartyNew {
    PartyNew {
        name: name.to_string(),
        phone: phone.map(str::to_string),
        company_name: company_name.map(str::to_string),
    }
}

#[tokio::test]
async fn phone_and_company_are_unique_per_table() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    engine
        .new_buyer(&party("Ali", Some("0300"), Some("Ali Traders")), &actor)
        .await
        .unwrap();

    let err = engine
        .new_buyer(&party("Other", Some("0300"), None), &actor)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("0300".to_string()));
    let err = engine
        .new_buyer(&party("Other", None, Some("Ali Traders")), &actor)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("Ali Traders".to_string()));

    // Other party tables are independent.
    engine
        .new_seller(&party("Ali", Some("0300"), Some("Ali Traders")), &actor)
        .await
        .unwrap();
}

#[tokio::test]
async fn removed_parties_disappear_but_keep_their_keys() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    let customer = engine
        .new_customer(&party("Bakery", Some("0311"), None), &actor)
        .await
        .unwrap();

    assert!(engine.remove_customer(customer.audit.id, &actor).await.unwrap());
    let err = engine.customer(customer.audit.id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("Customer Not Found!!".to_string()));
    assert!(engine.customers().await.unwrap().is_empty());
    let err = engine
        .remove_customer(customer.audit.id, &actor)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .new_customer(&party("Bakery two", Some("0311"), None), &actor)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn update_keeps_missing_fields_and_clears_empty_ones() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    let seller = engine
        .new_seller(&party("Grain", Some("0322"), Some("Grain Co")), &actor)
        .await
        .unwrap();

    let updated = engine
        .update_seller(
            seller.audit.id,
            &PartyUpdate {
                name: Some("  Grain House ".to_string()),
                phone: None,
                company_name: Some(String::new()),
            },
            &actor,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Grain House");
    assert_eq!(updated.phone.as_deref(), Some("0322"));
    assert_eq!(updated.company_name, None);

    let err = engine
        .update_seller(
            seller.audit.id,
            &PartyUpdate {
                name: Some("   ".to_string()),
                ..PartyUpdate::default()
            },
            &actor,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let stored = engine.seller(seller.audit.id).await.unwrap();
    assert_eq!(stored.name, "Grain House");
    assert_eq!(stored.company_name, None);
}

#[tokio::test]
async fn party_pages_filter_by_each_column() {
    let (engine, _db) = engine_with_db().await;
    let actor = admin(&engine).await;
    engine
        .new_buyer(&party("Zahid", Some("0301"), Some("North Mills")), &actor)
        .await
        .unwrap();
    engine
        .new_buyer(&party("Amir", Some("0302"), Some("South Mills")), &actor)
        .await
        .unwrap();
    engine
        .new_buyer(&party("Bilal", None, None), &actor)
        .await
        .unwrap();

    let mills = PartySearch {
        company_name: Some("MILLS".to_string()),
        ..PartySearch::default()
    };
    let request = PageRequest::new(None, None, Some("ASC"), Some("name".to_string()));
    let page = engine.buyers_page(&mills, &request).await.unwrap();
    assert_eq!(page.count, 2);
    let names: Vec<_> = page.data.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Amir", "Zahid"]);

    let by_phone = PartySearch {
        phone: Some("0301".to_string()),
        ..PartySearch::default()
    };
    let page = engine
        .buyers_page(&by_phone, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.data[0].name, "Zahid");

    let page = engine
        .buyers_page(&PartySearch::default(), &PageRequest::new(Some(5), Some(10), None, None))
        .await
        .unwrap();
    assert_eq!(page.count, 3);
    assert!(page.data.is_empty());
}
