use api_types::user::{RoleName, UserNew};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use engine::{Actor, Engine};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN: (&str, &str) = ("admin@mill.test", "admin-pass");
const EDITOR: (&str, &str) = ("editor@mill.test", "editor-pass");
const ROOT: (&str, &str) = ("root@mill.test", "root-pass");

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    for (email, password, role) in [
        (ADMIN.0, ADMIN.1, RoleName::AdminRole),
        (EDITOR.0, EDITOR.1, RoleName::EditorRole),
        (ROOT.0, ROOT.1, RoleName::SuperAdminRole),
    ] {
        engine
            .new_user(
                &UserNew {
                    name: email.to_string(),
                    email: email.to_string(),
                    phone: None,
                    password: password.to_string(),
                    role_name: Some(role),
                },
                &Actor::system(),
            )
            .await
            .unwrap();
    }

    server::app(engine, false)
}

fn basic((login, password): (&str, &str)) -> String {
    format!("Basic {}", STANDARD.encode(format!("{login}:{password}")))
}

fn request(method: &str, uri: &str, who: Option<(&str, &str)>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(who) = who {
        builder = builder.header(header::AUTHORIZATION, basic(who));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, body) = send(app, request("POST", uri, Some(ADMIN), Some(body))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["payload"].clone()
}

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let response = app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_or_wrong_credentials_are_rejected() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/api/buyer", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert!(body["payload"].is_null());

    let (status, _) = send(
        &app,
        request("GET", "/api/buyer", Some((ADMIN.0, "nope")), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_and_me_return_the_user_without_password() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": ADMIN.0, "password": ADMIN.1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["roleName"], "ADMIN_ROLE");
    assert!(body["payload"].get("password").is_none());

    let (status, body) = send(&app, request("GET", "/api/auth/me", Some(EDITOR), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["email"], EDITOR.0);
}

#[tokio::test]
async fn editors_can_list_but_not_write() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/api/customer", Some(EDITOR), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], json!([]));

    let (status, _) = send(
        &app,
        request("POST", "/api/customer", Some(EDITOR), Some(json!({ "name": "Ali" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request("GET", "/api/customer/pagination", Some(EDITOR), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_cannot_create_super_admins() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/user",
            Some(ADMIN),
            Some(json!({
                "name": "Root",
                "email": "root@mill.test",
                "password": "x",
                "roleName": "SUPER_ADMIN_ROLE"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_cannot_touch_super_admin_accounts() {
    let app = test_app().await;
    let (_, body) = send(&app, request("GET", "/api/user", Some(ADMIN), None)).await;
    let root_id = body["payload"]
        .as_array()
        .unwrap()
        .iter()
        .find(|user| user["email"] == ROOT.0)
        .map(|user| user["id"].as_str().unwrap().to_string())
        .unwrap();
    let uri = format!("/api/user/{root_id}");

    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(ADMIN), Some(json!({ "password": "taken-over" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(ADMIN), Some(json!({ "roleName": "SALES_ROLE" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, request("DELETE", &uri, Some(ADMIN), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request("GET", "/api/auth/me", Some((ROOT.0, "taken-over")), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, request("GET", "/api/auth/me", Some(ROOT), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["roleName"], "SUPER_ADMIN_ROLE");

    let (status, _) = send(
        &app,
        request("PUT", &uri, Some(ROOT), Some(json!({ "name": "Owner" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_bodies_and_ids_are_bad_requests() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/stock",
            Some(ADMIN),
            Some(json!({ "name": "Flour", "inStock": 1.1234567, "sold": 0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"].as_object().is_some_and(|fields| !fields.is_empty()),
        "{body}"
    );

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/stock",
            Some(ADMIN),
            Some(json!({ "name": "Flour", "inStock": 1, "sold": 0, "color": "white" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, request("GET", "/api/stock/not-a-uuid", Some(ADMIN), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "UUID Validation Error");
}

#[tokio::test]
async fn sells_cannot_exceed_the_purchase() {
    let app = test_app().await;

    let seller = create(&app, "/api/seller", json!({ "name": "Grain Co" })).await;
    let purchase = create(
        &app,
        "/api/purchase",
        json!({
            "name": "Wheat",
            "price": 50.25,
            "amount": 100,
            "purchaseDate": "2024-03-01T10:00:00+05:00",
            "sellerId": seller["id"],
        }),
    )
    .await;
    let purchase_id = purchase["id"].as_str().unwrap().to_string();

    let sell = create(
        &app,
        "/api/sell",
        json!({
            "name": "Wheat",
            "price": 60,
            "amount": 70,
            "sellDate": "2024-03-02T09:00:00Z",
            "purchaseId": purchase_id,
        }),
    )
    .await;
    assert_eq!(sell["purchase"]["id"], purchase_id.as_str());

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/manufacture",
            Some(ADMIN),
            Some(json!({
                "name": "Flour",
                "amount": 30.000001,
                "manufactureDate": "2024-03-02T09:00:00Z",
                "purchaseId": purchase_id,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "You are exceeding purchase amount");

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/purchase/{purchase_id}/remaining"),
            Some(EDITOR),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["remaining"], 30.0);
    assert_eq!(body["payload"]["sold"], 70.0);
}

#[tokio::test]
async fn ledger_remaining_follows_updates() {
    let app = test_app().await;
    let customer = create(&app, "/api/customer", json!({ "name": "Bakery" })).await;
    let ledger = create(
        &app,
        "/api/ledger",
        json!({ "previousLedger": 1000, "depositAmount": 250.5, "customerId": customer["id"] }),
    )
    .await;
    assert_eq!(ledger["remainingLedger"], 749.5);
    assert_eq!(ledger["customer"]["name"], "Bakery");

    let id = ledger["id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/api/ledger/{id}"),
            Some(ADMIN),
            Some(json!({ "depositAmount": 1000 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["remainingLedger"], 0.0);
}

#[tokio::test]
async fn pagination_searches_and_counts() {
    let app = test_app().await;
    for name in ["Flour A", "flour B", "Rice"] {
        create(&app, "/api/stock", json!({ "name": name, "inStock": 10, "sold": 1 })).await;
    }

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/stock/pagination?name=FLOUR&limit=1&order=name&sort=ASC",
            Some(ADMIN),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["count"], 2);
    assert_eq!(body["payload"]["limit"], 1);
    assert_eq!(body["payload"]["data"][0]["name"], "Flour A");
    assert_eq!(body["payload"]["data"][0]["remaining"], 9.0);
}

#[tokio::test]
async fn removed_rows_disappear() {
    let app = test_app().await;
    let buyer = create(&app, "/api/buyer", json!({ "name": "Mart", "phone": "0300" })).await;
    let id = buyer["id"].as_str().unwrap();

    let (status, body) = send(&app, request("DELETE", &format!("/api/buyer/{id}"), Some(ADMIN), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["deleted"], true);

    let (status, body) = send(&app, request("GET", &format!("/api/buyer/{id}"), Some(ADMIN), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Buyer Not Found!!");

    let (status, _) = send(&app, request("DELETE", &format!("/api/buyer/{id}"), Some(ADMIN), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sell_statement_is_csv() {
    let app = test_app().await;
    let customer = create(&app, "/api/customer", json!({ "name": "Bakery" })).await;
    let purchase = create(
        &app,
        "/api/purchase",
        json!({ "name": "Wheat", "price": 2, "amount": 10, "purchaseDate": "2024-05-01T08:00:00Z" }),
    )
    .await;
    create(
        &app,
        "/api/sell",
        json!({
            "name": "Wheat",
            "price": 3.5,
            "amount": 4,
            "sellDate": "2024-05-02T12:00:00Z",
            "transactionType": "credit",
            "purchaseId": purchase["id"],
            "customerId": customer["id"],
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(request("GET", "/api/sell/statement?date=2024-05-02", Some(ADMIN), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("party,product,amount,price,total,transaction_type,date")
    );
    let line = lines.next().unwrap();
    assert!(line.starts_with("Bakery,Wheat,4.0,3.5,14.0,credit,"), "{line}");
    assert_eq!(lines.next(), None);
}
