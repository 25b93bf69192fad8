use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Local, NaiveDateTime};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

use warehouse::infrastructure::memory::InMemoryProductRepository;

fn create_test_app() -> Router {
    let state = warehouse::app_state(Arc::new(InMemoryProductRepository::new()));
    warehouse::build_app(state, Duration::from_secs(5))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn send_text(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let (status, bytes) = send(app, method, uri, None).await;
    (status, String::from_utf8(bytes).unwrap())
}

async fn create(app: &Router, name: &str, price: i64, count: i64) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/product/createProduct",
        Some(json!({
            "name": name,
            "description": "D",
            "category": "C",
            "price": price,
            "count": count
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body
}

fn message(body: &Value) -> &str {
    body["message"].as_str().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_and_search_by_article() {
    let app = create_test_app();
    let created = create(&app, "N", 10, 5).await;

    assert_eq!(created["name"], "N");
    assert_eq!(created["description"], "D");
    assert_eq!(created["category"], "C");
    assert_eq!(created["price"], 10);
    assert_eq!(created["count"], 5);
    assert_eq!(created["editdate"], "");
    assert_eq!(
        created["createdate"],
        Local::now().date_naive().format("%Y-%m-%d").to_string()
    );

    let article = created["article"].as_str().unwrap();
    let (status, found) = send_json(
        &app,
        "GET",
        &format!("/product/searchByParam?param=article&paramValue={}", article),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([created]));
}

#[tokio::test]
async fn test_unknown_field_is_404_everywhere() {
    let app = create_test_app();
    let article = Uuid::new_v4();

    let (status, body) =
        send_json(&app, "GET", "/product/searchByParam?param=colour&paramValue=red", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message(&body), "parameter 'colour' does not exist");

    let (status, _) =
        send_json(&app, "DELETE", "/product/deleteByParam?param=colour&paramValue=red", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/product/editByParam?param=colour&paramValue=red&article={}", article),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_value_rejected_except_editdate() {
    let app = create_test_app();
    for param in ["name", "description", "category", "price", "count", "article", "createdate"] {
        let (status, body) = send_json(
            &app,
            "GET",
            &format!("/product/searchByParam?param={}&paramValue=", param),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "param {}", param);
        assert_eq!(message(&body), "invalid parameter value");
    }

    let created = create(&app, "N", 1, 1).await;
    let (status, body) =
        send_json(&app, "GET", "/product/searchByParam?param=editdate&paramValue=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([created]));
}

#[tokio::test]
async fn test_price_and_count_coercion() {
    let app = create_test_app();
    create(&app, "N", 5, 3).await;

    let (status, body) =
        send_json(&app, "GET", "/product/searchByParam?param=price&paramValue=12a", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "invalid price");

    let (status, body) =
        send_json(&app, "GET", "/product/searchByParam?param=count&paramValue=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "invalid count");

    let (status, body) =
        send_json(&app, "GET", "/product/searchByParam?param=Price&paramValue=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_article_coercion_and_absent_article() {
    let app = create_test_app();
    let absent = Uuid::new_v4();

    let (status, body) = send_json(
        &app,
        "GET",
        "/product/searchByParam?param=article&paramValue=invalid-article-12",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "invalid article UUID");

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/product/searchByParam?param=article&paramValue={}", absent),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, text) = send_text(
        &app,
        "DELETE",
        &format!("/product/deleteByParam?param=article&paramValue={}", absent),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.ends_with("not found"));

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/product/editByParam?param=name&paramValue=x&article={}", absent),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        message(&body),
        format!("product with article {} does not exist", absent)
    );
}

#[tokio::test]
async fn test_delete_by_param_outcomes() {
    let app = create_test_app();
    create(&app, "bear", 1, 1).await;

    let uri = "/product/deleteByParam?param=Name&paramValue=bear";
    let (status, text) = send_text(&app, "DELETE", uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Product(s) with param Name and value bear deleted successfully");

    for _ in 0..2 {
        let (status, text) = send_text(&app, "DELETE", uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "Product(s) with param Name and value bear not found");
    }
}

#[tokio::test]
async fn test_edit_rejects_immutable_targets() {
    let app = create_test_app();
    let created = create(&app, "N", 1, 1).await;
    let article = created["article"].as_str().unwrap();

    let cases = [
        ("article", Uuid::new_v4().to_string(), "article cannot be changed"),
        ("editdate", "2024-01-01%2010:00:00".to_string(), "edit date cannot be changed"),
        ("createdate", "2024-01-01".to_string(), "create date cannot be changed"),
    ];
    for (param, value, expected) in cases {
        let (status, body) = send_json(
            &app,
            "PUT",
            &format!(
                "/product/editByParam?param={}&paramValue={}&article={}",
                param, value, article
            ),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), expected);
    }
}

#[tokio::test]
async fn test_edit_updates_value_and_editdate() {
    let app = create_test_app();
    let created = create(&app, "N", 1, 1).await;
    let article = created["article"].as_str().unwrap();

    let (status, edited) = send_json(
        &app,
        "PUT",
        &format!("/product/editByParam?param=count&paramValue=42&article={}", article),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["count"], 42);
    assert_eq!(edited["article"], created["article"]);
    assert_eq!(edited["createdate"], created["createdate"]);

    let stamp = edited["editdate"].as_str().unwrap();
    let parsed = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").unwrap();
    let drift = Local::now().naive_local() - parsed;
    assert!(drift.num_seconds().abs() < 60);

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/product/editByParam?param=price&paramValue=0&article={}", article),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "invalid price");

    let (status, body) =
        send_json(&app, "PUT", "/product/editByParam?param=name&paramValue=x&article=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "invalid article value");
}

#[tokio::test]
async fn test_create_validation_messages() {
    let app = create_test_app();

    let (status, body) = send_json(&app, "POST", "/product/createProduct", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "request body is missing");

    let (status, body) = send_json(
        &app,
        "POST",
        "/product/createProduct",
        Some(json!({ "description": "D", "category": "C", "price": 0, "count": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "name missing");

    let (status, body) = send_json(
        &app,
        "POST",
        "/product/createProduct",
        Some(json!({ "name": "N", "description": "D", "category": "C", "price": 0, "count": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "product price must be at least 1");

    let (status, body) = send_json(
        &app,
        "POST",
        "/product/createProduct",
        Some(json!({ "name": "N", "description": "D", "category": "C", "price": 5, "count": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "product count must be at least 1");

    let (status, body) = send_json(
        &app,
        "POST",
        "/product/createProduct",
        Some(json!({ "name": "Fluffy bear", "description": "Pretty good toy", "category": "toys", "price": "100", "count": "10" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 100);
}

#[tokio::test]
async fn test_get_all_and_delete_all() {
    let app = create_test_app();
    create(&app, "A", 1, 1).await;
    create(&app, "B", 2, 2).await;

    let (status, body) = send_json(&app, "GET", "/product/getAll", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, text) = send_text(&app, "DELETE", "/product/deleteAll").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "All products deleted successfully");

    let (_, body) = send_json(&app, "GET", "/product/getAll", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_missing_query_parameter_is_json_400() {
    let app = create_test_app();

    let uris = [
        ("GET", "/product/searchByParam?param=name".to_string()),
        ("DELETE", "/product/deleteByParam?paramValue=bear".to_string()),
        (
            "PUT",
            "/product/editByParam?param=name&paramValue=x".to_string(),
        ),
    ];
    for (method, uri) in uris {
        let (status, body) = send_json(&app, method, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert!(
            message(&body).contains("missing field"),
            "{} {} -> {}",
            method,
            uri,
            body
        );
    }
}

#[tokio::test]
async fn test_search_and_delete_by_createdate() {
    let app = create_test_app();
    let created = create(&app, "N", 1, 1).await;
    let today = created["createdate"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/product/searchByParam?param=createdate&paramValue={}", today),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([created]));

    let (status, body) = send_json(
        &app,
        "GET",
        "/product/searchByParam?param=createdate&paramValue=2000-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send_json(
        &app,
        "GET",
        "/product/searchByParam?param=createdate&paramValue=2024-3-9",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message(&body), "invalid date format, expected yyyy-MM-dd");

    let (status, text) = send_text(
        &app,
        "DELETE",
        &format!("/product/deleteByParam?param=createdate&paramValue={}", today),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.ends_with("deleted successfully"), "{}", text);

    let (_, body) = send_json(&app, "GET", "/product/getAll", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_search_and_delete_by_editdate_stamp() {
    let app = create_test_app();
    let untouched = create(&app, "A", 1, 1).await;
    let created = create(&app, "B", 1, 1).await;
    let article = created["article"].as_str().unwrap();

    let (_, edited) = send_json(
        &app,
        "PUT",
        &format!("/product/editByParam?param=name&paramValue=C&article={}", article),
        None,
    )
    .await;
    let stamp = edited["editdate"].as_str().unwrap().replace(' ', "%20");

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/product/searchByParam?param=editdate&paramValue={}", stamp),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([edited]));

    let (status, body) = send_json(
        &app,
        "GET",
        "/product/searchByParam?param=editdate&paramValue=2024-3-9%201:2:3",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        message(&body),
        "invalid date-time format, expected yyyy-MM-dd HH:mm:ss"
    );

    let (status, text) = send_text(
        &app,
        "DELETE",
        &format!("/product/deleteByParam?param=editdate&paramValue={}", stamp),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.ends_with("deleted successfully"), "{}", text);

    let (_, body) = send_json(&app, "GET", "/product/getAll", None).await;
    assert_eq!(body, json!([untouched]));
}
