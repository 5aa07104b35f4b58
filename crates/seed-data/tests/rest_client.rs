//! End-to-end tests for the REST client against an in-process fake of the
//! products endpoint.
//!
//! The fake is a small axum app serving `/rest/v1/products`: POST appends
//! the JSON body to an in-memory table (optionally enforcing unique names),
//! GET answers `name=eq.<name>` lookups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use seed_data::prelude::*;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const API_KEY: &str = "test-service-key";
const DUPLICATE_BODY: &str =
    r#"{"code":"23505","message":"duplicate key value violates unique constraint \"products_name_key\""}"#;

#[derive(Debug, Clone)]
struct CapturedRequest {
    headers: HeaderMap,
    body: Value,
}

#[derive(Clone, Default)]
struct FakeTable {
    rows: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    unique_names: bool,
}

impl FakeTable {
    fn with_unique_names() -> Self {
        Self {
            unique_names: true,
            ..Self::default()
        }
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn insert_row(
    State(table): State<FakeTable>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    table.requests.lock().unwrap().push(CapturedRequest {
        headers,
        body: body.clone(),
    });

    let mut rows = table.rows.lock().unwrap();
    if table.unique_names && rows.iter().any(|row| row["name"] == body["name"]) {
        return (StatusCode::CONFLICT, DUPLICATE_BODY).into_response();
    }
    rows.push(body);
    StatusCode::CREATED.into_response()
}

async fn select_rows(
    State(table): State<FakeTable>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    let rows = table.rows.lock().unwrap();
    let matching: Vec<Value> = match params.get("name").and_then(|f| f.strip_prefix("eq.")) {
        Some(name) => rows
            .iter()
            .filter(|row| row["name"] == name)
            .take(1)
            .map(|_| json!({ "id": 1 }))
            .collect(),
        None => Vec::new(),
    };
    Json(matching)
}

/// Starts the fake endpoint and returns its base URL.
async fn serve(table: FakeTable) -> String {
    let app = Router::new()
        .route("/rest/v1/products", post(insert_row).get(select_rows))
        .with_state(table);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Starts a server that answers every request with a 500 whose body is cut
/// off before its declared length.
async fn serve_truncated_error() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\n\
                      content-type: text/plain\r\n\
                      content-length: 100\r\n\r\npartial",
                )
                .await;
        }
    });

    format!("http://{addr}")
}

fn client_for(base_url: &str) -> RestClient {
    local_client(&SeedConfig::new(base_url, API_KEY))
}

/// Client that talks to the fake directly, ignoring any proxy settings.
fn local_client(config: &SeedConfig) -> RestClient {
    RestClient::with_builder(reqwest::Client::builder().no_proxy(), config).unwrap()
}

fn header<'a>(request: &'a CapturedRequest, name: &str) -> &'a str {
    request.headers.get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_inserts_with_expected_headers_and_body() {
    let table = FakeTable::default();
    let base_url = serve(table.clone()).await;

    let report = Seeder::new(client_for(&base_url), sample_products())
        .run()
        .await;

    assert_eq!(report.added_count, 8);
    assert!(report.is_clean());
    assert_eq!(table.row_count(), 8);

    let requests = table.requests();
    let first = &requests[0];
    assert_eq!(header(first, "apikey"), API_KEY);
    assert_eq!(header(first, "authorization"), format!("Bearer {API_KEY}"));
    assert_eq!(header(first, "content-type"), "application/json");
    assert_eq!(header(first, "prefer"), "return=minimal");

    assert_eq!(first.body["name"], "Luxury Wireless Headphones");
    assert_eq!(first.body["price"], 299.99);
    assert_eq!(first.body["compare_price"], 399.99);
    assert_eq!(first.body["category"], "Electronics");
    assert_eq!(first.body["inventory_count"], 25);
    assert_eq!(first.body["is_active"], true);

    let submitted: Vec<_> = requests
        .iter()
        .map(|r| r.body["name"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<_> = sample_products().into_iter().map(|p| p.name).collect();
    assert_eq!(submitted, expected);
}

#[tokio::test]
async fn test_rerun_duplicates_rows() {
    let table = FakeTable::default();
    let base_url = serve(table.clone()).await;
    let seeder = Seeder::new(client_for(&base_url), sample_products());

    seeder.run().await;
    seeder.run().await;

    assert_eq!(table.requests().len(), 16);
    assert_eq!(table.row_count(), 16);
}

#[tokio::test]
async fn test_conflict_body_is_captured_verbatim() {
    let table = FakeTable::with_unique_names();
    let base_url = serve(table.clone()).await;
    let seeder = Seeder::new(client_for(&base_url), sample_products());

    seeder.run().await;
    let second = seeder.run().await;

    assert_eq!(second.added_count, 0);
    assert_eq!(second.failed_count(), 8);
    assert_eq!(second.errors[0].name, "Luxury Wireless Headphones");
    assert_eq!(second.errors[0].detail, DUPLICATE_BODY);
    assert_eq!(second.shown_errors().len(), 3);
}

#[tokio::test]
async fn test_unknown_collection_is_rejected() {
    let base_url = serve(FakeTable::default()).await;
    let config = SeedConfig::new(base_url.as_str(), API_KEY).with_collection("missing");
    let client = local_client(&config);

    let record = sample_products().remove(0);
    let err = client.insert(&record).await.unwrap_err();

    match err {
        ApiError::Rejected { status, .. } => assert_eq!(status.as_u16(), 404),
        other => panic!("expected a rejection, got {other}"),
    }
}

#[tokio::test]
async fn test_exists_lookup() {
    let table = FakeTable::default();
    let base_url = serve(table.clone()).await;
    let client = client_for(&base_url);

    assert!(!client.exists("Premium Yoga Mat").await.unwrap());

    let record = sample_products().remove(4);
    client.insert(&record).await.unwrap();

    assert!(client.exists("Premium Yoga Mat").await.unwrap());
    assert!(!client.exists("Premium Coffee Grinder").await.unwrap());
}

#[tokio::test]
async fn test_skip_existing_makes_rerun_idempotent() {
    let table = FakeTable::default();
    let base_url = serve(table.clone()).await;
    let seeder = Seeder::new(client_for(&base_url), sample_products()).skip_existing(true);

    let first = seeder.run().await;
    let second = seeder.run().await;

    assert_eq!(first.added_count, 8);
    assert_eq!(second.added_count, 0);
    assert_eq!(second.skipped_count, 8);
    assert_eq!(table.row_count(), 8);
}

#[tokio::test]
async fn test_unreachable_endpoint_faults_every_record() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let report = Seeder::new(client_for(&format!("http://{addr}")), sample_products())
        .run()
        .await;

    assert_eq!(report.added_count, 0);
    assert_eq!(report.failed_count(), 8);
    for failure in &report.errors {
        assert!(
            failure.detail.to_lowercase().contains("refused"),
            "fault detail should name the cause: {}",
            failure.detail
        );
    }
    assert_eq!(report.errors[7].name, "Premium Coffee Grinder");
}

#[tokio::test]
async fn test_truncated_error_body_is_a_fault() {
    let base_url = serve_truncated_error().await;
    let client = client_for(&base_url);

    let record = sample_products().remove(0);
    let err = client.insert(&record).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err}");

    let report = Seeder::new(client, vec![record]).run().await;
    assert_eq!(report.failed_count(), 1);
    assert!(!report.errors[0].detail.is_empty());
}
