use barstock_api::config::AppConfig;
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod with in-memory stores, bound to an ephemeral port.
        let app = barstock_api::app::build_app(&AppConfig::default())
            .await
            .expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self.client.post(self.url(path)).json(&body).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(self.url(path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn create_item(&self, name: &str, stock: Value) -> String {
        let (status, body) = self
            .post(
                "/inventory/items",
                json!({ "name": name, "category": "Bebidas", "unit": "botella", "stockByLocation": stock }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "body={body}");
        body["id"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_and_settings() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, settings) = srv.get("/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["primaryLocation"], "almacen");
    assert_eq!(settings["locations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn weekly_reconciliation_over_http() {
    let srv = TestServer::spawn().await;
    let id = srv.create_item("Absolut", json!({ "barra": 50 })).await;

    // First analysis has no baseline and resets stock into the primary location.
    let (status, first) = srv.post("/history/analysis", json!({})).await;
    assert_eq!(status, StatusCode::CREATED, "body={first}");
    assert_eq!(first["record"]["type"], "analysis");
    assert_eq!(first["record"]["items"][0]["endStock"], 50.0);

    let (_, items) = srv.get("/inventory/items").await;
    assert_eq!(items[0]["stockByLocation"], json!({ "almacen": 0.0 }));

    // Twelve bottles delivered during the week.
    let (status, order) = srv
        .post(
            "/purchases/orders",
            json!({
                "supplierName": "Distribuciones Norte",
                "items": [{ "inventoryItemId": id, "quantity": 12, "costAtTimeOfPurchase": 10.5 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body={order}");
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["totalAmount"], 126.0);
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, order) = srv
        .post(&format!("/purchases/orders/{order_id}/complete"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "Completed");
    assert!(order["deliveryDate"].is_string());

    // End-of-week count: ten left at the bar.
    let res = srv
        .client
        .put(srv.url(&format!("/inventory/items/{id}/stock")))
        .json(&json!({ "location": "barra", "quantity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let (status, second) = srv.post("/history/analysis", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["archivedOrders"], 1);
    let line = &second["record"]["items"][0];
    assert_eq!(line["pendingStock"], 12.0);
    assert_eq!(line["initialStock"], 62.0);
    assert_eq!(line["endStock"], 10.0);
    assert_eq!(line["consumption"], 52.0);

    let record_id = second["record"]["id"].as_str().unwrap();
    let (status, report) = srv.get(&format!("/history/{record_id}/consumption")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totalConsumption"], 52.0);
    assert_eq!(report["lines"][0]["name"], "Absolut");

    let (_, orders) = srv.get("/purchases/orders").await;
    assert_eq!(orders[0]["status"], "Archived");

    let (_, history) = srv.get("/history").await;
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["id"], second["record"]["id"]);
}

#[tokio::test]
async fn snapshot_leaves_inventory_alone_and_has_no_consumption_view() {
    let srv = TestServer::spawn().await;
    srv.create_item("Tonica", json!({ "barra": 24, "camara": 48 })).await;

    let (status, snapshot) = srv.post("/history/snapshot", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snapshot["type"], "snapshot");
    assert_eq!(snapshot["items"][0]["currentStock"], 72.0);
    assert!(snapshot["items"][0].get("consumption").is_none());

    let (_, items) = srv.get("/inventory/items").await;
    assert_eq!(items[0]["stockByLocation"]["camara"], 48.0);

    let id = snapshot["id"].as_str().unwrap();
    let (status, body) = srv.get(&format!("/history/{id}/consumption")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invariant_violation");
}

#[tokio::test]
async fn history_deletion_requires_confirmation() {
    let srv = TestServer::spawn().await;
    srv.create_item("Cola", json!({ "almacen": 6 })).await;
    srv.post("/history/snapshot", json!({})).await;

    let res = srv.client.delete(srv.url("/history")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    let res = srv
        .client
        .delete(srv.url("/history?confirm=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["removed"], 1);

    let (_, history) = srv.get("/history").await;
    assert!(history.as_array().unwrap().is_empty());
    let (_, items) = srv.get("/inventory/items").await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn validation_and_lookup_errors_use_the_error_body() {
    let srv = TestServer::spawn().await;

    // Nothing to analyse yet.
    let (status, body) = srv.post("/history/analysis", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = srv.post("/inventory/items", json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let id = srv.create_item("Ginebra", json!({})).await;
    let res = srv
        .client
        .put(srv.url(&format!("/inventory/items/{id}/stock")))
        .json(&json!({ "location": "sotano", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = srv
        .client
        .delete(srv.url("/inventory/items/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let missing = uuid::Uuid::now_v7();
    let res = srv
        .client
        .delete(srv.url(&format!("/purchases/orders/{missing}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (status, body) = srv
        .post(
            "/purchases/orders",
            json!({ "supplierName": "Norte", "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn register_sessions_and_summary() {
    let srv = TestServer::spawn().await;

    let (status, session) = srv
        .post(
            "/register/sessions",
            json!({
                "date": "2024-06-01",
                "label": "Sabado",
                "incomeBySource": { "barra": 800.0, "terraza": 200.0 },
                "payments": { "cash": 400.0, "card": 600.0, "transfer": 0.0 },
                "expenses": [{ "concept": "hielo", "amount": 50.0 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body={session}");

    let (status, _) = srv
        .post(
            "/register/sessions",
            json!({ "date": "2024-06-20", "incomeBySource": { "eventos": 300.0 } }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = srv
        .post(
            "/register/sessions",
            json!({ "date": "2024-06-02", "incomeBySource": { "casino": 1.0 } }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, summary) = srv
        .get("/register/summary?from=2024-06-01&to=2024-06-07")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sessions"], 1);
    assert_eq!(summary["totalIncome"], 1000.0);
    assert_eq!(summary["net"], 950.0);

    let (status, _) = srv.get("/register/summary?from=2024-06-07").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = session["id"].as_str().unwrap();
    let res = srv
        .client
        .delete(srv.url(&format!("/register/sessions/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (_, sessions) = srv.get("/register/sessions").await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_completion_body_leaves_order_pending() {
    let srv = TestServer::spawn().await;
    let id = srv.create_item("Absolut", json!({})).await;
    let (_, order) = srv
        .post(
            "/purchases/orders",
            json!({
                "supplierName": "Norte",
                "items": [{ "inventoryItemId": id, "quantity": 6, "costAtTimeOfPurchase": 9.0 }]
            }),
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, body) = srv
        .post(
            &format!("/purchases/orders/{order_id}/complete"),
            json!({ "deliveryDate": "not-a-date" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_body");

    let (_, orders) = srv.get("/purchases/orders").await;
    assert_eq!(orders[0]["status"], "Pending");
    assert!(orders[0].get("deliveryDate").is_none());

    // No body at all still completes with today's date.
    let res = srv
        .client
        .post(srv.url(&format!("/purchases/orders/{order_id}/complete")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let done: Value = res.json().await.unwrap();
    assert_eq!(done["status"], "Completed");
    assert!(done["deliveryDate"].is_string());
}

#[tokio::test]
async fn location_and_source_keys_are_case_insensitive() {
    let srv = TestServer::spawn().await;

    let id = srv.create_item("Tonica", json!({ "Barra": 5, " CAMARA ": 2 })).await;
    let (_, items) = srv.get("/inventory/items").await;
    assert_eq!(items[0]["id"], id.as_str());
    assert_eq!(items[0]["stockByLocation"], json!({ "barra": 5.0, "camara": 2.0 }));

    let (status, session) = srv
        .post(
            "/register/sessions",
            json!({ "date": "2024-06-01", "incomeBySource": { "Terraza": 120.0 } }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body={session}");
    assert_eq!(session["incomeBySource"], json!({ "terraza": 120.0 }));
}

#[tokio::test]
async fn not_found_message_names_the_resource() {
    let srv = TestServer::spawn().await;
    let missing = uuid::Uuid::now_v7();

    let res = srv
        .client
        .post(srv.url(&format!("/purchases/orders/{missing}/cancel")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "purchase order not found");
}
