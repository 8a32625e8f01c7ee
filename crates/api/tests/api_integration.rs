//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use api::auth::{Claims, Hs256TokenVerifier, TokenVerifier};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::UserId;
use jsonwebtoken::{EncodingKey, Header, encode};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::{InMemoryAssetStore, InMemoryRecordStore, StoreOperation};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &[u8] = b"integration-secret";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn token_for(user: UserId) -> String {
    let claims = Claims {
        sub: user.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as u64,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

struct TestApp {
    router: Router,
    store: InMemoryRecordStore,
    assets: InMemoryAssetStore,
    token: String,
}

impl TestApp {
    fn new() -> Self {
        let store = InMemoryRecordStore::new();
        let assets = InMemoryAssetStore::new();
        let verifier: Arc<dyn TokenVerifier> = Arc::new(Hs256TokenVerifier::new(SECRET));
        let state = api::create_default_state(store.clone(), Arc::new(assets.clone()));
        let router = api::create_app(state, verifier, get_metrics_handle());
        Self {
            router,
            store,
            assets,
            token: token_for(UserId::new()),
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn authed(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call(method, uri, Some(&self.token), body).await
    }

    async fn create_product(&self, stock: i64) -> String {
        let (status, json) = self
            .authed(
                "POST",
                "/products",
                Some(json!({ "name": "Kibble", "price": 2500, "stock": stock })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_str().unwrap().to_string()
    }

    async fn stock_of(&self, product_id: &str) -> i64 {
        let (_, json) = self
            .call("GET", &format!("/products/{product_id}"), None, None)
            .await;
        json["data"]["stock"].as_i64().unwrap()
    }

    async fn sell(&self, product_id: &str, quantity: i64) -> (StatusCode, Value) {
        self.authed(
            "POST",
            "/product-sales/create",
            Some(json!({ "product_id": product_id, "quantity": quantity, "price": 2500 })),
        )
        .await
    }

    async fn create_pet(&self, token: &str) -> String {
        let (status, json) = self
            .call(
                "POST",
                "/pets/create",
                Some(token),
                Some(json!({ "pet": "Milo", "location": "Bandung", "price": 150000 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, json) = app.call("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = TestApp::new();

    let (status, json) = app.call("GET", "/product-sales", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);

    let (status, _) = app
        .call("GET", "/transactions", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_catalog_reads_are_public() {
    let app = TestApp::new();
    app.create_product(5).await;

    let (status, json) = app.call("GET", "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.call("POST", "/products", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sale_takes_units_out_of_stock() {
    let app = TestApp::new();
    let product_id = app.create_product(10).await;

    let (status, json) = app.sell(&product_id, 4).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["quantity"], 4);
    assert_eq!(app.stock_of(&product_id).await, 6);
}

#[tokio::test]
async fn test_insufficient_stock_is_a_bad_request() {
    let app = TestApp::new();
    let product_id = app.create_product(3).await;

    let (status, json) = app.sell(&product_id, 5).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Insufficient stock. Available: 3, Requested: 5");
    assert_eq!(app.stock_of(&product_id).await, 3);

    let (_, sales) = app.authed("GET", "/product-sales", None).await;
    assert!(sales["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sale_requires_fields() {
    let app = TestApp::new();
    let (status, json) = app
        .authed("POST", "/product-sales/create", Some(json!({ "quantity": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Fields product_id, quantity, and price are required."
    );
}

#[tokio::test]
async fn test_sale_update_and_delete_reconcile_stock() {
    let app = TestApp::new();
    let product_id = app.create_product(10).await;
    let (_, json) = app.sell(&product_id, 4).await;
    let sale_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/product-sales/{sale_id}"),
            Some(json!({ "product_id": product_id, "quantity": 6, "price": 2500 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["quantity"], 6);
    assert_eq!(app.stock_of(&product_id).await, 4);

    let (status, _) = app
        .authed("DELETE", &format!("/product-sales/{sale_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.stock_of(&product_id).await, 10);

    let (status, json) = app
        .authed("GET", &format!("/product-sales/{sale_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_store_failure_is_reported_with_cause() {
    let app = TestApp::new();
    let product_id = app.create_product(10).await;
    app.store
        .set_fail_on("products", StoreOperation::Update, true)
        .await;

    let (status, json) = app.sell(&product_id, 2).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("injected"));
    assert_eq!(app.store.record_count("product_sales").await, 0);
}

#[tokio::test]
async fn test_invalid_id_and_unknown_record() {
    let app = TestApp::new();

    let (status, _) = app.call("GET", "/products/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app
        .call("GET", &format!("/products/{}", uuid::Uuid::new_v4()), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_malformed_json_uses_the_error_envelope() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header("authorization", format!("Bearer {}", app.token))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_pet_transaction_flow() {
    let app = TestApp::new();
    let owner = UserId::new();
    let pet_id = app.create_pet(&token_for(owner)).await;

    let (status, json) = app
        .authed(
            "POST",
            "/transactions/create",
            Some(json!({ "pet_id": pet_id, "price": 150000, "status": "pending" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["seller_id"], owner.to_string());
    assert_eq!(json["data"]["type"], "pet");
    let transaction_id = json["data"]["id"].as_str().unwrap().to_string();

    let (_, pet) = app.authed("GET", &format!("/pets/{pet_id}"), None).await;
    assert_eq!(pet["data"]["available"], false);

    let (status, json) = app
        .authed(
            "POST",
            "/transactions/create",
            Some(json!({ "pet_id": pet_id, "price": 150000, "status": "pending" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/transactions/{transaction_id}"),
            Some(json!({ "status": "cancelled" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "cancelled");

    let (_, pet) = app.authed("GET", &format!("/pets/{pet_id}"), None).await;
    assert_eq!(pet["data"]["available"], true);
}

#[tokio::test]
async fn test_transaction_status_is_validated() {
    let app = TestApp::new();
    let pet_id = app.create_pet(&app.token).await;

    let (status, json) = app
        .authed(
            "POST",
            "/transactions/create",
            Some(json!({ "pet_id": pet_id, "price": 100, "status": "shipped" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Status must be one of the following: 'pending', 'done', 'cancelled'."
    );
}

#[tokio::test]
async fn test_product_transaction_groups_sales() {
    let app = TestApp::new();
    let product_id = app.create_product(10).await;

    let (status, json) = app
        .authed(
            "POST",
            "/transactions/create",
            Some(json!({ "type": "product", "price": 5000, "status": "done" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["type"], "product");
    let transaction_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed(
            "POST",
            "/product-sales/create",
            Some(json!({
                "product_id": product_id,
                "quantity": 2,
                "price": 2500,
                "transaction_id": transaction_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["transaction_id"], transaction_id.as_str());

    let (status, json) = app.authed("GET", "/product-sales", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = &json["data"][0];
    assert_eq!(listed["total"], 5000);
    assert_eq!(listed["product"]["id"], product_id.as_str());
    assert_eq!(listed["product"]["stock"], 8);
    assert_eq!(listed["transaction"]["id"], transaction_id.as_str());
    assert_eq!(listed["transaction"]["type"], "product");
}

#[tokio::test]
async fn test_pet_sale_links_transaction_and_pet() {
    let app = TestApp::new();
    let pet_id = app.create_pet(&token_for(UserId::new())).await;
    let (_, json) = app
        .authed(
            "POST",
            "/transactions/create",
            Some(json!({ "pet_id": pet_id, "price": 150000, "status": "done" })),
        )
        .await;
    let transaction_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed(
            "POST",
            "/pet-sales/create",
            Some(json!({ "transaction_id": transaction_id, "pet_id": pet_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["pet_id"], pet_id.as_str());

    let (status, _) = app
        .authed(
            "POST",
            "/pet-sales/create",
            Some(json!({ "transaction_id": uuid::Uuid::new_v4(), "pet_id": pet_id })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_business_delete_removes_image() {
    let app = TestApp::new();
    app.assets.put("business", "front.jpg", vec![0xff]).await;

    let (status, json) = app
        .authed(
            "POST",
            "/business",
            Some(json!({ "name": "Happy Paws", "image": "front.jpg" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let business_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .authed("DELETE", &format!("/business/{business_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!app.assets.contains("business", "front.jpg").await);
}

#[tokio::test]
async fn test_grooming_service_crud() {
    let app = TestApp::new();

    let (status, json) = app
        .authed(
            "POST",
            "/grooming-service/create",
            Some(json!({ "name": "Full groom", "price": 12000 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/grooming-service/update/{id}"),
            Some(json!({ "price": 15000 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["price"], 15000);

    let (status, _) = app
        .authed(
            "POST",
            "/grooming-service/create",
            Some(json!({ "name": "Bath", "price": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .authed("DELETE", &format!("/grooming-service/delete/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_pet_categories_gate_pet_listings() {
    let app = TestApp::new();

    let (status, _) = app
        .call("POST", "/pet-categories", None, Some(json!({ "name": "Dogs" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = app
        .authed("POST", "/pet-categories", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Category name is required.");

    let (status, json) = app
        .authed("POST", "/pet-categories", Some(json!({ "name": "Dogs" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Pet category added successfully");
    let category_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app.call("GET", "/pet-categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["name"], "Dogs");

    let pet = |category_id: String| {
        json!({ "pet": "Milo", "location": "Bandung", "price": 150000, "category_id": category_id })
    };
    let (status, json) = app
        .authed("POST", "/pets/create", Some(pet(uuid::Uuid::new_v4().to_string())))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);

    let (status, json) = app
        .authed("POST", "/pets/create", Some(pet(category_id.clone())))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["category_id"], category_id.as_str());

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/pet-categories/{category_id}"),
            Some(json!({ "name": "Puppies" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Puppies");
}

#[tokio::test]
async fn test_business_category_lifecycle() {
    let app = TestApp::new();
    app.assets
        .put("business_categories", "salon.png", vec![1])
        .await;

    let (status, json) = app
        .authed(
            "POST",
            "/businessCategory/create",
            Some(json!({ "name": "Salon", "image": "salon.png" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let category_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app.call("GET", "/businessCategory/all", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .authed(
            "POST",
            "/business",
            Some(json!({ "name": "Happy Paws", "business_category_id": uuid::Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app
        .authed(
            "POST",
            "/business",
            Some(json!({ "name": "Happy Paws", "business_category_id": category_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["business_category_id"], category_id.as_str());

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/businessCategory/update/{category_id}"),
            Some(json!({ "name": "Salons" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["image"], "salon.png");

    let (status, json) = app
        .authed(
            "DELETE",
            &format!("/businessCategory/delete/{category_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["message"],
        "Business category and associated image deleted successfully!"
    );
    assert!(!app.assets.contains("business_categories", "salon.png").await);

    let (status, _) = app
        .call("GET", &format!("/businessCategory/{category_id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn open_product_transaction(app: &TestApp) -> String {
    let (status, json) = app
        .authed(
            "POST",
            "/transactions/create",
            Some(json!({ "type": "product", "price": 12000, "status": "done" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    json["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_grooming_reservations_need_all_fields_and_a_transaction() {
    let app = TestApp::new();
    let transaction_id = open_product_transaction(&app).await;

    let (status, json) = app
        .authed(
            "POST",
            "/grooming-reservations/create",
            Some(json!({ "transaction_id": transaction_id, "price": 12000 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "All fields (transaction_id, price, schedule, service) are required."
    );

    let reservation = |transaction_id: &str| {
        json!({
            "transaction_id": transaction_id,
            "price": 12000,
            "schedule": "2026-05-01T10:00:00Z",
            "service": "Full groom"
        })
    };
    let (status, _) = app
        .authed(
            "POST",
            "/grooming-reservations/create",
            Some(reservation(&uuid::Uuid::new_v4().to_string())),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app
        .authed(
            "POST",
            "/grooming-reservations/create",
            Some(reservation(&transaction_id)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/grooming-reservations/{id}"),
            Some(json!({ "schedule": "2026-05-02T09:00:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["service"], "Full groom");

    let (status, _) = app
        .authed("DELETE", &format!("/grooming-reservations/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, json) = app.authed("GET", "/grooming-reservations", None).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_photography_services_and_sessions() {
    let app = TestApp::new();
    let transaction_id = open_product_transaction(&app).await;

    let (status, json) = app
        .authed(
            "POST",
            "/photography-service/create",
            Some(json!({ "name": "Studio portrait", "price": 20000 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let service_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed("GET", &format!("/photography-service/{service_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Studio portrait");
    let (_, json) = app.authed("GET", "/grooming-service", None).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let session = |status: &str| {
        json!({
            "transaction_id": transaction_id,
            "price": 20000,
            "schedule": "2026-06-10T15:30:00Z",
            "service": "Studio portrait",
            "status": status
        })
    };
    let (status, json) = app
        .authed("POST", "/photography/create", Some(session("shipped")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["message"],
        "Status must be one of the following: 'pending', 'done', 'cancelled'."
    );

    let (status, json) = app
        .authed("POST", "/photography/create", Some(session("pending")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let session_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .authed(
            "PUT",
            &format!("/photography/{session_id}"),
            Some(json!({ "status": "done" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "done");
}

#[tokio::test]
async fn test_event_participant_defaults_to_the_caller() {
    let app = TestApp::new();
    let caller = UserId::new();
    let token = token_for(caller);
    let transaction_id = open_product_transaction(&app).await;
    let (_, json) = app
        .authed("POST", "/business", Some(json!({ "name": "Paw Park" })))
        .await;
    let business_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = app
        .call(
            "POST",
            "/event-participants",
            Some(&token),
            Some(json!({ "transaction_id": transaction_id, "business_id": business_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["user_id"], caller.to_string());

    let (status, json) = app.call("GET", "/event-participants", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["business_id"], business_id.as_str());

    let (status, _) = app
        .call(
            "POST",
            "/event-participants",
            Some(&token),
            Some(json!({ "transaction_id": transaction_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_sale_counters() {
    let app = TestApp::new();
    let product_id = app.create_product(10).await;
    app.sell(&product_id, 1).await;

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("product_sales_recorded_total"));
}
