use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{DbStatus, Health, ServiceInfo};
use service::customer::{CustomerRepository, CustomerService};

use crate::envelope::ErrorBody;
use crate::openapi::ApiDoc;

pub mod customers;

/// Shared handler state. The service is built over a trait object so any
/// repository (store-backed or in-memory) can be injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService<dyn CustomerRepository>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self { customers: Arc::new(CustomerService::new(repo)), started_at: Instant::now() }
    }
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service banner")))]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::new(env!("CARGO_PKG_VERSION")))
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Server is running")))]
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health::ok(state.started_at.elapsed().as_secs_f64()))
}

/// Always 200; the body says whether the store answered.
#[utoipa::path(get, path = "/db-status", tag = "health", responses((status = 200, description = "Store connectivity")))]
pub async fn db_status(State(state): State<AppState>) -> Json<DbStatus> {
    Json(DbStatus::new(state.customers.store_connected().await))
}

async fn metrics() -> impl IntoResponse {
    common::metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Route not found")))
}

/// Router and timeout rejections come back with an empty body; give them the
/// same `{ success: false, error }` shape the handlers use.
async fn envelope_bare_errors(res: Response) -> Response {
    let message = match res.status() {
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        _ => return res,
    };
    let (mut parts, _) = res.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    (parts, Json(ErrorBody::new(message))).into_response()
}

/// Build the full application router: probes, docs, and the customer API
/// under `/api/customers`.
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let api = Router::new().nest("/customers", customers::router());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/db-status", get(db_status))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(envelope_bare_errors))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use service::customer::repository::mock::InMemoryCustomerRepository;
    use tower::ServiceExt;

    fn app() -> Router {
        let repo: Arc<dyn CustomerRepository> = Arc::new(InMemoryCustomerRepository::default());
        build_router(AppState::new(repo), CorsLayer::permissive(), Duration::from_secs(5))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, value)
    }

    #[tokio::test]
    async fn create_then_duplicate_conflicts() {
        let app = app();
        let (status, body) = call(&app, Method::POST, "/api/customers", Some(json!({"email": "a@x.com"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Customer created successfully");
        assert_eq!(body["data"]["email"], "a@x.com");
        assert_eq!(body["data"]["status"], "active");

        let (status, body) = call(&app, Method::POST, "/api/customers", Some(json!({"email": "a@x.com"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn create_without_email_is_bad_request() {
        let app = app();
        let (status, body) = call(&app, Method::POST, "/api/customers", Some(json!({"first_name": "Ada"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "email required");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = app();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/customers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_unknown_and_invalid_ids() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/api/customers/999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "customer not found"}));

        let (status, body) = call(&app, Method::GET, "/api/customers/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid customer ID");
    }

    #[tokio::test]
    async fn list_reports_count() {
        let app = app();
        let (_, body) = call(&app, Method::GET, "/api/customers", None).await;
        assert_eq!(body, json!({"success": true, "count": 0, "data": []}));

        for email in ["a@x.com", "b@x.com"] {
            call(&app, Method::POST, "/api/customers", Some(json!({"email": email}))).await;
        }
        let (status, body) = call(&app, Method::GET, "/api/customers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["customer_id"], 1);
        assert_eq!(body["data"][1]["customer_id"], 2);
    }

    #[tokio::test]
    async fn update_flows() {
        let app = app();
        call(&app, Method::POST, "/api/customers", Some(json!({"email": "a@x.com"}))).await;

        let (status, body) = call(&app, Method::PUT, "/api/customers/1", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "no data provided for update");

        let (status, _) = call(&app, Method::PUT, "/api/customers/42", Some(json!({"status": "vip"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) =
            call(&app, Method::PUT, "/api/customers/1", Some(json!({"first_name": "Ada", "customer_id": 7}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Customer updated successfully");
        assert_eq!(body["data"]["customer_id"], 1);
        assert_eq!(body["data"]["first_name"], "Ada");
    }

    #[tokio::test]
    async fn delete_twice() {
        let app = app();
        call(&app, Method::POST, "/api/customers", Some(json!({"email": "a@x.com"}))).await;

        let (status, body) = call(&app, Method::DELETE, "/api/customers/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "Customer deleted successfully"}));

        let (status, _) = call(&app, Method::DELETE, "/api/customers/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::GET, "/api/customers/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn probes_and_fallback() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");

        let (_, body) = call(&app, Method::GET, "/db-status", None).await;
        assert_eq!(body["database"], "Connected");

        let (_, body) = call(&app, Method::GET, "/", None).await;
        assert_eq!(body["endpoints"]["customers"], "/api/customers");

        let (status, body) = call(&app, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/customers/{id}"].is_object());

        let (status, body) = call(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unsupported_method_gets_error_envelope() {
        let app = app();
        call(&app, Method::POST, "/api/customers", Some(json!({"email": "a@x.com"}))).await;
        let (status, body) = call(&app, Method::PATCH, "/api/customers/1", Some(json!({"status": "vip"}))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"success": false, "error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn timed_out_request_gets_error_envelope() {
        let res = envelope_bare_errors(StatusCode::REQUEST_TIMEOUT.into_response()).await;
        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"success": false, "error": "Request timed out"}));

        let ok = envelope_bare_errors(StatusCode::NO_CONTENT.into_response()).await;
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn db_status_reports_disconnected_store() {
        let repo = Arc::new(InMemoryCustomerRepository::default());
        repo.fail_with(Some(models::errors::StoreError::new(
            models::errors::StoreErrorCode::Other("08006".into()),
            "down",
        )));
        let app = build_router(AppState::new(repo), CorsLayer::permissive(), Duration::from_secs(5));
        let (status, body) = call(&app, Method::GET, "/db-status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "Disconnected");

        let (status, body) = call(&app, Method::GET, "/api/customers", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "failed to list customers");
    }
}
