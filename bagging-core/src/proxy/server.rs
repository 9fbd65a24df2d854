//! axum router and handlers for the backend proxy.

use super::{BACKEND_UNAVAILABLE, ErrorBody, METHOD_NOT_ALLOWED};
use crate::backend::{BackendClient, DATASETS_PATH, HEALTH_PATH, TRAIN_MODEL_PATH};
use crate::config::ExplorerConfig;
use crate::error::BackendError;
use crate::sidebar::SidebarState;
use crate::synthetic::synthetic_result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared proxy reference for axum handlers.
pub type SharedProxy = Arc<ProxyState>;

/// Immutable handler state: backend client plus configuration.
#[derive(Debug)]
pub struct ProxyState {
    config: ExplorerConfig,
    client: BackendClient,
    started_at: chrono::DateTime<Utc>,
    synthetic_requests: AtomicU64,
}

impl ProxyState {
    pub fn new(config: ExplorerConfig) -> Result<Self, BackendError> {
        let client = BackendClient::new(&config.backend)?;
        Ok(Self {
            config,
            client,
            started_at: Utc::now(),
            synthetic_requests: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// RNG for one synthetic response. A configured seed is offset by the
    /// request count, so seeded runs are reproducible without sharing state.
    fn synthetic_rng(&self) -> StdRng {
        let n = self.synthetic_requests.fetch_add(1, Ordering::Relaxed);
        match self.config.demo.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(n)),
            None => StdRng::from_entropy(),
        }
    }
}

/// Build the proxy router.
pub fn router(state: SharedProxy) -> Router {
    Router::new()
        .route(
            DATASETS_PATH,
            post(datasets_handler).fallback(method_not_allowed),
        )
        .route(
            TRAIN_MODEL_PATH,
            post(train_model_handler).fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(status: StatusCode, body: ErrorBody) -> Response {
    (status, Json(body)).into_response()
}

async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorBody::new(METHOD_NOT_ALLOWED),
    )
}

/// Parse a request body as JSON. An empty body reads as `{}`.
fn parse_body(bytes: &Bytes) -> Result<Value, Response> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| {
        error_response(
            StatusCode::BAD_REQUEST,
            ErrorBody::new("Invalid JSON body").with_details(e.to_string()),
        )
    })
}

fn status_or_ok(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::OK)
}

/// `POST /api/datasets`: forward to the backend, 500 on any failure.
async fn datasets_handler(State(proxy): State<SharedProxy>, body: Bytes) -> Response {
    let payload = match parse_body(&body) {
        Ok(v) => v,
        Err(response) => return response,
    };

    match proxy.client.post_json(DATASETS_PATH, &payload).await {
        Ok((status, reply)) => {
            info!(status, "Dataset request forwarded");
            (status_or_ok(status), Json(reply)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Dataset request failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(BACKEND_UNAVAILABLE).with_details(e.to_string()),
            )
        }
    }
}

/// `POST /api/train-model`: forward to the backend, or answer with demo data.
async fn train_model_handler(State(proxy): State<SharedProxy>, body: Bytes) -> Response {
    let payload = match parse_body(&body) {
        Ok(v) => v,
        Err(response) => return response,
    };

    match proxy.client.post_json(TRAIN_MODEL_PATH, &payload).await {
        Ok((status, mut reply)) => {
            if let Some(obj) = reply.as_object_mut() {
                obj.entry("source")
                    .or_insert_with(|| Value::from("backend"));
            }
            info!(status, "Training request forwarded");
            (status_or_ok(status), Json(reply)).into_response()
        }
        Err(e) if proxy.config.demo.synthetic_fallback => {
            warn!(error = %e, "Training backend unavailable, returning demo data");
            let config = SidebarState::from_payload(&payload);
            let result = synthetic_result(&config, &mut proxy.synthetic_rng());
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Training request failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                ErrorBody::new(BACKEND_UNAVAILABLE).with_details(e.to_string()),
            )
        }
    }
}

/// `GET /api/health`
async fn health_handler(State(proxy): State<SharedProxy>) -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "backend_url": proxy.client.base_url(),
        "synthetic_fallback": proxy.config.demo.synthetic_fallback,
        "uptime_secs": proxy.uptime_secs(),
    });
    Json(body)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down proxy");
}

/// Start the proxy on the configured address.
///
/// Runs until Ctrl-C.
pub async fn run(proxy: SharedProxy) -> Result<(), std::io::Error> {
    let addr = format!("{}:{}", proxy.config.server.host, proxy.config.server.port);
    let backend_url = proxy.client.base_url().to_string();
    let app = router(proxy);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = addr.as_str(), backend = backend_url.as_str(), "Proxy listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    /// A proxy pointed at a port nothing listens on.
    fn offline_proxy(synthetic_fallback: bool) -> SharedProxy {
        let mut config = ExplorerConfig::default();
        config.backend.base_url = "http://127.0.0.1:1".into();
        config.backend.timeout_secs = 2;
        config.demo.synthetic_fallback = synthetic_fallback;
        config.demo.seed = Some(5);
        Arc::new(ProxyState::new(config).unwrap())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn test_state_construction() {
        let proxy = offline_proxy(true);
        assert_eq!(proxy.client().base_url(), "http://127.0.0.1:1");
        assert!(proxy.uptime_secs() >= 0);
    }

    #[test]
    fn test_seeded_synthetic_rng_varies_per_request() {
        use rand::Rng;
        let proxy = offline_proxy(true);
        let a: u64 = proxy.synthetic_rng().gen_range(0..u64::MAX);
        let b: u64 = proxy.synthetic_rng().gen_range(0..u64::MAX);
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_body_empty_is_object() {
        let value = parse_body(&Bytes::from_static(b"  ")).unwrap();
        assert!(value.as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(offline_proxy(true));
        let req = Request::builder()
            .uri(HEALTH_PATH)
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["backend_url"], "http://127.0.0.1:1");
        assert_eq!(json["synthetic_fallback"], true);
    }

    #[tokio::test]
    async fn test_get_on_train_model_is_405() {
        let app = router(offline_proxy(true));
        let req = Request::builder()
            .method("GET")
            .uri(TRAIN_MODEL_PATH)
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(resp).await["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_offline_training_returns_synthetic() {
        let app = router(offline_proxy(true));
        let req = post_request(
            TRAIN_MODEL_PATH,
            r#"{"nEstimators": 30, "compareWith": ["XGBoost"]}"#,
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["source"], "synthetic");
        let scores = json["ensemble_results"].as_object().unwrap();
        assert!(scores.contains_key("XGBoost"));
        assert!(!scores.contains_key("AdaBoost"));
    }

    #[tokio::test]
    async fn test_offline_training_without_fallback_is_502() {
        let app = router(offline_proxy(false));
        let resp = app.oneshot(post_request(TRAIN_MODEL_PATH, "{}")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(resp).await["error"], BACKEND_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invalid_json_body_is_400() {
        let app = router(offline_proxy(true));
        let resp = app
            .oneshot(post_request(DATASETS_PATH, "dataOption=iris"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Invalid JSON body");
        assert!(json["details"].is_string());
    }
}
