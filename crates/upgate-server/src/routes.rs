use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, header};
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use upgate_core::{UpdateEngine, UpdateRequest};
use upgate_crypto::{SignedResponse, SigningKey};

use crate::config::{RateLimit, ServerConfig};
use crate::error::ApiError;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Shared application state. Read-only after startup.
#[derive(Debug)]
pub struct AppState {
    pub engine: UpdateEngine,
    pub signing_key: SigningKey,
}

impl AppState {
    pub const fn new(engine: UpdateEngine, signing_key: SigningKey) -> Self {
        Self {
            engine,
            signing_key,
        }
    }

    pub fn from_config(config: &ServerConfig) -> upgate_core::Result<Self> {
        Ok(Self::new(
            UpdateEngine::new(config.engine.clone())?,
            config.signing_key.clone(),
        ))
    }
}

/// Update check body as sent by clients. Presence of the required fields is
/// checked by [`CheckBody::into_request`], not by deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckBody {
    pub app_id: Option<String>,
    pub current_version: Option<String>,
    /// Clients send this as either a string or a number.
    pub build_number: Option<serde_json::Value>,
}

impl CheckBody {
    /// Reject missing or empty `appId` / `currentVersion`.
    pub fn into_request(self) -> Result<UpdateRequest, ApiError> {
        let app_id = self.app_id.filter(|s| !s.is_empty());
        let current_version = self.current_version.filter(|s| !s.is_empty());
        let (Some(app_id), Some(current_version)) = (app_id, current_version) else {
            return Err(ApiError::MissingFields);
        };

        let build_number = match self.build_number {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        };

        Ok(UpdateRequest {
            app_id,
            current_version,
            build_number,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// `POST /check`: signed update decision for one app install.
pub async fn check(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CheckBody>, JsonRejection>,
) -> Result<Json<SignedResponse>, ApiError> {
    let Json(body) = body?;
    let request = body.into_request()?;
    let decision = state.engine.decide_request(&request)?;

    info!(
        app_id = %request.app_id,
        current_version = %request.current_version,
        min_version = %decision.version,
        update_required = decision.update_required,
        "update check"
    );

    Ok(Json(SignedResponse::sign(decision, &state.signing_key)))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "خادم التحديثات يعمل بشكل طبيعي",
    })
}

/// `GET /`: plain-text pointer to the real endpoints.
pub async fn root() -> &'static str {
    "مرحبًا بك في خادم التحديثات! استخدم /check للتحقق من التحديثات و /health للتحقق من حالة الخادم."
}

/// CORS: mirror the caller's origin and requested headers.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Limit `routes` per client IP. The peer address needs the server to run
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
fn rate_limited(routes: Router<Arc<AppState>>, limit: &RateLimit) -> Router<Arc<AppState>> {
    let mut builder = GovernorConfigBuilder::default();
    builder
        .per_millisecond(limit.replenish_interval_ms())
        .burst_size(limit.burst);

    let limited = if limit.trust_proxy_headers {
        builder
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .map(|governor| routes.clone().layer(GovernorLayer::new(Arc::new(governor))))
    } else {
        builder
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .map(|governor| routes.clone().layer(GovernorLayer::new(Arc::new(governor))))
    };

    limited.unwrap_or_else(|| {
        warn!(?limit, "invalid rate limit, serving without one");
        routes
    })
}

/// Build the router. The check routes are never cached and are optionally
/// rate limited per client IP.
pub fn build_router(state: Arc<AppState>, rate_limit: Option<&RateLimit>) -> Router {
    let mut check_routes: Router<Arc<AppState>> = Router::new()
        .route("/check", post(check))
        .route("/updates/check", post(check))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    if let Some(limit) = rate_limit {
        check_routes = rate_limited(check_routes, limit);
    }

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(check_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
