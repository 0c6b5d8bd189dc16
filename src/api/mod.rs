pub mod models;
pub mod thoughts;

// Re-exports
pub use models::*;

use axum::{extract::State, http::Method, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const ROOT_ENDPOINTS: &[EndpointDescriptor] = &[
    EndpointDescriptor {
        path: "/",
        methods: &["GET"],
    },
    EndpointDescriptor {
        path: "/health",
        methods: &["GET"],
    },
];

/// Full application router: routes, shared state, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_endpoints_handler))
        .route("/health", get(health_handler))
        .merge(thoughts::routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

/// Any origin may call the API.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

pub async fn list_endpoints_handler() -> Json<Vec<&'static EndpointDescriptor>> {
    Json(ROOT_ENDPOINTS.iter().chain(thoughts::ENDPOINTS).collect())
}

pub async fn health_handler(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let total_thoughts = state.store.count().await?;
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_thoughts,
    }))
}
