use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The frontend calls the API straight from the browser.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}
