pub mod docs_routes;
pub mod health_routes;
pub mod image_routes;

pub use docs_routes::*;
pub use health_routes::*;
pub use image_routes::*;

use crate::middleware::{cors_layer, logging};
use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;

/// Build the full application router.
pub fn create_app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(create_health_routes())
        .merge(create_image_routes(body_limit_bytes))
        .with_state(state)
        .merge(create_docs_routes())
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer())
                .layer(axum::middleware::from_fn(logging::log_requests)),
        )
}
