use crate::handlers::{delete_image, get_images, upload_image};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{delete, get, post},
    Router,
};

/// 创建图片上传、列表、删除路由
pub fn create_image_routes(body_limit_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload_image).layer(DefaultBodyLimit::max(body_limit_bytes)),
        )
        .route("/get-images", get(get_images))
        .route("/delete-image/{public_id}", delete(delete_image))
}
