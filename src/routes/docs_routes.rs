use crate::handlers::image_handler;
use crate::models::{ImageEntry, ImageListResponse, MessageResponse, UploadForm, UploadResponse};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        image_handler::upload_image,
        image_handler::get_images,
        image_handler::delete_image
    ),
    components(schemas(ImageEntry, ImageListResponse, MessageResponse, UploadForm, UploadResponse)),
    tags((name = "images", description = "Image upload, listing and deletion"))
)]
pub struct ApiDoc;

/// 创建 Swagger UI 路由
pub fn create_docs_routes() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
