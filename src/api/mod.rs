pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{routing::get, Router};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::datasets::DatasetService;
use handlers::ApiDoc;

pub fn router(service: DatasetService) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route(
            "/api/database",
            get(handlers::list_datasets).post(handlers::create_dataset),
        )
        .route(
            "/api/dataset/{id}",
            get(handlers::get_dataset)
                .patch(handlers::update_dataset)
                .delete(handlers::delete_dataset),
        )
        .with_state(service)
        .split_for_parts();

    router
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
}
