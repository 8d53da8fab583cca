use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use utoipa::OpenApi;
use uuid::Uuid;

use super::{dto::DatasetDto, errors::ApiError};
use crate::datasets::{DatasetAttributes, DatasetFilter, DatasetService};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A malformed identifier behaves exactly like an unknown one.
fn parse_dataset_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Bodies are taken as raw text and parsed here so that malformed JSON
/// (or JSON with wrongly-typed fields) short-circuits to a 400 before any
/// validation or store access happens.
fn parse_json_body(body: &str) -> Result<DatasetAttributes, ApiError> {
    serde_json::from_str(body).map_err(|_| ApiError::InvalidJson)
}

/// Origin for the `Location` header, reconstructed from the request's
/// `Host` header. The service itself never terminates TLS, hence `http`.
fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List datasets, optionally narrowed by per-field prefix filters.
#[utoipa::path(
    get,
    path = "/api/database",
    params(DatasetFilter),
    responses(
        (status = 200, description = "Matching datasets", body = Vec<DatasetDto>),
        (status = 500, description = "Store unavailable"),
    ),
    tag = "datasets"
)]
pub async fn list_datasets(
    State(service): State<DatasetService>,
    Query(filter): Query<DatasetFilter>,
) -> Result<Json<Vec<DatasetDto>>, ApiError> {
    let rows = service.list(&filter).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Fetch a single dataset by id.
#[utoipa::path(
    get,
    path = "/api/dataset/{id}",
    params(("id" = String, Path, description = "Dataset identifier (UUID)")),
    responses(
        (status = 200, description = "The dataset", body = DatasetDto),
        (status = 404, description = "No dataset with this id"),
        (status = 500, description = "Store unavailable"),
    ),
    tag = "datasets"
)]
pub async fn get_dataset(
    State(service): State<DatasetService>,
    Path(id): Path<String>,
) -> Result<Json<DatasetDto>, ApiError> {
    let id = parse_dataset_id(&id)?;
    let dataset = service.get(id).await?;
    Ok(Json(dataset.into()))
}

/// Create a dataset. Responds with an empty body; the new resource's URL is
/// carried in the `Location` header.
#[utoipa::path(
    post,
    path = "/api/database",
    request_body = DatasetAttributes,
    responses(
        (status = 201, description = "Created; Location header set"),
        (status = 400, description = "Body is not valid JSON"),
        (status = 422, description = "Validation failed", body = DatasetDto),
        (status = 500, description = "Store unavailable"),
    ),
    tag = "datasets"
)]
pub async fn create_dataset(
    State(service): State<DatasetService>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let attrs = parse_json_body(&body)?;
    let dataset = service.create(attrs).await?;

    // Historical path: clients resolve created resources under
    // /api/database/{id} even though reads live at /api/dataset/{id}.
    let location = format!("{}/api/database/{}", base_url(&headers), dataset.id);
    Ok((
        StatusCode::CREATED,
        [
            (header::LOCATION, location),
            (header::CONTENT_TYPE, "application/json".to_owned()),
        ],
    ))
}

/// Partially update a dataset: only the supplied fields change.
#[utoipa::path(
    patch,
    path = "/api/dataset/{id}",
    params(("id" = String, Path, description = "Dataset identifier (UUID)")),
    request_body = DatasetAttributes,
    responses(
        (status = 200, description = "The updated dataset", body = DatasetDto),
        (status = 400, description = "Body is not valid JSON"),
        (status = 404, description = "No dataset with this id"),
        (status = 422, description = "Validation failed", body = DatasetDto),
        (status = 500, description = "Store unavailable"),
    ),
    tag = "datasets"
)]
pub async fn update_dataset(
    State(service): State<DatasetService>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<DatasetDto>, ApiError> {
    let id = parse_dataset_id(&id)?;
    // An unknown id wins over a malformed body, so resolve it first.
    service.get(id).await?;

    let attrs = parse_json_body(&body)?;
    let dataset = service.update(id, attrs).await?;
    Ok(Json(dataset.into()))
}

/// Delete a dataset. Idempotent: deleting an unknown (or malformed) id is
/// still a 204.
#[utoipa::path(
    delete,
    path = "/api/dataset/{id}",
    params(("id" = String, Path, description = "Dataset identifier (UUID)")),
    responses(
        (status = 204, description = "Deleted (or never existed)"),
        (status = 500, description = "Store unavailable"),
    ),
    tag = "datasets"
)]
pub async fn delete_dataset(
    State(service): State<DatasetService>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Ok(id) = id.parse::<Uuid>() {
        service.delete(id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// System routes
// ---------------------------------------------------------------------------

/// Root banner. The only non-JSON response in the API.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = String, content_type = "text/plain")),
    tag = "system"
)]
pub async fn root() -> &'static str {
    "Database"
}

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy")),
    tag = "system"
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(
        list_datasets,
        get_dataset,
        create_dataset,
        update_dataset,
        delete_dataset,
        root,
        health,
    ),
    components(schemas(DatasetDto, DatasetAttributes)),
    tags(
        (name = "datasets", description = "Sensor dataset CRUD and filtering"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Sensor Database API",
        version = "0.1.0",
        description = "REST API for storing and querying sensor readings"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
