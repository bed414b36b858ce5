use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use ceylon_catalog::{CatalogFilter, CatalogItem, CatalogItemPatch, CatalogKind, NewCatalogItem};

use crate::{error::AppError, state::AppState};

/// Public read routes, mounted under `/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/{resource}", get(list_items))
        .route("/v1/{resource}/{id}", get(get_item))
}

/// Admin write routes, mounted under `/v1/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/{resource}", post(create_item))
        .route("/{resource}/{id}", put(update_item).delete(delete_item))
}

fn catalog_kind(resource: &str) -> Result<CatalogKind, AppError> {
    CatalogKind::from_resource(resource)
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown catalog resource: {}", resource)))
}

/// A malformed id cannot name an existing item.
fn item_id(kind: CatalogKind, id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFoundError(format!("{} not found: {}", kind, id)))
}

async fn list_items(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    filter: Result<Query<CatalogFilter>, QueryRejection>,
) -> Result<Json<Vec<CatalogItem>>, AppError> {
    let kind = catalog_kind(&resource)?;
    let Query(filter) = filter?;
    Ok(Json(state.catalog.list(kind, &filter).await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<CatalogItem>, AppError> {
    let kind = catalog_kind(&resource)?;
    let id = item_id(kind, &id)?;
    Ok(Json(state.catalog.get(kind, id).await?))
}

async fn create_item(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    payload: Result<Json<NewCatalogItem>, JsonRejection>,
) -> Result<(StatusCode, Json<CatalogItem>), AppError> {
    let kind = catalog_kind(&resource)?;
    let Json(input) = payload?;
    let item = state.catalog.create(kind, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    payload: Result<Json<CatalogItemPatch>, JsonRejection>,
) -> Result<Json<CatalogItem>, AppError> {
    let kind = catalog_kind(&resource)?;
    let id = item_id(kind, &id)?;
    let Json(patch) = payload?;
    Ok(Json(state.catalog.update(kind, id, patch).await?))
}

async fn delete_item(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let kind = catalog_kind(&resource)?;
    let id = item_id(kind, &id)?;
    state.catalog.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
