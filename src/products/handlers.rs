use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    dto::MessageResponse,
    error::{path_id, AppError, AppResult},
    products::{
        dto::{ProductRequest, UpdatedProductResponse},
        repo_types::Product,
    },
    state::AppState,
};

const PRODUCT_NOT_FOUND: &str = "Product not found.";

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
}

#[instrument(skip(state))]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products.list().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let product = payload.validate()?;

    let created = state.products.create(product).await?;
    info!(product_id = created.id, "product created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> AppResult<Json<UpdatedProductResponse>> {
    let id = path_id(id, PRODUCT_NOT_FOUND)?;
    let Json(payload) = payload?;
    let product = payload.validate()?;

    let updated = state
        .products
        .update(id, product)
        .await?
        .ok_or(AppError::NotFound(PRODUCT_NOT_FOUND))?;

    info!(product_id = id, "product updated");
    Ok(Json(UpdatedProductResponse {
        product: updated,
        message: "Product updated successfully.",
    }))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = path_id(id, PRODUCT_NOT_FOUND)?;
    if !state.products.delete(id).await? {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND));
    }

    info!(product_id = id, "product deleted");
    Ok(Json(MessageResponse {
        message: "Product deleted successfully.",
    }))
}
