//! HTTP handlers for product management

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::models::{Product, ProductInput};
use crate::services::product::{ProductDetails, ProductService};
use crate::AppState;

/// List all products with units and purchase counts
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductDetails>>> {
    let service = ProductService::new(state.db);
    let products = service.list().await?;
    Ok(Json(products))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok(Json(product))
}

/// Update an existing product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product (refused while purchases reference it)
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(()))
}
