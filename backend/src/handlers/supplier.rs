//! HTTP handlers for supplier management

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::models::{Supplier, SupplierInput};
use crate::services::supplier::{SupplierDetails, SupplierService};
use crate::AppState;

/// List all suppliers with purchase counts
pub async fn list_suppliers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SupplierDetails>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list().await?;
    Ok(Json(suppliers))
}

/// Get a single supplier
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get(supplier_id).await?;
    Ok(Json(supplier))
}

/// Create a new supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;
    Ok(Json(supplier))
}

/// Update an existing supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.update(supplier_id, input).await?;
    Ok(Json(supplier))
}

/// Delete a supplier (refused while purchases reference it)
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = SupplierService::new(state.db);
    service.delete(supplier_id).await?;
    Ok(Json(()))
}
