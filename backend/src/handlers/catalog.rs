//! HTTP handler for the initial UI catalog
//!
//! One call that fills the product/supplier dropdowns and the per-product
//! unit lists when the UI loads.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::services::{ProductService, SupplierService};
use crate::AppState;

#[derive(Serialize)]
pub struct CatalogResponse {
    pub products: Vec<String>,
    pub suppliers: Vec<String>,
    pub units_map: HashMap<String, Vec<String>>,
}

/// Product names, supplier names and the unit list per product
pub async fn get_catalog(State(state): State<AppState>) -> AppResult<Json<CatalogResponse>> {
    let products = ProductService::new(state.db.clone()).list().await?;
    let suppliers = SupplierService::new(state.db).list().await?;

    let mut units_map = HashMap::new();
    let mut product_names = Vec::with_capacity(products.len());
    for product in products {
        units_map.insert(product.name.clone(), product.valid_units);
        product_names.push(product.name);
    }

    Ok(Json(CatalogResponse {
        products: product_names,
        suppliers: suppliers.into_iter().map(|s| s.name).collect(),
        units_map,
    }))
}
