//! Route definitions for the Bar Stock Tracker

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Initial catalog for the UI dropdowns
        .route("/catalog", get(handlers::get_catalog))
        // Purchase recording and history
        .nest("/purchases", purchase_routes())
        // Product management
        .nest("/products", product_routes())
        // Supplier management
        .nest("/suppliers", supplier_routes())
        // Operational notes
        .nest("/notes", note_routes())
        // Analytics engines
        .nest("/analytics", analytics_routes())
        // Alert engine
        .nest("/alerts", alert_routes())
        // Dynamic configuration
        .nest("/config", config_routes())
        // Database backups
        .nest("/backups", backup_routes())
}

/// Purchase routes
fn purchase_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::get_purchase_history).post(handlers::record_purchase),
    )
}

/// Product management routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            axum::routing::put(handlers::update_product).delete(handlers::delete_product),
        )
}

/// Supplier management routes
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

/// Note routes
fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notes).post(handlers::create_note))
        .route(
            "/:note_id",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
}

/// Analytics routes
fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/volumes", get(handlers::get_volume_analysis))
        .route("/suppliers/:product", get(handlers::compare_suppliers))
        .route("/trend/:product", get(handlers::get_price_trend))
        .route("/similar", get(handlers::find_similar_purchases))
        .route("/summary", get(handlers::get_summary))
}

/// Alert routes
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::generate_alerts))
        .route("/stats", get(handlers::get_alert_stats))
}

/// Configuration routes
fn config_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_config))
        .route(
            "/:key",
            get(handlers::get_config_entry).put(handlers::set_config_entry),
        )
}

/// Backup routes
fn backup_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_backups).post(handlers::create_backup),
        )
        .route("/stats", get(handlers::get_backup_stats))
        .route("/cleanup", post(handlers::cleanup_backups))
        .route("/restore", post(handlers::restore_backup))
        .route("/verify", get(handlers::verify_backup))
        .route("/run", post(handlers::run_automatic_backup))
}
