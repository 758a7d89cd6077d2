//! Purchase recording and history

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{PurchaseCreated, PurchaseInput, PurchaseRecord};

/// Purchase store service
#[derive(Clone)]
pub struct PurchaseService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    product: String,
    supplier: Option<String>,
    quantity: f64,
    unit: String,
    total_price: f64,
    purchase_date: String,
    discount_note: Option<String>,
}

impl PurchaseService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Record a purchase. Product and supplier names must resolve to
    /// existing rows; an unknown name is a structured not-found failure.
    pub async fn record(&self, input: PurchaseInput) -> AppResult<PurchaseCreated> {
        shared::validate_purchase(&input)
            .map_err(|msg| AppError::validation("purchase", msg))?;

        let product_id =
            sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE name = ?")
                .bind(input.product.trim())
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let supplier_id = match input.supplier.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(
                sqlx::query_scalar::<_, i64>("SELECT id FROM suppliers WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.db)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?,
            ),
            _ => None,
        };

        let purchase_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO purchases (product_id, supplier_id, quantity, unit, total_price, purchase_date, discount_note)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(product_id)
        .bind(supplier_id)
        .bind(input.quantity)
        .bind(input.unit.trim())
        .bind(input.total_price)
        .bind(input.purchase_date.trim())
        .bind(input.discount_note.as_deref())
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Purchase recorded with id {}", purchase_id);
        Ok(PurchaseCreated { purchase_id })
    }

    /// Most recent purchases, newest first.
    pub async fn history(&self, limit: i64) -> AppResult<Vec<PurchaseRecord>> {
        let rows = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT
                c.id,
                p.name AS product,
                s.name AS supplier,
                c.quantity,
                c.unit,
                c.total_price,
                c.purchase_date,
                c.discount_note
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            LEFT JOIN suppliers s ON c.supplier_id = s.id
            ORDER BY c.purchase_date DESC, c.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| PurchaseRecord {
                id: row.id,
                product: row.product,
                supplier: row.supplier.unwrap_or_else(|| "N/A".to_string()),
                quantity: row.quantity,
                unit: row.unit,
                total_price: row.total_price,
                purchase_date: row.purchase_date,
                discount_note: row.discount_note.unwrap_or_else(|| "N/A".to_string()),
            })
            .collect())
    }
}
