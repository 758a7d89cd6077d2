//! Supplier management

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{Supplier, SupplierInput};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: SqlitePool,
}

/// A supplier with its purchase count for the management view
#[derive(Debug, Serialize)]
pub struct SupplierDetails {
    pub id: i64,
    pub name: String,
    pub total_purchases: i64,
}

impl SupplierService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all suppliers with purchase counts.
    pub async fn list(&self) -> AppResult<Vec<SupplierDetails>> {
        let rows = sqlx::query_as::<_, (i64, String, i64)>(
            r#"
            SELECT
                id,
                name,
                (SELECT COUNT(*) FROM purchases WHERE supplier_id = s.id) AS total_purchases
            FROM suppliers s
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, total_purchases)| SupplierDetails {
                id,
                name,
                total_purchases,
            })
            .collect())
    }

    /// Fetch a supplier by id.
    pub async fn get(&self, id: i64) -> AppResult<Supplier> {
        let (id, name) =
            sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM suppliers WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(Supplier { id, name })
    }

    /// Create a new supplier.
    pub async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        let name = self.validate_name(&input.name)?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM suppliers WHERE name = ?")
            .bind(&name)
            .fetch_optional(&self.db)
            .await?;
        if exists.is_some() {
            return Err(AppError::DuplicateEntry("supplier name".to_string()));
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO suppliers (name) VALUES (?) RETURNING id",
        )
        .bind(&name)
        .fetch_one(&self.db)
        .await?;

        tracing::info!("Supplier created: {} (id {})", name, id);
        Ok(Supplier { id, name })
    }

    /// Update a supplier's name.
    pub async fn update(&self, id: i64, input: SupplierInput) -> AppResult<Supplier> {
        let name = self.validate_name(&input.name)?;

        let current = sqlx::query_scalar::<_, String>("SELECT name FROM suppliers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let clash = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM suppliers WHERE name = ? AND id != ?",
        )
        .bind(&name)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        if clash.is_some() {
            return Err(AppError::DuplicateEntry("supplier name".to_string()));
        }

        sqlx::query("UPDATE suppliers SET name = ? WHERE id = ?")
            .bind(&name)
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!("Supplier updated: {} -> {}", current, name);
        Ok(Supplier { id, name })
    }

    /// Delete a supplier. Refused while purchases still reference it.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM suppliers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let references =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE supplier_id = ?")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if references > 0 {
            return Err(AppError::Conflict {
                resource: "supplier".to_string(),
                message: format!(
                    "Cannot delete '{}': {} purchases reference it",
                    name, references
                ),
                message_es: format!(
                    "No se puede eliminar '{}': tiene {} compras asociadas",
                    name, references
                ),
            });
        }

        sqlx::query("DELETE FROM suppliers WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!("Supplier deleted: {}", name);
        Ok(())
    }

    fn validate_name(&self, name: &str) -> AppResult<String> {
        shared::validate_supplier_name(name).map_err(|msg| AppError::validation("name", msg))?;
        Ok(name.trim().to_string())
    }
}
