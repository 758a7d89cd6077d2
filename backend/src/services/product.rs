//! Product catalog management
//!
//! Valid units live in the ordered `product_units` relation; the row at
//! position 0 is the primary unit used by aggregated views.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductInput};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: SqlitePool,
}

/// A product with its purchase count for the management view
#[derive(Debug, Serialize)]
pub struct ProductDetails {
    pub id: i64,
    pub name: String,
    pub valid_units: Vec<String>,
    pub total_purchases: i64,
}

impl ProductService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all products with their unit lists and purchase counts.
    pub async fn list(&self) -> AppResult<Vec<ProductDetails>> {
        let rows = sqlx::query_as::<_, (i64, String, i64)>(
            r#"
            SELECT
                id,
                name,
                (SELECT COUNT(*) FROM purchases WHERE product_id = p.id) AS total_purchases
            FROM products p
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut units = self.unit_map().await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, total_purchases)| ProductDetails {
                valid_units: units.remove(&id).unwrap_or_default(),
                id,
                name,
                total_purchases,
            })
            .collect())
    }

    /// Create a new product with its ordered unit list.
    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        let name = self.validate_input(&input)?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE name = ?")
            .bind(&name)
            .fetch_optional(&self.db)
            .await?;
        if exists.is_some() {
            return Err(AppError::DuplicateEntry("product name".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO products (name) VALUES (?) RETURNING id",
        )
        .bind(&name)
        .fetch_one(&mut *tx)
        .await?;

        for (position, unit) in input.valid_units.iter().enumerate() {
            sqlx::query("INSERT INTO product_units (product_id, position, unit) VALUES (?, ?, ?)")
                .bind(id)
                .bind(position as i64)
                .bind(unit.trim())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Product created: {} (id {})", name, id);
        Ok(Product {
            id,
            name,
            valid_units: input.valid_units,
        })
    }

    /// Update an existing product, replacing its unit list.
    pub async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        let name = self.validate_input(&input)?;

        let current = sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let clash = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM products WHERE name = ? AND id != ?",
        )
        .bind(&name)
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        if clash.is_some() {
            return Err(AppError::DuplicateEntry("product name".to_string()));
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE products SET name = ? WHERE id = ?")
            .bind(&name)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM product_units WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (position, unit) in input.valid_units.iter().enumerate() {
            sqlx::query("INSERT INTO product_units (product_id, position, unit) VALUES (?, ?, ?)")
                .bind(id)
                .bind(position as i64)
                .bind(unit.trim())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!("Product updated: {} -> {}", current, name);
        Ok(Product {
            id,
            name,
            valid_units: input.valid_units,
        })
    }

    /// Delete a product. Refused while purchases still reference it.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let references =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE product_id = ?")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if references > 0 {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
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

        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!("Product deleted: {}", name);
        Ok(())
    }

    async fn unit_map(&self) -> AppResult<HashMap<i64, Vec<String>>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT product_id, unit FROM product_units ORDER BY product_id, position",
        )
        .fetch_all(&self.db)
        .await?;

        let mut map: HashMap<i64, Vec<String>> = HashMap::new();
        for (product_id, unit) in rows {
            map.entry(product_id).or_default().push(unit);
        }
        Ok(map)
    }

    fn validate_input(&self, input: &ProductInput) -> AppResult<String> {
        shared::validate_product_name(&input.name)
            .map_err(|msg| AppError::validation("name", msg))?;
        if input.valid_units.is_empty()
            || input.valid_units.iter().any(|u| u.trim().is_empty())
        {
            return Err(AppError::validation(
                "valid_units",
                "At least one non-empty measurement unit is required",
            ));
        }
        Ok(input.name.trim().to_string())
    }
}
