//! Purchase analytics: volume aggregation, supplier comparison, price
//! trends, similarity search, and the summary dashboard.
//!
//! Every operation reads straight from the store on demand; nothing is
//! cached or materialized. Store-connectivity failures are logged and
//! degrade to an empty result, which the bridge layer passes through
//! unchanged.

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use sqlx::SqlitePool;

use shared::{round2, round4, DEFAULT_UNIT, NO_SUPPLIER};

use crate::error::{AppError, AppResult};

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    db: SqlitePool,
}

/// Aggregated purchase statistics for one product over a date range
#[derive(Debug, Serialize)]
pub struct ProductVolumeStat {
    pub product: String,
    pub num_purchases: i64,
    pub total_volume: f64,
    pub unit: String,
    pub total_spend: f64,
    pub avg_unit_price: f64,
    pub best_unit_price: f64,
    pub worst_unit_price: f64,
    /// (worst unit price - best unit price) x total quantity
    pub potential_savings: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct VolumeRow {
    product: String,
    unit: Option<String>,
    num_purchases: i64,
    total_volume: f64,
    avg_price: f64,
    min_price: f64,
    max_price: f64,
    total_spend: f64,
}

/// Per-supplier price statistics for one product
#[derive(Debug, Serialize)]
pub struct SupplierComparison {
    pub supplier: String,
    pub avg_unit_price: f64,
    pub num_purchases: i64,
    pub total_volume: f64,
    pub last_purchase: String,
    pub min_unit_price: f64,
    pub max_unit_price: f64,
    pub price_spread: f64,
    pub is_best: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct ComparisonRow {
    supplier: String,
    avg_price: f64,
    num_purchases: i64,
    total_volume: f64,
    last_purchase: String,
    min_price: f64,
    max_price: f64,
}

/// One point in a product's price history
#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub supplier: String,
}

#[derive(Debug, sqlx::FromRow)]
struct TrendRow {
    date: String,
    unit_price: f64,
    quantity: f64,
    supplier: Option<String>,
}

/// A historical purchase close to a product's running average price
#[derive(Debug, Serialize)]
pub struct SimilarPurchase {
    pub date: String,
    pub quantity: f64,
    pub total_price: f64,
    pub unit_price: f64,
    pub supplier: String,
    pub discount_note: String,
}

#[derive(Debug, sqlx::FromRow)]
struct SimilarRow {
    date: String,
    quantity: f64,
    total_price: f64,
    unit_price: f64,
    supplier: Option<String>,
    discount_note: Option<String>,
}

/// Overall purchasing summary for the dashboard
#[derive(Debug, Default, Serialize)]
pub struct PurchasingSummary {
    pub total_purchases: i64,
    pub total_spend: f64,
    pub top_products: Vec<TopProduct>,
    pub recent_purchases_7d: i64,
    pub recent_spend_7d: f64,
    pub top_suppliers: Vec<TopSupplier>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub name: String,
    pub purchases: i64,
    pub volume: f64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopSupplier {
    pub name: String,
    pub purchases: i64,
}

/// Unit price expression with a guard against bad rows: quantity is
/// validated as positive on insert, but a derived price must never divide
/// by zero.
const UNIT_PRICE_SQL: &str =
    "CASE WHEN c.quantity > 0 THEN c.total_price / c.quantity ELSE 0 END";

impl AnalyticsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Aggregate purchase volumes and unit prices per product over an
    /// inclusive date range, optionally restricted to one product name.
    /// Ordered by total spend, highest first.
    pub async fn analyze_volumes(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        product: Option<&str>,
    ) -> Vec<ProductVolumeStat> {
        tracing::info!(
            "Analyzing volumes from {} to {}, product: {}",
            start,
            end,
            product.unwrap_or("all")
        );
        match self.volumes(start, end, product).await {
            Ok(stats) => {
                tracing::info!("Volume analysis done: {} products", stats.len());
                stats
            }
            Err(e) => {
                tracing::error!("Volume analysis failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn volumes(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        product: Option<&str>,
    ) -> AppResult<Vec<ProductVolumeStat>> {
        let mut sql = format!(
            r#"
            SELECT
                p.name AS product,
                (SELECT pu.unit FROM product_units pu
                 WHERE pu.product_id = p.id
                 ORDER BY pu.position LIMIT 1) AS unit,
                COUNT(*) AS num_purchases,
                SUM(c.quantity) AS total_volume,
                AVG({expr}) AS avg_price,
                MIN({expr}) AS min_price,
                MAX({expr}) AS max_price,
                SUM(c.total_price) AS total_spend
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            WHERE c.purchase_date BETWEEN ? AND ?
            "#,
            expr = UNIT_PRICE_SQL
        );
        if product.is_some() {
            sql.push_str(" AND p.name = ?");
        }
        sql.push_str(" GROUP BY p.name ORDER BY total_spend DESC");

        let mut query = sqlx::query_as::<_, VolumeRow>(&sql).bind(start).bind(end);
        if let Some(name) = product {
            query = query.bind(name);
        }

        let rows = query.fetch_all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|row| ProductVolumeStat {
                product: row.product,
                num_purchases: row.num_purchases,
                total_volume: round2(row.total_volume),
                unit: row.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
                total_spend: round2(row.total_spend),
                avg_unit_price: round4(row.avg_price),
                best_unit_price: round4(row.min_price),
                worst_unit_price: round4(row.max_price),
                potential_savings: round2((row.max_price - row.min_price) * row.total_volume),
            })
            .collect())
    }

    /// Compare suppliers for a product over the full purchase history,
    /// cheapest average unit price first. Suppliers within 0.001 of the
    /// minimum average are flagged as best (floating-point tolerance, so
    /// near-identical prices can all carry the flag).
    ///
    /// `recent_n` is accepted for the bridge signature but not applied yet;
    /// it is reserved for limiting the window to the N most recent
    /// purchases.
    pub async fn compare_suppliers(
        &self,
        product: &str,
        _recent_n: i64,
    ) -> Vec<SupplierComparison> {
        tracing::info!("Comparing suppliers for '{}'", product);
        match self.supplier_comparison(product).await {
            Ok(comparison) => {
                tracing::info!(
                    "Comparison done: {} suppliers for '{}'",
                    comparison.len(),
                    product
                );
                comparison
            }
            Err(e) => {
                tracing::error!("Supplier comparison failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn supplier_comparison(&self, product: &str) -> AppResult<Vec<SupplierComparison>> {
        let sql = format!(
            r#"
            SELECT
                COALESCE(s.name, '{no_supplier}') AS supplier,
                AVG({expr}) AS avg_price,
                COUNT(*) AS num_purchases,
                SUM(c.quantity) AS total_volume,
                MAX(c.purchase_date) AS last_purchase,
                MIN({expr}) AS min_price,
                MAX({expr}) AS max_price
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            LEFT JOIN suppliers s ON c.supplier_id = s.id
            WHERE p.name = ?
            GROUP BY s.name
            ORDER BY avg_price ASC
            "#,
            no_supplier = NO_SUPPLIER,
            expr = UNIT_PRICE_SQL
        );

        let rows = sqlx::query_as::<_, ComparisonRow>(&sql)
            .bind(product)
            .fetch_all(&self.db)
            .await?;

        let Some(best_price) = rows.first().map(|row| row.avg_price) else {
            tracing::warn!("No purchases found for product: {}", product);
            return Ok(Vec::new());
        };

        Ok(rows
            .into_iter()
            .map(|row| SupplierComparison {
                supplier: row.supplier,
                avg_unit_price: round4(row.avg_price),
                num_purchases: row.num_purchases,
                total_volume: round2(row.total_volume),
                last_purchase: row.last_purchase,
                min_unit_price: round4(row.min_price),
                max_unit_price: round4(row.max_price),
                price_spread: round4(row.max_price - row.min_price),
                is_best: (row.avg_price - best_price).abs() < 0.001,
            })
            .collect())
    }

    /// Price history for a product over a trailing window of days, oldest
    /// first. A pure read, no aggregation across rows.
    pub async fn price_trend(&self, product: &str, days: i64) -> Vec<TrendPoint> {
        tracing::info!("Price trend for '{}' over the last {} days", product, days);
        match self.trend(product, days).await {
            Ok(points) => points,
            Err(e) => {
                tracing::error!("Price trend failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn trend(&self, product: &str, days: i64) -> AppResult<Vec<TrendPoint>> {
        let cutoff = Local::now().date_naive() - Duration::days(days);

        let sql = format!(
            r#"
            SELECT
                c.purchase_date AS date,
                {expr} AS unit_price,
                c.quantity,
                s.name AS supplier
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            LEFT JOIN suppliers s ON c.supplier_id = s.id
            WHERE p.name = ? AND c.purchase_date >= ?
            ORDER BY c.purchase_date ASC
            "#,
            expr = UNIT_PRICE_SQL
        );

        let rows = sqlx::query_as::<_, TrendRow>(&sql)
            .bind(product)
            .bind(cutoff)
            .fetch_all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| TrendPoint {
                date: row.date,
                unit_price: round4(row.unit_price),
                quantity: row.quantity,
                supplier: row.supplier.unwrap_or_else(|| "N/A".to_string()),
            })
            .collect())
    }

    /// Historical purchases whose unit price falls within a band around the
    /// product's all-time average, newest first, capped at 10.
    ///
    /// `reference_quantity` is accepted for the bridge signature but not
    /// used to filter or weight results; it is reserved.
    pub async fn find_similar_purchases(
        &self,
        product: &str,
        _reference_quantity: f64,
        price_margin: f64,
    ) -> Vec<SimilarPurchase> {
        tracing::info!(
            "Searching purchases similar to '{}' within a {:.0}% price band",
            product,
            price_margin * 100.0
        );
        match self.similar(product, price_margin).await {
            Ok(similar) => {
                tracing::info!("Found {} similar purchases", similar.len());
                similar
            }
            Err(e) => {
                tracing::error!("Similarity search failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn similar(&self, product: &str, price_margin: f64) -> AppResult<Vec<SimilarPurchase>> {
        let avg_sql = format!(
            r#"
            SELECT AVG({expr})
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            WHERE p.name = ?
            "#,
            expr = UNIT_PRICE_SQL
        );

        let avg_price = sqlx::query_scalar::<_, Option<f64>>(&avg_sql)
            .bind(product)
            .fetch_one(&self.db)
            .await?;

        let Some(reference) = avg_price else {
            return Ok(Vec::new());
        };

        let band_min = reference * (1.0 - price_margin);
        let band_max = reference * (1.0 + price_margin);

        let sql = format!(
            r#"
            SELECT
                c.purchase_date AS date,
                c.quantity,
                c.total_price,
                {expr} AS unit_price,
                s.name AS supplier,
                c.discount_note
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            LEFT JOIN suppliers s ON c.supplier_id = s.id
            WHERE p.name = ?
              AND {expr} BETWEEN ? AND ?
            ORDER BY c.purchase_date DESC
            LIMIT 10
            "#,
            expr = UNIT_PRICE_SQL
        );

        let rows = sqlx::query_as::<_, SimilarRow>(&sql)
            .bind(product)
            .bind(band_min)
            .bind(band_max)
            .fetch_all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| SimilarPurchase {
                date: row.date,
                quantity: row.quantity,
                total_price: row.total_price,
                unit_price: round4(row.unit_price),
                supplier: row.supplier.unwrap_or_else(|| "N/A".to_string()),
                discount_note: row.discount_note.unwrap_or_else(|| "N/A".to_string()),
            })
            .collect())
    }

    /// Overall purchasing summary: totals, top products, last week's
    /// activity, and the most used suppliers.
    pub async fn general_summary(&self) -> PurchasingSummary {
        match self.summary().await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Summary generation failed: {}", e);
                PurchasingSummary::default()
            }
        }
    }

    async fn summary(&self) -> AppResult<PurchasingSummary> {
        let (total_purchases, total_spend) = sqlx::query_as::<_, (i64, Option<f64>)>(
            "SELECT COUNT(*), SUM(total_price) FROM purchases",
        )
        .fetch_one(&self.db)
        .await?;

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT p.name AS name, COUNT(*) AS purchases, SUM(c.quantity) AS volume
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            GROUP BY p.name
            ORDER BY purchases DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let week_ago = Local::now().date_naive() - Duration::days(7);
        let (recent_purchases, recent_spend) = sqlx::query_as::<_, (i64, Option<f64>)>(
            "SELECT COUNT(*), SUM(total_price) FROM purchases WHERE purchase_date >= ?",
        )
        .bind(week_ago)
        .fetch_one(&self.db)
        .await?;

        let top_suppliers = sqlx::query_as::<_, TopSupplier>(&format!(
            r#"
            SELECT COALESCE(s.name, '{NO_SUPPLIER}') AS name, COUNT(*) AS purchases
            FROM purchases c
            LEFT JOIN suppliers s ON c.supplier_id = s.id
            GROUP BY s.name
            ORDER BY purchases DESC
            LIMIT 5
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(PurchasingSummary {
            total_purchases,
            total_spend: round2(total_spend.unwrap_or(0.0)),
            top_products: top_products
                .into_iter()
                .map(|p| TopProduct {
                    volume: round2(p.volume),
                    ..p
                })
                .collect(),
            recent_purchases_7d: recent_purchases,
            recent_spend_7d: round2(recent_spend.unwrap_or(0.0)),
            top_suppliers,
        })
    }

    /// Export report rows as CSV.
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
