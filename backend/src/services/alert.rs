//! Rule-based alert engine
//!
//! Four independent rules evaluated in a fixed order: stock excess,
//! inactivity, price variance, supplier overpricing. Thresholds are loaded
//! once per run from the configuration table; each rule is a pure function
//! over a snapshot of the purchase history, so the rules are unit-testable
//! without a live store. Alerts are ephemeral: they have no identity or
//! lifecycle beyond the call that produced them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Duration, Local, NaiveDate};
use serde_json::json;
use sqlx::SqlitePool;

use shared::{round2, round4, NO_SUPPLIER};

use crate::error::AppResult;
use crate::models::{Alert, AlertCategory, AlertPriority, AlertSeverity, AlertStats};
use crate::services::app_config::AppConfigService;

/// Trailing window for the price variance rule, in days.
const PRICE_WINDOW_DAYS: i64 = 90;

/// Trailing window for the supplier overpricing rule, in days.
const SUPPLIER_WINDOW_DAYS: i64 = 60;

/// Minimum purchases per product for a price variance alert.
const MIN_PRICE_SAMPLES: usize = 3;

/// Minimum purchases per (product, supplier) group for an overpricing alert.
const MIN_SUPPLIER_SAMPLES: usize = 2;

/// A supplier must exceed the product's best average by this factor.
const OVERPRICE_FACTOR: f64 = 1.20;

/// Overpricing alerts are capped to the worst offenders across all products.
const SUPPLIER_ALERT_CAP: usize = 5;

/// Savings estimates use a fixed reference quantity, not a real projection.
const SAVINGS_REFERENCE_UNITS: f64 = 5.0;

/// Thresholds read from the configuration table, loaded once per run
#[derive(Debug, Clone)]
pub struct AlertThresholds {
    /// Accumulated quantity before a stock excess alert.
    pub stock_excess: f64,
    /// Days without a purchase before an inactivity alert.
    pub inactivity_days: i64,
    /// Unit price variance fraction before a price alert.
    pub price_variance: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            stock_excess: 10.0,
            inactivity_days: 30,
            price_variance: 0.15,
        }
    }
}

/// One purchase row in the evaluation snapshot
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub product: String,
    pub supplier: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub date: NaiveDate,
}

/// Everything the rules need: the full purchase history, the product list
/// (so zero-purchase products are visible), and today's date.
#[derive(Debug, Clone)]
pub struct PurchaseSnapshot {
    pub products: Vec<String>,
    pub purchases: Vec<SnapshotRow>,
    pub today: NaiveDate,
}

/// Alert engine
#[derive(Clone)]
pub struct AlertService {
    db: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct SnapshotQueryRow {
    product: String,
    supplier: Option<String>,
    quantity: f64,
    unit_price: f64,
    date: NaiveDate,
}

impl AlertService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Run all four rules in order. A store failure aborts the whole run
    /// and yields an empty list, never partial results.
    pub async fn generate_alerts(&self) -> Vec<Alert> {
        tracing::info!("Generating alerts...");

        let thresholds = self.load_thresholds().await;
        let snapshot = match self.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Cannot load purchase snapshot for alerts: {}", e);
                return Vec::new();
            }
        };

        let mut alerts = Vec::new();
        alerts.extend(stock_excess_alerts(&snapshot, &thresholds));
        alerts.extend(inactivity_alerts(&snapshot, &thresholds));
        alerts.extend(price_variance_alerts(&snapshot, &thresholds));
        alerts.extend(supplier_price_alerts(&snapshot));

        tracing::info!("Generated {} alerts", alerts.len());
        alerts
    }

    /// Aggregate statistics over a fresh alert run.
    pub async fn alert_stats(&self) -> AlertStats {
        let alerts = self.generate_alerts().await;
        AlertStats::from_alerts(&alerts)
    }

    async fn load_thresholds(&self) -> AlertThresholds {
        let config = AppConfigService::new(self.db.clone());
        let defaults = AlertThresholds::default();
        AlertThresholds {
            stock_excess: config
                .get_f64("stock_excess_threshold", defaults.stock_excess)
                .await,
            inactivity_days: config
                .get_i64("inactivity_alert_days", defaults.inactivity_days)
                .await,
            price_variance: config
                .get_f64("price_variance_threshold", defaults.price_variance)
                .await,
        }
    }

    async fn load_snapshot(&self) -> AppResult<PurchaseSnapshot> {
        let products =
            sqlx::query_scalar::<_, String>("SELECT name FROM products ORDER BY name")
                .fetch_all(&self.db)
                .await?;

        let rows = sqlx::query_as::<_, SnapshotQueryRow>(
            r#"
            SELECT
                p.name AS product,
                s.name AS supplier,
                c.quantity,
                CASE WHEN c.quantity > 0 THEN c.total_price / c.quantity ELSE 0 END AS unit_price,
                c.purchase_date AS date
            FROM purchases c
            JOIN products p ON c.product_id = p.id
            LEFT JOIN suppliers s ON c.supplier_id = s.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseSnapshot {
            products,
            purchases: rows
                .into_iter()
                .map(|row| SnapshotRow {
                    product: row.product,
                    supplier: row.supplier,
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                    date: row.date,
                })
                .collect(),
            today: Local::now().date_naive(),
        })
    }
}

/// Rule 1: products whose accumulated purchased quantity exceeds the stock
/// threshold, largest excess first.
pub fn stock_excess_alerts(
    snapshot: &PurchaseSnapshot,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for row in &snapshot.purchases {
        let entry = totals.entry(row.product.as_str()).or_insert((0.0, 0));
        entry.0 += row.quantity;
        entry.1 += 1;
    }

    let mut offenders: Vec<(&str, f64, usize)> = totals
        .into_iter()
        .filter(|(_, (total, _))| *total > thresholds.stock_excess)
        .map(|(product, (total, count))| (product, total, count))
        .collect();
    offenders.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    offenders
        .into_iter()
        .map(|(product, total, count)| Alert {
            severity: AlertSeverity::Warning,
            category: AlertCategory::Stock,
            title: "Excess Stock Detected".to_string(),
            message: format!(
                "{}: {:.1} units (threshold: {})",
                product, total, thresholds.stock_excess
            ),
            data: json!({
                "product": product,
                "total_quantity": round2(total),
                "threshold": thresholds.stock_excess,
                "purchase_count": count,
            }),
            priority: AlertPriority::Medium,
        })
        .collect()
}

/// Rule 2: products without a recent purchase. Products that were never
/// purchased at all are called out first, then stale products by oldest
/// last-purchase date.
pub fn inactivity_alerts(snapshot: &PurchaseSnapshot, thresholds: &AlertThresholds) -> Vec<Alert> {
    let cutoff = snapshot.today - Duration::days(thresholds.inactivity_days);

    let mut inactive: Vec<(&str, Option<NaiveDate>, usize)> = Vec::new();
    for product in &snapshot.products {
        let mut last: Option<NaiveDate> = None;
        let mut count = 0usize;
        for row in &snapshot.purchases {
            if row.product == *product {
                count += 1;
                if last.map_or(true, |d| row.date > d) {
                    last = Some(row.date);
                }
            }
        }
        match last {
            None => inactive.push((product, None, count)),
            Some(date) if date < cutoff => inactive.push((product, Some(date), count)),
            Some(_) => {}
        }
    }

    // Never-purchased products sort ahead of everything else
    inactive.sort_by(|a, b| match (a.1, b.1) {
        (None, None) => a.0.cmp(b.0),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    });

    inactive
        .into_iter()
        .map(|(product, last, count)| {
            let status = match last {
                None => "no purchases recorded".to_string(),
                Some(date) => format!("last purchase: {}", date),
            };
            Alert {
                severity: AlertSeverity::Info,
                category: AlertCategory::Inactivity,
                title: "No Recent Activity".to_string(),
                message: format!("{}: {}", product, status),
                data: json!({
                    "product": product,
                    "last_purchase": last.map_or_else(|| "never".to_string(), |d| d.to_string()),
                    "inactive_days_threshold": thresholds.inactivity_days,
                    "purchase_count": count,
                }),
                priority: AlertPriority::Low,
            }
        })
        .collect()
}

/// Rule 3: products whose unit price varied strongly within the trailing
/// 90 days. Requires at least 3 qualifying purchases; the variation is the
/// price spread relative to the average unit price.
pub fn price_variance_alerts(
    snapshot: &PurchaseSnapshot,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let cutoff = snapshot.today - Duration::days(PRICE_WINDOW_DAYS);

    let mut prices: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in &snapshot.purchases {
        if row.date >= cutoff {
            prices.entry(row.product.as_str()).or_default().push(row.unit_price);
        }
    }

    let mut flagged: Vec<(&str, f64, f64, f64)> = Vec::new();
    for (product, samples) in prices {
        if samples.len() < MIN_PRICE_SAMPLES {
            continue;
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = samples.iter().sum::<f64>() / samples.len() as f64;
        if avg <= 0.0 {
            continue;
        }
        if (max - min) / avg > thresholds.price_variance {
            flagged.push((product, min, max, avg));
        }
    }
    flagged.sort_by(|a, b| {
        let spread_a = a.2 - a.1;
        let spread_b = b.2 - b.1;
        spread_b.partial_cmp(&spread_a).unwrap_or(Ordering::Equal)
    });

    flagged
        .into_iter()
        .map(|(product, min, max, avg)| {
            let variation_pct = round1((max - min) / avg * 100.0);
            Alert {
                severity: AlertSeverity::Warning,
                category: AlertCategory::Price,
                title: "High Price Variance".to_string(),
                message: format!("{}: {:.1}% price variation across purchases", product, variation_pct),
                data: json!({
                    "product": product,
                    "min_unit_price": round4(min),
                    "max_unit_price": round4(max),
                    "variation_pct": variation_pct,
                    "estimated_savings": round2((max - min) * SAVINGS_REFERENCE_UNITS),
                }),
                priority: AlertPriority::High,
            }
        })
        .collect()
}

/// Rule 4: suppliers averaging more than 20% above the best supplier price
/// for the same product over the trailing 60 days. Groups need at least 2
/// purchases; the result is capped to the 5 worst offenders overall.
pub fn supplier_price_alerts(snapshot: &PurchaseSnapshot) -> Vec<Alert> {
    let cutoff = snapshot.today - Duration::days(SUPPLIER_WINDOW_DAYS);

    let mut groups: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for row in &snapshot.purchases {
        if row.date >= cutoff {
            let supplier = row.supplier.as_deref().unwrap_or(NO_SUPPLIER);
            groups
                .entry((row.product.as_str(), supplier))
                .or_default()
                .push(row.unit_price);
        }
    }

    let averages: Vec<(&str, &str, f64)> = groups
        .into_iter()
        .filter(|(_, samples)| samples.len() >= MIN_SUPPLIER_SAMPLES)
        .map(|((product, supplier), samples)| {
            let avg = samples.iter().sum::<f64>() / samples.len() as f64;
            (product, supplier, avg)
        })
        .collect();

    let mut best_prices: BTreeMap<&str, f64> = BTreeMap::new();
    for &(product, _, avg) in &averages {
        best_prices
            .entry(product)
            .and_modify(|best| *best = best.min(avg))
            .or_insert(avg);
    }

    let mut offenders: Vec<(&str, &str, f64, f64, f64)> = averages
        .iter()
        .filter_map(|&(product, supplier, avg)| {
            let best = best_prices[product];
            if best > 0.0 && avg > best * OVERPRICE_FACTOR {
                let excess_pct = (avg - best) / best * 100.0;
                Some((product, supplier, avg, best, excess_pct))
            } else {
                None
            }
        })
        .collect();
    offenders.sort_by(|a, b| b.4.partial_cmp(&a.4).unwrap_or(Ordering::Equal));
    offenders.truncate(SUPPLIER_ALERT_CAP);

    offenders
        .into_iter()
        .map(|(product, supplier, avg, best, excess_pct)| Alert {
            severity: AlertSeverity::Info,
            category: AlertCategory::Supplier,
            title: "Supplier With Elevated Prices".to_string(),
            message: format!(
                "{}: {:.1}% above the best price for {}",
                supplier,
                round1(excess_pct),
                product
            ),
            data: json!({
                "product": product,
                "supplier": supplier,
                "avg_unit_price": round4(avg),
                "best_unit_price": round4(best),
                "excess_pct": round1(excess_pct),
            }),
            priority: AlertPriority::Medium,
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
