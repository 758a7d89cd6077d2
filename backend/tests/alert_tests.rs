//! Alert rule tests
//!
//! The four rule evaluators are pure functions over a purchase snapshot, so
//! they are exercised here without a store: threshold boundaries, minimum
//! sample gates, result caps and ordering.

use chrono::NaiveDate;
use proptest::prelude::*;

use bar_stock_tracker_backend::services::alert::{
    inactivity_alerts, price_variance_alerts, stock_excess_alerts, supplier_price_alerts,
    AlertThresholds, PurchaseSnapshot, SnapshotRow,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fixed evaluation date so window arithmetic is deterministic.
fn today() -> NaiveDate {
    date(2025, 6, 15)
}

fn row(product: &str, supplier: Option<&str>, quantity: f64, unit_price: f64, days_back: i64) -> SnapshotRow {
    SnapshotRow {
        product: product.to_string(),
        supplier: supplier.map(str::to_string),
        quantity,
        unit_price,
        date: today() - chrono::Duration::days(days_back),
    }
}

fn snapshot(products: &[&str], purchases: Vec<SnapshotRow>) -> PurchaseSnapshot {
    PurchaseSnapshot {
        products: products.iter().map(|p| p.to_string()).collect(),
        purchases,
        today: today(),
    }
}

fn thresholds() -> AlertThresholds {
    AlertThresholds::default()
}

// ============================================================================
// Rule 1: stock excess
// ============================================================================

mod stock_rule {
    use super::*;

    #[test]
    fn fires_when_total_exceeds_threshold() {
        let snap = snapshot(
            &["Chicken"],
            vec![
                row("Chicken", None, 6.0, 2.0, 2),
                row("Chicken", None, 4.5, 2.0, 1),
            ],
        );
        let alerts = stock_excess_alerts(&snap, &thresholds());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category.as_str(), "stock");
        assert_eq!(alerts[0].severity.as_str(), "warning");
        assert_eq!(alerts[0].priority.as_str(), "media");
        assert_eq!(alerts[0].data["product"], "Chicken");
        assert_eq!(alerts[0].data["total_quantity"], 10.5);
        assert_eq!(alerts[0].data["purchase_count"], 2);
    }

    #[test]
    fn silent_at_or_below_threshold() {
        let snap = snapshot(&["Chicken"], vec![row("Chicken", None, 10.0, 2.0, 1)]);
        // Exactly at the threshold is not an excess
        assert!(stock_excess_alerts(&snap, &thresholds()).is_empty());
    }

    #[test]
    fn largest_excess_comes_first() {
        let snap = snapshot(
            &["Flour", "Potatoes"],
            vec![
                row("Flour", None, 12.0, 1.0, 1),
                row("Potatoes", None, 30.0, 1.0, 1),
            ],
        );
        let alerts = stock_excess_alerts(&snap, &thresholds());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].data["product"], "Potatoes");
        assert_eq!(alerts[1].data["product"], "Flour");
    }
}

// ============================================================================
// Rule 2: inactivity
// ============================================================================

mod inactivity_rule {
    use super::*;

    #[test]
    fn flags_stale_and_never_purchased_products() {
        let snap = snapshot(
            &["Fresh", "Never", "Stale"],
            vec![
                row("Fresh", None, 1.0, 1.0, 5),
                row("Stale", None, 1.0, 1.0, 45),
            ],
        );
        let alerts = inactivity_alerts(&snap, &thresholds());

        assert_eq!(alerts.len(), 2);
        // Never-purchased products are listed first
        assert_eq!(alerts[0].data["product"], "Never");
        assert_eq!(alerts[0].data["last_purchase"], "never");
        assert!(alerts[0].message.contains("no purchases recorded"));
        assert_eq!(alerts[1].data["product"], "Stale");
        assert_eq!(alerts[1].category.as_str(), "inactividad");
        assert_eq!(alerts[1].severity.as_str(), "info");
        assert_eq!(alerts[1].priority.as_str(), "baja");
    }

    #[test]
    fn recent_purchase_suppresses_the_alert() {
        let snap = snapshot(
            &["Fresh"],
            vec![row("Fresh", None, 1.0, 1.0, 29)],
        );
        assert!(inactivity_alerts(&snap, &thresholds()).is_empty());
    }

    #[test]
    fn only_the_most_recent_purchase_counts() {
        let snap = snapshot(
            &["Mixed"],
            vec![
                row("Mixed", None, 1.0, 1.0, 200),
                row("Mixed", None, 1.0, 1.0, 3),
            ],
        );
        assert!(inactivity_alerts(&snap, &thresholds()).is_empty());
    }
}

// ============================================================================
// Rule 3: price variance
// ============================================================================

mod price_rule {
    use super::*;

    #[test]
    fn needs_at_least_three_recent_purchases() {
        let snap = snapshot(
            &["Chicken"],
            vec![
                row("Chicken", None, 1.0, 1.0, 10),
                row("Chicken", None, 1.0, 2.0, 5),
            ],
        );
        assert!(price_variance_alerts(&snap, &thresholds()).is_empty());
    }

    #[test]
    fn fires_on_wide_spread() {
        // Prices 1.0, 2.0, 3.0: avg 2.0, spread 2.0 -> variation 100%
        let snap = snapshot(
            &["Chicken"],
            vec![
                row("Chicken", None, 1.0, 1.0, 10),
                row("Chicken", None, 1.0, 2.0, 5),
                row("Chicken", None, 1.0, 3.0, 2),
            ],
        );
        let alerts = price_variance_alerts(&snap, &thresholds());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category.as_str(), "precio");
        assert_eq!(alerts[0].severity.as_str(), "warning");
        assert_eq!(alerts[0].priority.as_str(), "alta");
        assert_eq!(alerts[0].data["variation_pct"], 100.0);
        // spread 2.0 x the 5-unit reference quantity
        assert_eq!(alerts[0].data["estimated_savings"], 10.0);
    }

    #[test]
    fn stable_prices_stay_silent() {
        let snap = snapshot(
            &["Chicken"],
            vec![
                row("Chicken", None, 1.0, 2.0, 10),
                row("Chicken", None, 1.0, 2.1, 5),
                row("Chicken", None, 1.0, 2.0, 2),
            ],
        );
        // Spread 0.1 over avg ~2.03 is under the 15% default
        assert!(price_variance_alerts(&snap, &thresholds()).is_empty());
    }

    #[test]
    fn purchases_older_than_ninety_days_are_ignored() {
        let snap = snapshot(
            &["Chicken"],
            vec![
                row("Chicken", None, 1.0, 1.0, 120),
                row("Chicken", None, 1.0, 2.0, 110),
                row("Chicken", None, 1.0, 3.0, 100),
            ],
        );
        assert!(price_variance_alerts(&snap, &thresholds()).is_empty());
    }
}

// ============================================================================
// Rule 4: supplier overpricing
// ============================================================================

mod supplier_rule {
    use super::*;

    fn pair(product: &str, supplier: &str, unit_price: f64, days: i64) -> Vec<SnapshotRow> {
        vec![
            row(product, Some(supplier), 1.0, unit_price, days),
            row(product, Some(supplier), 1.0, unit_price, days + 1),
        ]
    }

    #[test]
    fn flags_suppliers_more_than_twenty_percent_above_best() {
        let mut purchases = pair("Chicken", "Cheap", 2.0, 5);
        purchases.extend(pair("Chicken", "Expensive", 3.0, 5));
        let snap = snapshot(&["Chicken"], purchases);

        let alerts = supplier_price_alerts(&snap);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category.as_str(), "proveedor");
        assert_eq!(alerts[0].severity.as_str(), "info");
        assert_eq!(alerts[0].priority.as_str(), "media");
        assert_eq!(alerts[0].data["supplier"], "Expensive");
        assert_eq!(alerts[0].data["excess_pct"], 50.0);
    }

    #[test]
    fn twenty_percent_exactly_is_not_flagged() {
        let mut purchases = pair("Chicken", "Cheap", 2.0, 5);
        purchases.extend(pair("Chicken", "Borderline", 2.4, 5));
        let snap = snapshot(&["Chicken"], purchases);
        assert!(supplier_price_alerts(&snap).is_empty());
    }

    #[test]
    fn single_purchase_groups_are_ignored() {
        let snap = snapshot(
            &["Chicken"],
            vec![
                row("Chicken", Some("Cheap"), 1.0, 2.0, 5),
                row("Chicken", Some("Expensive"), 1.0, 4.0, 5),
            ],
        );
        assert!(supplier_price_alerts(&snap).is_empty());
    }

    #[test]
    fn capped_to_five_worst_offenders() {
        let mut purchases = Vec::new();
        for i in 0..7 {
            let product = format!("Product{}", i);
            purchases.extend(pair(&product, "Cheap", 1.0, 5));
            // Increasing excess per product
            purchases.extend(pair(&product, "Expensive", 2.0 + i as f64, 5));
        }
        let products: Vec<String> = (0..7).map(|i| format!("Product{}", i)).collect();
        let product_refs: Vec<&str> = products.iter().map(String::as_str).collect();
        let snap = snapshot(&product_refs, purchases);

        let alerts = supplier_price_alerts(&snap);
        assert_eq!(alerts.len(), 5);
        // Worst offender first
        assert_eq!(alerts[0].data["product"], "Product6");
    }

    #[test]
    fn missing_supplier_groups_under_the_no_supplier_label() {
        let mut purchases = pair("Chicken", "Cheap", 2.0, 5);
        purchases.push(row("Chicken", None, 1.0, 3.0, 5));
        purchases.push(row("Chicken", None, 1.0, 3.0, 6));
        let snap = snapshot(&["Chicken"], purchases);

        let alerts = supplier_price_alerts(&snap);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].data["supplier"], "no supplier");
    }

    #[test]
    fn purchases_older_than_sixty_days_are_ignored() {
        let mut purchases = pair("Chicken", "Cheap", 2.0, 70);
        purchases.extend(pair("Chicken", "Expensive", 4.0, 70));
        let snap = snapshot(&["Chicken"], purchases);
        assert!(supplier_price_alerts(&snap).is_empty());
    }
}

// ============================================================================
// Property-based tests
// ============================================================================

mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = f64> {
        (1u32..=10_000u32).prop_map(|n| n as f64 / 10.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A stock alert fires exactly when the accumulated quantity
        /// exceeds the threshold.
        #[test]
        fn stock_alert_matches_threshold_comparison(
            quantities in prop::collection::vec(quantity_strategy(), 1..10),
            threshold in quantity_strategy()
        ) {
            let total: f64 = quantities.iter().sum();
            let purchases = quantities
                .iter()
                .map(|&q| row("P", None, q, 1.0, 1))
                .collect();
            let snap = snapshot(&["P"], purchases);
            let limits = AlertThresholds {
                stock_excess: threshold,
                ..AlertThresholds::default()
            };

            let alerts = stock_excess_alerts(&snap, &limits);
            prop_assert_eq!(!alerts.is_empty(), total > threshold);
        }

        /// Identical prices never produce a variance alert, no matter how
        /// many purchases there are.
        #[test]
        fn uniform_prices_never_trigger_variance(
            price in 1u32..1000u32,
            count in 3usize..20
        ) {
            let price = price as f64 / 100.0;
            let purchases = (0..count).map(|_| row("P", None, 1.0, price, 1)).collect();
            let snap = snapshot(&["P"], purchases);

            prop_assert!(price_variance_alerts(&snap, &thresholds()).is_empty());
        }

        /// The overpricing cap holds for any number of offending products.
        #[test]
        fn supplier_alerts_never_exceed_the_cap(product_count in 1usize..12) {
            let mut purchases = Vec::new();
            let names: Vec<String> = (0..product_count).map(|i| format!("P{}", i)).collect();
            for name in &names {
                for days in [5, 6] {
                    purchases.push(row(name, Some("Cheap"), 1.0, 1.0, days));
                    purchases.push(row(name, Some("Expensive"), 1.0, 2.0, days));
                }
            }
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let snap = snapshot(&refs, purchases);

            prop_assert!(supplier_price_alerts(&snap).len() <= 5);
        }
    }
}
