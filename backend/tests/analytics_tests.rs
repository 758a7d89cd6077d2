//! Analytics arithmetic tests
//!
//! Logic-level checks of the aggregation arithmetic: rounding contracts,
//! potential savings, the best-supplier tolerance, and the similarity price
//! band, plus property tests over the aggregate invariants.

use proptest::prelude::*;

use shared::{round2, round4, unit_price};

// ============================================================================
// Unit Tests
// ============================================================================

mod unit_tests {
    use super::*;

    #[test]
    fn test_unit_price_derivation() {
        assert_eq!(unit_price(18.0, 10.0), 1.8);
        assert_eq!(unit_price(7.0, 3.0), 2.3333);
    }

    #[test]
    fn test_unit_price_guards_non_positive_quantity() {
        assert_eq!(unit_price(10.0, 0.0), 0.0);
        assert_eq!(unit_price(10.0, -1.0), 0.0);
    }

    #[test]
    fn test_monetary_rounding_is_two_decimals() {
        assert_eq!(round2(28.004), 28.0);
        assert_eq!(round2(28.006), 28.01);
    }

    #[test]
    fn test_unit_price_rounding_is_four_decimals() {
        assert_eq!(round4(1.83333333), 1.8333);
        assert_eq!(round4(1.23456), 1.2346);
    }

    #[test]
    fn test_potential_savings() {
        // (worst - best) x total volume
        let best = 5.0;
        let worst = 6.0;
        let volume = 5.0;
        assert_eq!(round2((worst - best) * volume), 5.0);
    }

    #[test]
    fn test_potential_savings_zero_for_single_price() {
        let price = 2.5;
        assert_eq!(round2((price - price) * 100.0), 0.0);
    }

    /// The best-supplier flag uses a 0.001 tolerance, so near-identical
    /// averages can all be flagged.
    #[test]
    fn test_best_price_tolerance() {
        let best: f64 = 1.90;
        assert!((1.90_f64 - best).abs() < 0.001);
        assert!((1.9005_f64 - best).abs() < 0.001);
        assert!((2.00_f64 - best).abs() >= 0.001);
    }

    #[test]
    fn test_similarity_band_bounds() {
        // Average 2.00 with a 20% margin gives [1.6, 2.4]
        let avg: f64 = 2.0;
        let margin: f64 = 0.2;
        let band_min = avg * (1.0 - margin);
        let band_max = avg * (1.0 + margin);
        assert!((band_min - 1.6).abs() < 1e-9);
        assert!((band_max - 2.4).abs() < 1e-9);

        assert!(1.5 < band_min);
        assert!(2.5 > band_max);
    }

    #[test]
    fn test_spend_ordering_is_descending() {
        let mut spends = [("Potatoes", 7.5), ("Beef", 40.0), ("Milk", 12.0)];
        spends.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        let names: Vec<&str> = spends.iter().map(|s| s.0).collect();
        assert_eq!(names, ["Beef", "Milk", "Potatoes"]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = f64> {
        (1u32..=10_000u32).prop_map(|n| n as f64 / 10.0)
    }

    fn price_strategy() -> impl Strategy<Value = f64> {
        (1u32..=100_000u32).prop_map(|n| n as f64 / 100.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total volume is the plain sum of quantities.
        #[test]
        fn prop_total_volume_is_sum_of_quantities(
            quantities in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let total: f64 = quantities.iter().sum();
            let folded = quantities.iter().fold(0.0, |acc, q| acc + q);
            prop_assert!((total - folded).abs() < 1e-9);
        }

        /// The average unit price lies between the best and worst prices.
        #[test]
        fn prop_average_price_is_bounded(
            prices in prop::collection::vec(price_strategy(), 1..20)
        ) {
            let avg = prices.iter().sum::<f64>() / prices.len() as f64;
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            prop_assert!(avg >= min - 1e-9);
            prop_assert!(avg <= max + 1e-9);
        }

        /// Potential savings are never negative: the worst price is at
        /// least the best price.
        #[test]
        fn prop_potential_savings_non_negative(
            prices in prop::collection::vec(price_strategy(), 1..20),
            volume in quantity_strategy()
        ) {
            let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!((max - min) * volume >= 0.0);
        }

        /// A price is inside the similarity band exactly when its distance
        /// from the average is within the margin.
        #[test]
        fn prop_similarity_band_membership(
            avg in price_strategy(),
            price in price_strategy(),
            margin in 1u32..50u32
        ) {
            let margin = margin as f64 / 100.0;
            let band_min = avg * (1.0 - margin);
            let band_max = avg * (1.0 + margin);

            let inside = price >= band_min && price <= band_max;
            let by_distance = (price - avg).abs() <= avg * margin + 1e-9
                && (avg - price).abs() <= avg * margin + 1e-9;

            // Allow the boundary to differ only within float noise
            if (price - band_min).abs() > 1e-9 && (price - band_max).abs() > 1e-9 {
                prop_assert_eq!(inside, by_distance);
            }
        }

        /// Unit price rounding keeps at most four decimals.
        #[test]
        fn prop_round4_is_idempotent(price in price_strategy()) {
            let rounded = round4(price);
            prop_assert_eq!(round4(rounded), rounded);
        }

        /// The derived unit price of a valid purchase reproduces the total
        /// within rounding error.
        #[test]
        fn prop_unit_price_times_quantity_recovers_total(
            quantity in quantity_strategy(),
            total in price_strategy()
        ) {
            let derived = unit_price(total, quantity);
            // 4-decimal rounding bounds the reconstruction error
            prop_assert!((derived * quantity - total).abs() <= 0.00005 * quantity + 1e-9);
        }
    }
}
