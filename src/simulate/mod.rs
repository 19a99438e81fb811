//! Revenue-impact simulation for a proposed price change.
//!
//! The projection is a linear approximation around the fitted elasticity:
//!
//! ```text
//! Δq = e · Δp
//! Δrevenue = (1 + Δp)(1 + Δq) - 1
//! ```
//!
//! All percentages are fractions here; the report formatter converts them for display.

use crate::domain::{ResultSet, SimulationResult};

/// Simulate a fractional price change (`0.05` = +5%) for `category`.
///
/// Returns `None` when the category is not in the result set.
pub fn simulate(results: &ResultSet, category: &str, price_change_pct: f64) -> Option<SimulationResult> {
    let row = results.get(category)?;

    let quantity_change_pct = row.elasticity * price_change_pct;
    let revenue_change_pct = (1.0 + price_change_pct) * (1.0 + quantity_change_pct) - 1.0;

    Some(SimulationResult {
        category: row.category.clone(),
        current_price: row.avg_price,
        new_price: row.avg_price * (1.0 + price_change_pct),
        elasticity: row.elasticity,
        price_change_pct,
        quantity_change_pct,
        revenue_change_pct,
        estimated_revenue_impact: row.total_sales * revenue_change_pct,
        current_total_sales: row.total_sales,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryResult, DemandType};

    fn results_with(category: &str, elasticity: f64, avg_price: f64, total_sales: f64) -> ResultSet {
        ResultSet::from_rows(vec![CategoryResult {
            category: category.to_string(),
            elasticity,
            p_value: 0.01,
            r_squared: 0.5,
            avg_price,
            median_price: avg_price,
            total_sales,
            num_products: 20,
            demand_type: DemandType::Inelastic,
            can_increase_price: true,
        }])
    }

    #[test]
    fn five_percent_increase_on_inelastic_category() {
        let results = results_with("Dairy", 0.6, 100.0, 50_000.0);
        let sim = simulate(&results, "Dairy", 0.05).unwrap();

        assert!((sim.quantity_change_pct - 0.03).abs() < 1e-12);
        assert!((sim.revenue_change_pct - 0.0815).abs() < 1e-12);
        assert!((sim.new_price - 105.0).abs() < 1e-9);
        assert!((sim.current_price - 100.0).abs() < 1e-12);
        assert!((sim.estimated_revenue_impact - 4075.0).abs() < 1e-6);
        assert!((sim.current_total_sales - 50_000.0).abs() < 1e-12);
        assert!(sim.improves_revenue());
    }

    #[test]
    fn price_cut_with_negative_elasticity() {
        let results = results_with("Snacks", -1.5, 40.0, 10_000.0);
        let sim = simulate(&results, "Snacks", -0.10).unwrap();

        assert!((sim.quantity_change_pct - 0.15).abs() < 1e-12);
        // 0.9 * 1.15 - 1
        assert!((sim.revenue_change_pct - 0.035).abs() < 1e-12);
        assert!((sim.new_price - 36.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_category_is_not_found() {
        let results = results_with("Dairy", 0.6, 100.0, 50_000.0);
        assert!(simulate(&results, "dairy", 0.05).is_none());
        assert!(simulate(&ResultSet::default(), "Dairy", 0.05).is_none());
    }

    #[test]
    fn deterministic() {
        let results = results_with("Dairy", 0.6, 100.0, 50_000.0);
        assert_eq!(simulate(&results, "Dairy", 0.07), simulate(&results, "Dairy", 0.07));
    }
}
