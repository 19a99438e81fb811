//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimation code stays clean and testable
//! - output changes are localized
//!
//! This is the only place where fractional percentages become `×100` display values.

use crate::domain::{
    CategoryResult, ColumnMapping, FitWarning, LoadReport, ResultSet, SimulationResult, SummaryStats,
};
use crate::report::{demand_distribution, price_sensitive, pricing_opportunities};

/// Format the load/cleaning summary.
pub fn format_load_report(report: &LoadReport, columns: &ColumnMapping) -> String {
    let mut out = String::new();
    out.push_str("=== pe - Price Elasticity Analysis ===\n");
    out.push_str(&format!(
        "Columns: price=`{}` sales=`{}` category=`{}`\n",
        columns.price, columns.sales, columns.category
    ));
    out.push_str(&format!(
        "Records: read={} | kept={} | removed={} ({:.2}%)\n",
        report.original_size, report.cleaned_size, report.removed_records, report.removal_pct
    ));
    if report.removed_records > 0 {
        out.push_str(&format!(
            "  missing price/sales: {} | non-positive price/sales: {}\n",
            report.missing_values, report.non_positive
        ));
    }
    out
}

/// Format headline metrics, the demand-regime mix and the dataset correlation.
pub fn format_summary(stats: &SummaryStats, results: &ResultSet, correlation: Option<f64>) -> String {
    let mut out = String::new();
    out.push_str("Summary:\n");
    out.push_str(&format!("- categories analyzed : {}\n", stats.total_categories));
    out.push_str(&format!(
        "- inelastic (e < 1)   : {} ({:.1}%)\n",
        stats.inelastic_categories, stats.inelastic_pct
    ));
    out.push_str(&format!("- elastic             : {}\n", stats.elastic_categories));
    out.push_str(&format!("- average elasticity  : {:.3}\n", stats.avg_elasticity));
    out.push_str(&format!(
        "- significant (p<0.05): {}/{}\n",
        stats.significant_results, stats.total_categories
    ));
    out.push_str(&format!("- average R²          : {:.3}\n", stats.avg_r_squared));
    out.push_str(&format!(
        "- price/sales corr.   : {}\n",
        correlation.map(|c| format!("{c:.3}")).unwrap_or_else(|| "n/a".to_string())
    ));

    let dist = demand_distribution(results);
    if !dist.is_empty() {
        out.push_str("\nDemand regimes:\n");
        let total = results.len().max(1) as f64;
        for (kind, n) in dist {
            out.push_str(&format!(
                "- {:<17} {:>3} ({:.1}%)\n",
                kind.display_name(),
                n,
                n as f64 / total * 100.0
            ));
        }
    }
    out
}

/// Format the result table (all rows when `top_n == 0`).
pub fn format_results_table(results: &ResultSet, top_n: usize) -> String {
    let rows = results.rows();
    let shown = if top_n == 0 { rows.len() } else { top_n.min(rows.len()) };

    let mut out = String::new();
    out.push_str("Elasticity by category:\n");
    if rows.is_empty() {
        out.push_str("  (no category met the minimum observation count)\n");
        return out;
    }
    out.push_str(&format_table(&rows[..shown]));
    if shown < rows.len() {
        out.push_str(&format!("  ... {} more\n", rows.len() - shown));
    }
    out
}

/// Format pricing opportunities (inelastic) and price-sensitive (elastic) categories.
pub fn format_opportunities(results: &ResultSet) -> String {
    let mut out = String::new();

    let opportunities = pricing_opportunities(results);
    out.push_str("Pricing opportunities (inelastic, e < 1):\n");
    if let Some(top) = opportunities.first() {
        out.push_str(&format_table(&opportunities));
        out.push_str(&format!(
            "Top opportunity: {} (e={:.3}, avg price={:.2}, total sales={:.2})\n",
            top.category, top.elasticity, top.avg_price, top.total_sales
        ));
    } else {
        out.push_str("  (no inelastic categories found)\n");
    }

    let sensitive = price_sensitive(results);
    if !sensitive.is_empty() {
        out.push_str("\nPrice-sensitive (elastic, e > 1):\n");
        out.push_str(&format_table(&sensitive));
    }
    out
}

/// Format a simulation outcome.
pub fn format_simulation(sim: &SimulationResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Simulation: {}\n", sim.category));
    out.push_str(&format!("- elasticity        : {:.4}\n", sim.elasticity));
    out.push_str(&format!(
        "- price             : {:.2} -> {:.2} ({:+.1}%)\n",
        sim.current_price,
        sim.new_price,
        sim.price_change_pct * 100.0
    ));
    out.push_str(&format!("- expected qty chg. : {:+.2}%\n", sim.quantity_change_pct * 100.0));
    out.push_str(&format!("- revenue change    : {:+.2}%\n", sim.revenue_change_pct * 100.0));
    out.push_str(&format!(
        "- revenue impact    : {:+.2} (on total sales {:.2})\n",
        sim.estimated_revenue_impact, sim.current_total_sales
    ));
    if sim.improves_revenue() {
        out.push_str("Price change likely to improve revenue.\n");
    } else {
        out.push_str("Revenue may decrease with this price change.\n");
    }
    out
}

/// Format the categories that were skipped because their fit failed.
pub fn format_warnings(warnings: &[FitWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("Skipped categories:\n");
    for w in warnings {
        out.push_str(&format!("- {} (n={}): {}\n", w.category, w.num_products, w.reason));
    }
    out
}

/// Compare generated (true) elasticities against the estimates for `pe demo`.
pub fn format_recovery(truth: &[(String, f64)], results: &ResultSet) -> String {
    let mut out = String::new();
    out.push_str("True vs estimated elasticity:\n");
    out.push_str(&format!("{:<24} {:>10} {:>10} {:>8}\n", "category", "true", "estimated", "error"));
    for (category, e) in truth {
        match results.get(category) {
            Some(r) => out.push_str(&format!(
                "{:<24} {:>10.4} {:>10.4} {:>8.4}\n",
                truncate(category, 24),
                e,
                r.elasticity,
                r.elasticity - e
            )),
            None => out.push_str(&format!("{:<24} {:>10.4} {:>10} {:>8}\n", truncate(category, 24), e, "-", "-")),
        }
    }
    out
}

fn format_table(rows: &[CategoryResult]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<24} {:>10} {:>8} {:>6} {:>10} {:>14} {:>5} {:<17} {:<4}\n",
            "category", "elasticity", "p_value", "r2", "avg_price", "total_sales", "n", "demand_type", "up?"
        )
        .trim_end(),
    );
    out.push('\n');

    out.push_str(
        format!(
            "{:-<24} {:-<10} {:-<8} {:-<6} {:-<10} {:-<14} {:-<5} {:-<17} {:-<4}\n",
            "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<24} {:>10.4} {:>8.4} {:>6.3} {:>10.2} {:>14.2} {:>5} {:<17} {:<4}\n",
                truncate(&r.category, 24),
                r.elasticity,
                r.p_value,
                r.r_squared,
                r.avg_price,
                r.total_sales,
                r.num_products,
                r.demand_type.display_name(),
                if r.can_increase_price { "Yes" } else { "No" },
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
