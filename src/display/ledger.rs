//! Rollover ledger display formatting

use tabled::Tabled;

use super::render_table;
use crate::models::{format_amount, RolloverLedgerEntry};
use crate::services::RecomputeReport;

#[derive(Tabled)]
struct LedgerRow {
    #[tabled(rename = "Week Of")]
    week: String,
    #[tabled(rename = "Carry In")]
    carry_in: String,
    #[tabled(rename = "Variance")]
    variance: String,
    #[tabled(rename = "Carry Out")]
    carry_out: String,
}

/// Format one category's weekly chain, oldest first
pub fn format_ledger_chain(
    category_name: &str,
    entries: &[RolloverLedgerEntry],
    symbol: &str,
) -> String {
    if entries.is_empty() {
        return format!(
            "No ledger entries for {}.\n\nRun 'hearth ledger recompute --history' to build them.\n",
            category_name
        );
    }

    let rows: Vec<LedgerRow> = entries
        .iter()
        .map(|e| LedgerRow {
            week: e.period_start.format("%Y-%m-%d").to_string(),
            carry_in: format_amount(e.carry_in, symbol),
            variance: format_amount(e.variance(), symbol),
            carry_out: format_amount(e.carry_out, symbol),
        })
        .collect();

    format!("Rollover: {}\n\n{}\n", category_name, render_table(rows, 1))
}

/// One-line description of a recompute run
pub fn format_recompute_report(report: &RecomputeReport) -> String {
    if report.no_budget {
        return "No weekly budget set; nothing to recompute.".to_string();
    }
    format!(
        "Recomputed {} week{}, {} ledger entr{} written.",
        report.weeks_processed,
        if report.weeks_processed == 1 { "" } else { "s" },
        report.entries_written,
        if report.entries_written == 1 { "y" } else { "ies" }
    )
}
