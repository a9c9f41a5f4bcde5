//! Dashboard display formatting

use tabled::Tabled;

use super::render_table;
use crate::models::format_amount;
use crate::services::{DashboardSummary, TrafficLight};

#[derive(Tabled)]
struct DashboardRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Carry In")]
    carry_in: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Spent")]
    spend: String,
    #[tabled(rename = "Left")]
    left: String,
}

fn light(status: TrafficLight) -> &'static str {
    match status {
        TrafficLight::Green => "● green",
        TrafficLight::Amber => "● amber",
        TrafficLight::Red => "● red",
    }
}

/// Format a dashboard as a category table followed by household totals
pub fn format_dashboard(summary: &DashboardSummary, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Dashboard: {}\n\n", summary.bounds));

    let rows: Vec<DashboardRow> = summary
        .categories
        .iter()
        .map(|c| DashboardRow {
            name: c.name.clone(),
            status: light(c.status).to_string(),
            budget: format_amount(c.budget, symbol),
            carry_in: format_amount(c.carry_in, symbol),
            available: format_amount(c.available, symbol),
            spend: format_amount(c.spend, symbol),
            left: format_amount(c.available - c.spend, symbol),
        })
        .collect();

    if rows.is_empty() {
        output.push_str("No budget lines.\n");
    } else {
        output.push_str(&render_table(rows, 2));
        output.push('\n');
    }

    let totals = &summary.totals;
    output.push('\n');
    output.push_str(&format!(
        "Expenses:  {} budgeted, {} spent ({})\n",
        format_amount(totals.expense_budget, symbol),
        format_amount(totals.spend, symbol),
        light(totals.status)
    ));
    output.push_str(&format!(
        "Income:    {} planned, net {}\n",
        format_amount(totals.income_budget, symbol),
        format_amount(totals.net_planned, symbol)
    ));
    output.push_str(&format!(
        "Pacing:    {} ({} vs expected)\n",
        light(totals.pacing),
        format_amount(totals.pace_delta, symbol)
    ));

    match (summary.last_data_at, summary.freshness_days) {
        (Some(at), Some(days)) => output.push_str(&format!(
            "Data:      last updated {} ({} day{} ago)\n",
            at.format("%Y-%m-%d %H:%M"),
            days,
            if days == 1 { "" } else { "s" }
        )),
        _ => output.push_str("Data:      no imports yet\n"),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, CategoryKind, PeriodBounds, PeriodType, WeekStart};
    use crate::services::{DashboardCategory, DashboardTotals};
    use chrono::NaiveDate;

    fn summary() -> DashboardSummary {
        let now = NaiveDate::from_ymd_opt(2025, 12, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        DashboardSummary {
            bounds: PeriodBounds::containing(PeriodType::Week, now, WeekStart::Monday),
            totals: DashboardTotals {
                budget: 250.0,
                spend: 120.0,
                expense_budget: 250.0,
                income_budget: 100.0,
                net_planned: -150.0,
                status: TrafficLight::Green,
                pacing: TrafficLight::Amber,
                pace_delta: -12.5,
            },
            categories: vec![DashboardCategory {
                id: CategoryId::new(),
                name: "Groceries".into(),
                kind: CategoryKind::Expense,
                budget: 250.0,
                spend: 120.0,
                carry_in: 10.0,
                available: 260.0,
                variance: 130.0,
                status: TrafficLight::Green,
            }],
            freshness_days: Some(1),
            last_data_at: Some(now),
        }
    }

    #[test]
    fn test_format_dashboard() {
        let output = format_dashboard(&summary(), "$");
        assert!(output.contains("week 2025-12-08 to 2025-12-14"));
        assert!(output.contains("Groceries"));
        assert!(output.contains("$260.00"));
        assert!(output.contains("$140.00"));
        assert!(output.contains("-$12.50"));
        assert!(output.contains("(1 day ago)"));
    }

    #[test]
    fn test_format_dashboard_without_data() {
        let mut summary = summary();
        summary.categories.clear();
        summary.freshness_days = None;
        summary.last_data_at = None;

        let output = format_dashboard(&summary, "$");
        assert!(output.contains("No budget lines."));
        assert!(output.contains("no imports yet"));
    }
}
