//! `dashboard` command

use crate::config::Settings;
use crate::display::format_dashboard;
use crate::error::{BudgetError, BudgetResult};
use crate::models::PeriodType;
use crate::services::DashboardService;
use crate::storage::Storage;

/// Show the dashboard for the period containing today
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    period: Option<&str>,
    json: bool,
) -> BudgetResult<()> {
    let household_id = settings.require_household()?;
    let period_type = match period {
        Some(text) => PeriodType::parse_or_week(text),
        None => settings.default_period_type(),
    };

    let service = DashboardService::new(storage, settings.week_starts_on);
    let Some(summary) = service.dashboard(household_id, period_type)? else {
        if json {
            println!("null");
        } else {
            println!("No weekly budget set. Run 'hearth budget set <category> <amount>'.");
        }
        return Ok(());
    };

    if json {
        let rendered = serde_json::to_string_pretty(&summary)
            .map_err(|e| BudgetError::Json(e.to_string()))?;
        println!("{}", rendered);
    } else {
        print!("{}", format_dashboard(&summary, &settings.currency_symbol));
    }
    Ok(())
}
