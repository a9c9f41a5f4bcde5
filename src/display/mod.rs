//! Display formatting for terminal output
//!
//! Turns service results into `tabled` tables and short summaries. Every
//! formatter returns a `String`; printing is left to the CLI.

pub mod account;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod ledger;
pub mod rule;
pub mod transaction;

pub use account::format_account_list;
pub use budget::format_budget;
pub use category::format_category_list;
pub use dashboard::format_dashboard;
pub use ledger::format_ledger_chain;
pub use rule::format_rule_list;
pub use transaction::format_transaction_list;

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

/// Render rows as a table, right-aligning columns from `numeric_from` on
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, numeric_from: usize) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(numeric_from..)).with(Alignment::right()));
    table.to_string()
}

/// Truncate to `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
