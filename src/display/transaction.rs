//! Transaction display formatting
//!
//! Renders imported transactions as a register table with signed amounts:
//! debits show as negative, credits as positive.

use std::collections::HashMap;

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::{CategoryId, Direction, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format a list of transactions as a register
pub fn format_transaction_list(
    transactions: &[Transaction],
    category_names: &HashMap<CategoryId, String>,
    symbol: &str,
    date_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|t| {
            let amount = match t.direction {
                Direction::Debit => -t.amount,
                Direction::Credit => t.amount,
            };
            TransactionRow {
                id: t.id.to_string(),
                date: t.date.format(date_format).to_string(),
                description: truncate(&t.description, 40),
                category: t
                    .category_id
                    .and_then(|id| category_names.get(&id).cloned())
                    .unwrap_or_else(|| "(uncategorised)".to_string()),
                amount: amount.format_with_symbol(symbol),
            }
        })
        .collect();

    format!(
        "{}\n{} transaction{}\n",
        render_table(rows, 4),
        transactions.len(),
        if transactions.len() == 1 { "" } else { "s" }
    )
}
