//! Weekly budget display formatting

use std::collections::HashMap;

use tabled::Tabled;

use super::render_table;
use crate::models::{Budget, Category, CategoryId, CategoryKind, Money};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Weekly")]
    weekly: String,
    #[tabled(rename = "Fortnightly")]
    fortnightly: String,
}

/// Format the weekly budget's lines in category display order
pub fn format_budget(budget: &Budget, categories: &[Category], symbol: &str) -> String {
    let order: HashMap<CategoryId, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();
    let by_id: HashMap<CategoryId, &Category> = categories.iter().map(|c| (c.id, c)).collect();

    let mut lines: Vec<_> = budget.lines.iter().collect();
    lines.sort_by_key(|l| order.get(&l.category_id).copied().unwrap_or(usize::MAX));

    let mut expenses = Money::zero();
    let mut income = Money::zero();
    let rows: Vec<BudgetRow> = lines
        .iter()
        .map(|line| {
            let category = by_id.get(&line.category_id);
            let kind = category.map(|c| c.kind).unwrap_or_default();
            match kind {
                CategoryKind::Expense => expenses += line.amount,
                CategoryKind::Income => income += line.amount,
            }
            BudgetRow {
                name: category
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| line.category_id.to_string()),
                kind: kind.to_string(),
                weekly: line.amount.format_with_symbol(symbol),
                fortnightly: (line.amount + line.amount).format_with_symbol(symbol),
            }
        })
        .collect();

    let mut output = format!("Weekly budget from {}\n\n", budget.starts_on.format("%Y-%m-%d"));
    if rows.is_empty() {
        output.push_str("No budget lines.\n");
        return output;
    }

    output.push_str(&render_table(rows, 2));
    output.push_str("\n\n");
    output.push_str(&format!(
        "Expenses: {}/week   Income: {}/week   Net: {}/week\n",
        expenses.format_with_symbol(symbol),
        income.format_with_symbol(symbol),
        (income - expenses).format_with_symbol(symbol)
    ));
    output
}
