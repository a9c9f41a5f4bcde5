//! Rule display formatting

use std::collections::HashMap;

use tabled::Tabled;

use super::render_table;
use crate::models::{CategoryId, Rule};

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Priority")]
    priority: i32,
    #[tabled(rename = "Match")]
    match_type: String,
    #[tabled(rename = "Pattern")]
    pattern: String,
    #[tabled(rename = "Category")]
    category: String,
}

/// Format rules in evaluation order
pub fn format_rule_list(rules: &[Rule], category_names: &HashMap<CategoryId, String>) -> String {
    if rules.is_empty() {
        return "No rules found.\n\nAdd one with 'hearth rule add <pattern> <category>'.\n"
            .to_string();
    }

    let rows: Vec<RuleRow> = rules
        .iter()
        .map(|r| RuleRow {
            id: r.id.to_string(),
            priority: r.priority,
            match_type: r.match_type.to_string(),
            pattern: r.pattern.clone(),
            category: category_names
                .get(&r.category_id)
                .cloned()
                .unwrap_or_else(|| r.category_id.to_string()),
        })
        .collect();

    let mut output = render_table(rows, 5);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HouseholdId, MatchType};

    #[test]
    fn test_format_rule_list() {
        let fuel = CategoryId::new();
        let names = HashMap::from([(fuel, "Fuel".to_string())]);
        let rule = Rule::new(HouseholdId::new(), "Ampol", MatchType::StartsWith, fuel, 20);

        let output = format_rule_list(&[rule], &names);
        assert!(output.contains("Ampol"));
        assert!(output.contains("starts_with"));
        assert!(output.contains("Fuel"));
    }

    #[test]
    fn test_format_empty_rule_list() {
        assert!(format_rule_list(&[], &HashMap::new()).starts_with("No rules found."));
    }
}
