//! Category display formatting

use tabled::Tabled;

use super::render_table;
use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a simple list of categories
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'hearth init' to create default categories.\n"
            .to_string();
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            kind: c.kind.to_string(),
            id: c.id.to_string(),
        })
        .collect();

    let mut output = render_table(rows, 3);
    output.push('\n');
    output
}
