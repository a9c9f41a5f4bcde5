//! Account display formatting

use tabled::Tabled;

use super::render_table;
use crate::models::Account;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Account")]
    nickname: String,
    #[tabled(rename = "Bank")]
    bank: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a list of accounts
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let rows: Vec<AccountRow> = accounts
        .iter()
        .map(|a| AccountRow {
            nickname: a.nickname.clone(),
            bank: a.bank_name.clone(),
            id: a.id.to_string(),
        })
        .collect();

    let mut output = render_table(rows, 3);
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HouseholdId;

    #[test]
    fn test_format_account_list() {
        let account = Account::new(HouseholdId::new(), "Bendigo Bank", "Savings");
        let output = format_account_list(&[account]);
        assert!(output.contains("Savings"));
        assert!(output.contains("Bendigo Bank"));
        assert!(output.contains("acc-"));
    }
}
