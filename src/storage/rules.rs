//! Categorisation rule repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{HouseholdId, Rule, RuleId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RuleData {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Repository for rule persistence
pub struct RuleRepository {
    path: PathBuf,
    rules: RwLock<HashMap<RuleId, Rule>>,
}

impl RuleRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            rules: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: RuleData = read_json(&self.path)?;

        let mut rules = self
            .rules
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        rules.clear();
        for rule in file_data.rules {
            rules.insert(rule.id, rule);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = rules.values().cloned().collect();
        sort_by_priority(&mut list);

        write_json_atomic(&self.path, &RuleData { rules: list })
    }

    pub fn get(&self, id: RuleId) -> Result<Option<Rule>, BudgetError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(rules.get(&id).cloned())
    }

    /// A household's rules in evaluation order (ascending priority)
    pub fn for_household(&self, household_id: HouseholdId) -> Result<Vec<Rule>, BudgetError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = rules
            .values()
            .filter(|r| r.household_id == household_id)
            .cloned()
            .collect();
        sort_by_priority(&mut list);
        Ok(list)
    }

    pub fn upsert(&self, rule: Rule) -> Result<(), BudgetError> {
        let mut rules = self
            .rules
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        rules.insert(rule.id, rule);
        Ok(())
    }

    /// Delete a rule, returning whether it existed
    pub fn delete(&self, id: RuleId) -> Result<bool, BudgetError> {
        let mut rules = self
            .rules
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(rules.remove(&id).is_some())
    }
}

// Ties keep a stable order by pattern so evaluation never depends on map order
fn sort_by_priority(list: &mut [Rule]) {
    list.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.pattern.cmp(&b.pattern))
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, MatchType};
    use tempfile::TempDir;

    #[test]
    fn test_for_household_orders_by_priority() {
        let temp_dir = TempDir::new().unwrap();
        let repo = RuleRepository::new(temp_dir.path().join("rules.json"));
        let household = HouseholdId::new();
        let category = CategoryId::new();

        repo.upsert(Rule::new(household, "woolworths", MatchType::Contains, category, 10))
            .unwrap();
        repo.upsert(Rule::new(household, "bp", MatchType::StartsWith, category, 1))
            .unwrap();
        repo.upsert(Rule::new(HouseholdId::new(), "x", MatchType::Contains, category, 0))
            .unwrap();

        let patterns: Vec<_> = repo
            .for_household(household)
            .unwrap()
            .into_iter()
            .map(|r| r.pattern)
            .collect();
        assert_eq!(patterns, vec!["bp", "woolworths"]);
    }

    #[test]
    fn test_delete_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.json");
        let repo = RuleRepository::new(path.clone());
        let household = HouseholdId::new();
        let keep = Rule::new(household, "coles", MatchType::Contains, CategoryId::new(), 1);
        let drop = Rule::new(household, "shell", MatchType::Contains, CategoryId::new(), 2);
        let drop_id = drop.id;

        repo.upsert(keep.clone()).unwrap();
        repo.upsert(drop).unwrap();
        assert!(repo.delete(drop_id).unwrap());
        assert!(!repo.delete(drop_id).unwrap());
        repo.save().unwrap();

        let repo2 = RuleRepository::new(path);
        repo2.load().unwrap();
        assert_eq!(repo2.for_household(household).unwrap(), vec![keep]);
    }
}
