//! Rule-based categorisation
//!
//! [`RuleMatcher`] compiles a household's rules once and picks the category
//! of the first rule that matches a description. [`RuleService`] manages the
//! stored rules.

use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryId, HouseholdId, MatchType, Rule, RuleId};
use crate::storage::Storage;

#[derive(Debug)]
enum Matcher {
    Contains(String),
    StartsWith(String),
    Regex(Regex),
}

impl Matcher {
    fn compile(rule: &Rule) -> Result<Self, regex::Error> {
        Ok(match rule.match_type {
            MatchType::Contains => Self::Contains(rule.pattern.to_lowercase()),
            MatchType::StartsWith => Self::StartsWith(rule.pattern.to_lowercase()),
            MatchType::Regex => Self::Regex(
                RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()?,
            ),
        })
    }

    fn is_match(&self, description: &str, lower: &str) -> bool {
        match self {
            Self::Contains(pattern) => lower.contains(pattern.as_str()),
            Self::StartsWith(pattern) => lower.starts_with(pattern.as_str()),
            Self::Regex(regex) => regex.is_match(description),
        }
    }
}

/// Compiled rules in evaluation order
#[derive(Debug, Default)]
pub struct RuleMatcher {
    matchers: Vec<(Matcher, CategoryId)>,
}

impl RuleMatcher {
    /// Compile rules in the order given (callers pass them sorted by
    /// priority). Rules whose regex does not compile are skipped.
    pub fn new(rules: &[Rule]) -> Self {
        let matchers = rules
            .iter()
            .filter_map(|rule| match Matcher::compile(rule) {
                Ok(matcher) => Some((matcher, rule.category_id)),
                Err(e) => {
                    warn!(rule = %rule.id, pattern = %rule.pattern, error = %e, "skipping rule with invalid regex");
                    None
                }
            })
            .collect();
        Self { matchers }
    }

    /// Category of the first matching rule
    pub fn categorise(&self, description: &str) -> Option<CategoryId> {
        let lower = description.to_lowercase();
        self.matchers
            .iter()
            .find(|(matcher, _)| matcher.is_match(description, &lower))
            .map(|(_, category_id)| *category_id)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Service for managing categorisation rules
pub struct RuleService<'a> {
    storage: &'a Storage,
}

impl<'a> RuleService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The household's rules in evaluation order
    pub fn list(&self, household_id: HouseholdId) -> BudgetResult<Vec<Rule>> {
        self.storage.rules.for_household(household_id)
    }

    /// A matcher over the household's current rules
    pub fn matcher(&self, household_id: HouseholdId) -> BudgetResult<RuleMatcher> {
        Ok(RuleMatcher::new(&self.list(household_id)?))
    }

    /// Add a rule after validating its pattern and category
    pub fn add(
        &self,
        household_id: HouseholdId,
        pattern: &str,
        match_type: MatchType,
        category_id: CategoryId,
        priority: i32,
    ) -> BudgetResult<Rule> {
        let rule = Rule::new(household_id, pattern.trim(), match_type, category_id, priority);
        self.validate(&rule)?;

        self.storage.rules.upsert(rule.clone())?;
        self.storage.rules.save()?;
        Ok(rule)
    }

    /// Replace an existing rule's pattern, match type, category and priority
    pub fn update(&self, rule: Rule) -> BudgetResult<Rule> {
        let existing = self
            .storage
            .rules
            .get(rule.id)?
            .filter(|r| r.household_id == rule.household_id)
            .ok_or_else(|| BudgetError::rule_not_found(rule.id.to_string()))?;

        let updated = Rule {
            id: existing.id,
            household_id: existing.household_id,
            pattern: rule.pattern.trim().to_string(),
            ..rule
        };
        self.validate(&updated)?;

        self.storage.rules.upsert(updated.clone())?;
        self.storage.rules.save()?;
        Ok(updated)
    }

    /// Delete a rule of the household
    pub fn remove(&self, household_id: HouseholdId, rule_id: RuleId) -> BudgetResult<Rule> {
        let rule = self
            .storage
            .rules
            .get(rule_id)?
            .filter(|r| r.household_id == household_id)
            .ok_or_else(|| BudgetError::rule_not_found(rule_id.to_string()))?;

        self.storage.rules.delete(rule_id)?;
        self.storage.rules.save()?;
        Ok(rule)
    }

    /// Find a household rule by a short or full id
    pub fn find(&self, household_id: HouseholdId, reference: &str) -> BudgetResult<Rule> {
        let mut matches: Vec<_> = self
            .list(household_id)?
            .into_iter()
            .filter(|r| r.id.matches_prefix(reference))
            .collect();

        if matches.len() > 1 {
            return Err(BudgetError::Validation(format!(
                "Rule reference '{}' is ambiguous",
                reference
            )));
        }
        matches
            .pop()
            .ok_or_else(|| BudgetError::rule_not_found(reference))
    }

    fn validate(&self, rule: &Rule) -> BudgetResult<()> {
        if rule.pattern.is_empty() {
            return Err(BudgetError::Validation("Rule pattern cannot be empty".into()));
        }

        if rule.match_type == MatchType::Regex {
            Regex::new(&rule.pattern).map_err(|e| {
                BudgetError::Validation(format!("Invalid regex '{}': {}", rule.pattern, e))
            })?;
        }

        self.storage
            .categories
            .get(rule.category_id)?
            .filter(|c| c.household_id == rule.household_id)
            .ok_or_else(|| BudgetError::category_not_found(rule.category_id.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::Category;
    use tempfile::TempDir;

    fn rule(pattern: &str, match_type: MatchType, category: CategoryId, priority: i32) -> Rule {
        Rule::new(HouseholdId::new(), pattern, match_type, category, priority)
    }

    #[test]
    fn first_rule_in_given_order_wins() {
        let store = CategoryId::new();
        let woolworths = CategoryId::new();
        let matcher = RuleMatcher::new(&[
            rule("Store", MatchType::Contains, store, 20),
            rule("Woolworths", MatchType::Contains, woolworths, 10),
        ]);

        assert_eq!(matcher.categorise("Woolworths Store 123"), Some(store));
    }

    #[test]
    fn contains_and_starts_with_ignore_case() {
        let fuel = CategoryId::new();
        let groceries = CategoryId::new();
        let matcher = RuleMatcher::new(&[
            rule("ampol", MatchType::StartsWith, fuel, 1),
            rule("COLES", MatchType::Contains, groceries, 2),
        ]);

        assert_eq!(matcher.categorise("AMPOL FOODARY 123"), Some(fuel));
        assert_eq!(matcher.categorise("EFTPOS coles 0456"), Some(groceries));
        assert_eq!(matcher.categorise("SHELL AMPOL"), None);
    }

    #[test]
    fn regex_is_case_insensitive() {
        let numbers = CategoryId::new();
        let internet = CategoryId::new();
        let matcher = RuleMatcher::new(&[
            rule("^launtel\\b", MatchType::Regex, internet, 1),
            rule("[0-9]+", MatchType::Regex, numbers, 2),
        ]);

        assert_eq!(matcher.categorise("LAUNTEL PTY LTD"), Some(internet));
        assert_eq!(matcher.categorise("ABC123"), Some(numbers));
    }

    #[test]
    fn invalid_regex_is_skipped() {
        let fallback = CategoryId::new();
        let matcher = RuleMatcher::new(&[
            rule("([unclosed", MatchType::Regex, CategoryId::new(), 1),
            rule("unclosed", MatchType::Contains, fallback, 2),
        ]);

        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.categorise("([unclosed"), Some(fallback));
    }

    #[test]
    fn empty_matcher_matches_nothing() {
        let matcher = RuleMatcher::new(&[]);
        assert!(matcher.is_empty());
        assert_eq!(matcher.categorise("anything"), None);
    }

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn service_validates_category_and_regex() {
        let (_temp_dir, storage) = create_storage();
        let household = HouseholdId::new();
        let fuel = Category::new(household, "Fuel");
        storage.categories.upsert(fuel.clone()).unwrap();
        let service = RuleService::new(&storage);

        let added = service
            .add(household, " Ampol ", MatchType::Contains, fuel.id, 20)
            .unwrap();
        assert_eq!(added.pattern, "Ampol");

        let err = service
            .add(household, "(", MatchType::Regex, fuel.id, 1)
            .unwrap_err();
        assert!(err.is_validation());

        let foreign = Category::new(HouseholdId::new(), "Fuel");
        storage.categories.upsert(foreign.clone()).unwrap();
        let err = service
            .add(household, "bp", MatchType::Contains, foreign.id, 1)
            .unwrap_err();
        assert!(err.is_not_found());

        let err = service
            .add(household, "  ", MatchType::Contains, fuel.id, 1)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn service_update_find_and_remove() {
        let (_temp_dir, storage) = create_storage();
        let household = HouseholdId::new();
        let fuel = Category::new(household, "Fuel");
        storage.categories.upsert(fuel.clone()).unwrap();
        let service = RuleService::new(&storage);

        let rule = service
            .add(household, "Ampol", MatchType::Contains, fuel.id, 20)
            .unwrap();
        let found = service.find(household, &rule.id.to_string()).unwrap();
        assert_eq!(found.id, rule.id);

        let updated = service
            .update(Rule {
                priority: 5,
                match_type: MatchType::StartsWith,
                ..rule.clone()
            })
            .unwrap();
        assert_eq!(updated.priority, 5);
        assert_eq!(service.list(household).unwrap()[0].match_type, MatchType::StartsWith);

        service.remove(household, rule.id).unwrap();
        assert!(service.list(household).unwrap().is_empty());
        assert!(service.remove(household, rule.id).unwrap_err().is_not_found());
    }
}
