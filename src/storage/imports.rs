//! Import record repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{HouseholdId, ImportId, ImportRecord, ImportStatus};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ImportData {
    #[serde(default)]
    imports: Vec<ImportRecord>,
}

/// Repository for import record persistence
pub struct ImportRepository {
    path: PathBuf,
    imports: RwLock<HashMap<ImportId, ImportRecord>>,
}

impl ImportRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            imports: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: ImportData = read_json(&self.path)?;

        let mut imports = self
            .imports
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        imports.clear();
        for record in file_data.imports {
            imports.insert(record.id, record);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let imports = self
            .imports
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut list: Vec<_> = imports.values().cloned().collect();
        list.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        write_json_atomic(&self.path, &ImportData { imports: list })
    }

    pub fn get(&self, id: ImportId) -> Result<Option<ImportRecord>, BudgetError> {
        let imports = self
            .imports
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(imports.get(&id).cloned())
    }

    pub fn upsert(&self, record: ImportRecord) -> Result<(), BudgetError> {
        let mut imports = self
            .imports
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        imports.insert(record.id, record);
        Ok(())
    }

    /// The household's most recently uploaded import that parsed successfully
    pub fn latest_parsed(
        &self,
        household_id: HouseholdId,
    ) -> Result<Option<ImportRecord>, BudgetError> {
        let imports = self
            .imports
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(imports
            .values()
            .filter(|r| r.household_id == household_id && r.status == ImportStatus::Parsed)
            .max_by_key(|r| r.uploaded_at)
            .cloned())
    }
}
