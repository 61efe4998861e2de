use crate::boundary::BoundaryWarning;
use crate::domain::ModuleRecord;
use crate::error::Result;
use crate::project::{LoadedModules, ModuleSource};

/// In-memory module source for testing without project files
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<ModuleRecord>,
    warnings: Vec<BoundaryWarning>,
}

impl StaticSource {
    /// Create a new empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module record
    pub fn add_record(&mut self, record: ModuleRecord) {
        self.records.push(record);
    }

    /// Add a warning reported alongside the records
    pub fn add_warning(&mut self, warning: BoundaryWarning) {
        self.warnings.push(warning);
    }
}

impl From<Vec<ModuleRecord>> for StaticSource {
    fn from(records: Vec<ModuleRecord>) -> Self {
        StaticSource {
            records,
            warnings: Vec::new(),
        }
    }
}

impl ModuleSource for StaticSource {
    fn load(&self) -> Result<LoadedModules> {
        Ok(LoadedModules {
            records: self.records.clone(),
            warnings: self.warnings.clone(),
        })
    }
}
