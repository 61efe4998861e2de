use crate::domain::version::SemanticVersion;
use std::fmt;
use std::path::PathBuf;

/// Index of a module inside a [`crate::graph::ModuleGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

/// A module or package as seen from one consumer
///
/// `version` is what storage currently records; `new_version` is what this
/// run decided to assign, if anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRefInfo {
    pub id: String,
    pub version: Option<SemanticVersion>,
    pub new_version: Option<SemanticVersion>,
}

impl ModuleRefInfo {
    pub fn new(id: impl Into<String>, version: Option<SemanticVersion>) -> Self {
        ModuleRefInfo {
            id: id.into(),
            version,
            new_version: None,
        }
    }

    /// Best version known so far: the assigned one, else the recorded one
    pub fn best_version(&self) -> Option<&SemanticVersion> {
        self.new_version.as_ref().or(self.version.as_ref())
    }

    /// Accept `candidate` only if it is strictly greater than the best version
    /// known so far
    ///
    /// Returns `true` when `new_version` moved. Targets never move downward.
    pub fn set_new_version(&mut self, candidate: &SemanticVersion) -> bool {
        let accepted = match self.best_version() {
            Some(best) => candidate > best,
            None => true,
        };
        if accepted {
            self.new_version = Some(candidate.clone());
        }
        accepted
    }

    /// Whether a new version strictly above the recorded one was assigned
    pub fn is_bumped(&self) -> bool {
        match (&self.new_version, &self.version) {
            (Some(new), Some(old)) => new > old,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl fmt::Display for ModuleRefInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let old = self
            .version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "None".to_string());
        match &self.new_version {
            Some(new) => write!(f, "{} ({} => {})", self.id, old, new),
            None => write!(f, "{} ({})", self.id, old),
        }
    }
}

/// Storage details carried through the graph for the writer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMetadata {
    pub framework: Option<String>,
    pub assembly_info_path: Option<PathBuf>,
    pub assembly_version: Option<SemanticVersion>,
    pub file_version: Option<SemanticVersion>,
}

/// One parsed module declaration, before references are resolved
///
/// `module_references` hold the storage path (or id) of each referenced
/// sibling module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleRecord {
    pub info: ModuleRefInfo,
    pub path: PathBuf,
    pub package_references: Vec<ModuleRefInfo>,
    pub module_references: Vec<String>,
    pub is_test_module: bool,
    pub package_id: Option<String>,
    pub metadata: ProjectMetadata,
}

impl ModuleRecord {
    pub fn new(id: impl Into<String>, version: &str, path: impl Into<PathBuf>) -> Self {
        ModuleRecord {
            info: ModuleRefInfo::new(id, SemanticVersion::parse(version).ok()),
            path: path.into(),
            package_references: Vec::new(),
            module_references: Vec::new(),
            is_test_module: false,
            package_id: None,
            metadata: ProjectMetadata::default(),
        }
    }

    pub fn with_module_reference(mut self, key: impl Into<String>) -> Self {
        self.module_references.push(key.into());
        self
    }

    pub fn with_package_reference(mut self, id: impl Into<String>, version: &str) -> Self {
        self.package_references
            .push(ModuleRefInfo::new(id, SemanticVersion::parse(version).ok()));
        self
    }

    pub fn with_package_id(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    pub fn as_test_module(mut self) -> Self {
        self.is_test_module = true;
        self
    }
}

/// A build unit inside a graph, with module references resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub info: ModuleRefInfo,
    pub path: PathBuf,
    pub package_references: Vec<ModuleRefInfo>,
    pub module_references: Vec<ModuleId>,
    pub is_test_module: bool,
    pub package_id: Option<String>,
    pub metadata: ProjectMetadata,
}

impl Module {
    pub fn id(&self) -> &str {
        &self.info.id
    }

    pub fn find_package_reference(&self, id: &str) -> Option<&ModuleRefInfo> {
        self.package_references.iter().find(|r| r.id == id)
    }
}
