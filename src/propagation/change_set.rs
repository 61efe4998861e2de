use crate::domain::{Module, ModuleId, ModuleRefInfo, SemanticVersion};
use crate::graph::ModuleGraph;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

/// One member of a change set
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEntry {
    /// A module of the graph; its target version lives on the module itself
    Module(ModuleId),
    /// A requested change for a name the graph does not contain
    Placeholder(ModuleRefInfo),
}

/// Accumulated result of a propagation run
///
/// Entries keep first-insertion order and are keyed by module name. Nothing
/// is ever removed.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    entries: IndexMap<String, ChangeEntry>,
    members: HashSet<ModuleId>,
    package_ids: IndexSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a graph module; returns `false` if it was already present
    ///
    /// The module's package id, if any, is recorded as well.
    pub fn add(&mut self, id: ModuleId, module: &Module) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.entries
            .insert(module.id().to_string(), ChangeEntry::Module(id));
        if let Some(package_id) = &module.package_id {
            self.package_ids.insert(package_id.clone());
        }
        true
    }

    /// Add or raise a placeholder for a name outside the graph
    ///
    /// An existing placeholder only moves upward; returns `true` when the
    /// set changed.
    pub fn add_placeholder(&mut self, info: ModuleRefInfo) -> bool {
        match self.entries.get_mut(&info.id) {
            Some(ChangeEntry::Placeholder(existing)) => match &info.new_version {
                Some(candidate) => existing.set_new_version(candidate),
                None => false,
            },
            Some(ChangeEntry::Module(_)) => false,
            None => {
                self.entries
                    .insert(info.id.clone(), ChangeEntry::Placeholder(info));
                true
            }
        }
    }

    /// Identity membership test for a graph module
    pub fn contains(&self, id: ModuleId) -> bool {
        self.members.contains(&id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Target version assigned to the named member, if it is in the set
    ///
    /// Names are matched against module ids first, then package ids.
    pub fn target_version<'a>(
        &'a self,
        graph: &'a ModuleGraph,
        name: &str,
    ) -> Option<&'a SemanticVersion> {
        match self.entries.get(name) {
            Some(ChangeEntry::Module(id)) => graph.module(*id).info.new_version.as_ref(),
            Some(ChangeEntry::Placeholder(info)) => info.new_version.as_ref(),
            None if self.package_ids.contains(name) => self
                .changed_modules()
                .map(|id| graph.module(id))
                .find(|module| module.package_id.as_deref() == Some(name))
                .and_then(|module| module.info.new_version.as_ref()),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.values()
    }

    /// Graph modules in the set, in insertion order
    pub fn changed_modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.entries.values().filter_map(|entry| match entry {
            ChangeEntry::Module(id) => Some(*id),
            ChangeEntry::Placeholder(_) => None,
        })
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &ModuleRefInfo> {
        self.entries.values().filter_map(|entry| match entry {
            ChangeEntry::Placeholder(info) => Some(info),
            ChangeEntry::Module(_) => None,
        })
    }

    /// Package ids of changed modules, in insertion order
    pub fn package_ids(&self) -> impl Iterator<Item = &str> {
        self.package_ids.iter().map(String::as_str)
    }

    /// Member names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
