use crate::domain::{ModuleId, ModuleRefInfo, SemanticVersion};
use crate::error::Result;
use crate::graph::ModuleGraph;
use crate::propagation::ChangeSet;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// What makes a module that is not yet in the change set require a new version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerPolicy {
    /// Only a referenced module entering the change set bumps the owner.
    /// Package-reference updates are bookkeeping for the writer.
    #[default]
    ModuleReferences,
    /// A package-reference update bumps the owner too.
    AnyReference,
}

/// Tuning for a propagation run
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationOptions {
    pub trigger: TriggerPolicy,
    /// Pre-release line for derived versions (e.g. "alpha"); empty for none
    pub pre_release_signature: String,
    /// Version assigned to an affected module with no recorded version
    pub placeholder_version: SemanticVersion,
}

impl Default for PropagationOptions {
    fn default() -> Self {
        PropagationOptions {
            trigger: TriggerPolicy::default(),
            pre_release_signature: String::new(),
            placeholder_version: SemanticVersion::new(&[1, 0, 1]),
        }
    }
}

/// Outcome of an explicit version request
#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    /// The module was found and now targets the requested version
    Changed(ModuleId),
    /// No module has that name; a placeholder entry was recorded
    Placeholder,
    /// The module exists but the request would not move its version upward
    Rejected { current: Option<SemanticVersion> },
}

/// Expands explicit version requests to every dependent module
///
/// Runs full sweeps over the graph until a sweep adds nothing. Each sweep
/// first updates package-reference bookkeeping against the change set, then
/// bumps modules whose referenced modules are in the change set.
#[derive(Debug, Clone, Default)]
pub struct VersionPropagator {
    options: PropagationOptions,
}

impl VersionPropagator {
    pub fn new(options: PropagationOptions) -> Self {
        VersionPropagator { options }
    }

    pub fn options(&self) -> &PropagationOptions {
        &self.options
    }

    /// Record an explicit request that module `name` move to `version`
    pub fn seed(
        &self,
        graph: &mut ModuleGraph,
        change_set: &mut ChangeSet,
        name: &str,
        version: SemanticVersion,
    ) -> SeedOutcome {
        match graph.lookup(name) {
            Some(id) => {
                let module = graph.module_mut(id);
                if module.info.set_new_version(&version) {
                    info!("Requested {} -> {}", module.id(), version);
                    change_set.add(id, module);
                    SeedOutcome::Changed(id)
                } else {
                    SeedOutcome::Rejected {
                        current: module.info.best_version().cloned(),
                    }
                }
            }
            None => {
                info!("Requested {} -> {} (not in solution)", name, version);
                let mut placeholder = ModuleRefInfo::new(name, None);
                placeholder.new_version = Some(version);
                change_set.add_placeholder(placeholder);
                SeedOutcome::Placeholder
            }
        }
    }

    /// Expand `seed` to its closure over `graph`
    ///
    /// Target versions are written onto the graph's modules and package
    /// references. An empty seed is returned unchanged.
    pub fn propagate(&self, graph: &mut ModuleGraph, seed: ChangeSet) -> Result<ChangeSet> {
        let mut change_set = seed;
        if change_set.is_empty() {
            return Ok(change_set);
        }

        let mut sweeps = 0;
        loop {
            sweeps += 1;
            let added = self.sweep(graph, &mut change_set)?;
            debug!("Sweep {} added {} modules", sweeps, added);
            if added == 0 {
                break;
            }
        }

        info!(
            "Propagation settled after {} sweeps with {} changes",
            sweeps,
            change_set.len()
        );
        Ok(change_set)
    }

    /// Run one sweep over every module; returns how many modules joined
    pub fn sweep(&self, graph: &mut ModuleGraph, change_set: &mut ChangeSet) -> Result<usize> {
        let mut added = 0;

        for id in 0..graph.len() {
            let id = ModuleId(id);
            let package_updated = self.update_package_references(graph, change_set, id);

            let requires_bump = match self.options.trigger {
                TriggerPolicy::ModuleReferences => depends_on_changed(graph, change_set, id),
                TriggerPolicy::AnyReference => {
                    package_updated || depends_on_changed(graph, change_set, id)
                }
            };
            if !requires_bump || change_set.contains(id) {
                continue;
            }

            let next = self.derive_next_version(graph.module(id).info.version.as_ref())?;
            let module = graph.module_mut(id);
            if module.info.set_new_version(&next) {
                info!("Derived {}", module.info);
                change_set.add(id, module);
                added += 1;
            }
        }

        Ok(added)
    }

    /// Raise the module's package references whose id is in the change set
    fn update_package_references(
        &self,
        graph: &mut ModuleGraph,
        change_set: &ChangeSet,
        id: ModuleId,
    ) -> bool {
        let updates: Vec<(usize, SemanticVersion)> = graph
            .module(id)
            .package_references
            .iter()
            .enumerate()
            .filter_map(|(i, reference)| {
                change_set
                    .target_version(graph, &reference.id)
                    .map(|target| (i, target.clone()))
            })
            .collect();

        let module = graph.module_mut(id);
        let mut updated = false;
        for (i, target) in updates {
            let reference = &mut module.package_references[i];
            if reference.set_new_version(&target) {
                debug!("{}: package reference {}", module.info.id, reference);
                updated = true;
            }
        }
        updated
    }

    /// Next version for an indirectly affected module
    ///
    /// A signature that would move a release into an earlier pre-release line
    /// (1.2.0 -> 1.2.0-alpha1) bumps the core first (1.2.1-alpha1), so the
    /// result always ranks above the current version.
    pub fn derive_next_version(
        &self,
        current: Option<&SemanticVersion>,
    ) -> Result<SemanticVersion> {
        let Some(current) = current else {
            return Ok(self.options.placeholder_version.clone());
        };

        let signature = self.options.pre_release_signature.as_str();
        let mut next = current.clone();
        next.increment_tail(signature)?;

        if next <= *current {
            next = current.clone();
            next.increment_core_tail();
            next.increment_tail(signature)?;
        }
        Ok(next)
    }
}

fn depends_on_changed(graph: &ModuleGraph, change_set: &ChangeSet, id: ModuleId) -> bool {
    graph
        .module(id)
        .module_references
        .iter()
        .any(|dep| change_set.contains(*dep))
}
