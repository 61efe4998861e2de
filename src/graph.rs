//! Module graph for one solution
//!
//! Modules live in insertion order in a vector; a single lookup table maps
//! both the logical id and the storage path of every module to its
//! [`ModuleId`]. Module references are resolved once at build time, and the
//! graph rejects dangling references, identity collisions and cycles.

use crate::domain::{Module, ModuleId, ModuleRecord};
use crate::error::{CascadeError, Result};
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: Vec<Module>,
    index: HashMap<String, ModuleId>,
}

impl ModuleGraph {
    /// Build a graph from parsed module records
    ///
    /// # Returns
    /// * `Ok(ModuleGraph)` - Indexed, acyclic graph
    /// * `Err(CascadeError::GraphIntegrity)` - Two modules claim the same id or
    ///   path, or a module reference cannot be resolved
    /// * `Err(CascadeError::Cycle)` - Module references form a cycle
    pub fn build(records: Vec<ModuleRecord>) -> Result<Self> {
        let mut index: HashMap<String, ModuleId> = HashMap::new();

        for (i, record) in records.iter().enumerate() {
            let id = ModuleId(i);
            let path_key = record.path.to_string_lossy().into_owned();
            for key in [record.info.id.clone(), path_key] {
                if key.is_empty() {
                    continue;
                }
                match index.get(&key) {
                    Some(existing) if *existing != id => {
                        return Err(CascadeError::graph(format!(
                            "'{}' is claimed by both '{}' and '{}'",
                            key, records[existing.0].info.id, record.info.id
                        )));
                    }
                    _ => {
                        index.insert(key, id);
                    }
                }
            }
        }

        let mut modules = Vec::with_capacity(records.len());
        for record in records {
            let module_references = record
                .module_references
                .iter()
                .map(|key| {
                    index.get(key).copied().ok_or_else(|| {
                        CascadeError::graph(format!(
                            "Module '{}' references unknown module '{}'",
                            record.info.id, key
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            modules.push(Module {
                info: record.info,
                path: record.path,
                package_references: record.package_references,
                module_references,
                is_test_module: record.is_test_module,
                package_id: record.package_id,
                metadata: record.metadata,
            });
        }

        let graph = ModuleGraph { modules, index };
        graph.check_acyclic()?;
        debug!("Built module graph with {} modules", graph.len());
        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> {
        (0..self.modules.len()).map(ModuleId)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.0]
    }

    pub fn module_mut(&mut self, id: ModuleId) -> &mut Module {
        &mut self.modules[id.0]
    }

    /// Look up a module by logical id or storage path
    pub fn lookup(&self, key: &str) -> Option<ModuleId> {
        self.index.get(key).copied()
    }

    pub fn find(&self, key: &str) -> Option<&Module> {
        self.lookup(key).map(|id| self.module(id))
    }

    fn check_acyclic(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.modules.len()];

        for start in self.ids() {
            if marks[start.0] != Mark::Unvisited {
                continue;
            }

            // (module, next reference index to explore)
            let mut stack: Vec<(ModuleId, usize)> = vec![(start, 0)];
            marks[start.0] = Mark::InProgress;

            while let Some((current, next)) = stack.last().copied() {
                let refs = &self.modules[current.0].module_references;
                if next >= refs.len() {
                    marks[current.0] = Mark::Done;
                    stack.pop();
                    continue;
                }

                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                let dep = refs[next];
                match marks[dep.0] {
                    Mark::Done => {}
                    Mark::Unvisited => {
                        marks[dep.0] = Mark::InProgress;
                        stack.push((dep, 0));
                    }
                    Mark::InProgress => {
                        let mut cycle: Vec<&str> = stack
                            .iter()
                            .skip_while(|(m, _)| *m != dep)
                            .map(|(m, _)| self.modules[m.0].id())
                            .collect();
                        cycle.push(self.modules[dep.0].id());
                        return Err(CascadeError::cycle(cycle.join(" -> ")));
                    }
                }
            }
        }

        Ok(())
    }
}
