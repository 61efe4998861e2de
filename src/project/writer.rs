use crate::config::ConventionsConfig;
use crate::domain::{Module, ModuleFilter, SemanticVersion};
use crate::error::{CascadeError, Result};
use crate::graph::ModuleGraph;
use crate::project::{assembly_info, csproj, markup, nuspec};
use crate::propagation::ChangeSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Module patterns selecting which optional attributes get written
#[derive(Debug, Clone, Default)]
pub struct WriteFilters {
    pub assembly_version: ModuleFilter,
    pub file_version: ModuleFilter,
    pub exclude: ModuleFilter,
}

impl WriteFilters {
    pub fn from_patterns(
        assembly_version: &[String],
        file_version: &[String],
        exclude: &[String],
    ) -> Result<Self> {
        Ok(WriteFilters {
            assembly_version: ModuleFilter::new(assembly_version.iter().cloned())?,
            file_version: ModuleFilter::new(file_version.iter().cloned())?,
            exclude: ModuleFilter::new(exclude.iter().cloned())?,
        })
    }
}

/// New contents for one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpdate {
    pub path: PathBuf,
    pub contents: String,
}

impl FileUpdate {
    pub fn write(&self) -> Result<()> {
        write_all(std::slice::from_ref(self))
    }

    fn write_error(&self, e: io::Error) -> CascadeError {
        CascadeError::project(format!("Cannot write '{}': {}", self.path.display(), e))
    }

    /// New contents in a temporary file next to the target, carrying the
    /// target's permissions
    fn stage(&self) -> Result<NamedTempFile> {
        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        temp.write_all(self.contents.as_bytes())
            .map_err(|e| self.write_error(e))?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| self.write_error(e))?;
        }
        Ok(temp)
    }
}

/// Write all updates, staging every file before any target is replaced
///
/// A failure while staging leaves every target untouched. A failure while
/// replacing names the files that were already written.
pub fn write_all(updates: &[FileUpdate]) -> Result<()> {
    let mut staged = Vec::with_capacity(updates.len());
    for update in updates {
        staged.push((update.stage()?, update));
    }

    let mut written: Vec<String> = Vec::new();
    for (temp, update) in staged {
        if let Err(e) = temp.persist(&update.path) {
            let mut message = format!("Cannot replace '{}': {}", update.path.display(), e.error);
            if !written.is_empty() {
                message.push_str(&format!("; already written: {}", written.join(", ")));
            }
            return Err(CascadeError::project(message));
        }
        log::debug!("Wrote {}", update.path.display());
        written.push(update.path.display().to_string());
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| CascadeError::project(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Package/semantic rendering used in project files and manifests
fn package_version(version: &SemanticVersion) -> String {
    version.render(3, true)
}

/// Four numeric components, no pre-release tag
fn assembly_version(version: &SemanticVersion) -> String {
    version.render_fixed(4, false)
}

/// Applies a settled change set to project files
///
/// Planning reads every affected file and returns the rewritten contents
/// without touching the disk; only files whose text actually changes are
/// returned.
#[derive(Debug, Clone)]
pub struct ProjectWriter {
    conventions: ConventionsConfig,
    filters: WriteFilters,
}

impl ProjectWriter {
    pub fn new(conventions: ConventionsConfig, filters: WriteFilters) -> Self {
        ProjectWriter {
            conventions,
            filters,
        }
    }

    /// Compute the file updates for `change_set`
    ///
    /// Modules in the set get their own version written; modules outside it
    /// still get bumped package references rewritten.
    pub fn plan(&self, graph: &ModuleGraph, change_set: &ChangeSet) -> Result<Vec<FileUpdate>> {
        let mut updates = Vec::new();

        for id in graph.ids() {
            let module = graph.module(id);
            let in_change_set = change_set.contains(id);
            let has_bumped_references = module.package_references.iter().any(|r| r.is_bumped());

            if !in_change_set && !has_bumped_references {
                continue;
            }
            if self.filters.exclude.matches(module.id(), in_change_set) {
                log::info!("Skipping excluded module {}", module.id());
                continue;
            }

            let new_version = if in_change_set && module.info.is_bumped() {
                module.info.new_version.as_ref()
            } else {
                None
            };

            self.plan_project(module, new_version, in_change_set, &mut updates)?;
            if let Some(version) = new_version {
                self.plan_nuspec(graph, module, version, &mut updates)?;
            }
        }

        Ok(updates)
    }

    fn plan_project(
        &self,
        module: &Module,
        new_version: Option<&SemanticVersion>,
        in_change_set: bool,
        updates: &mut Vec<FileUpdate>,
    ) -> Result<()> {
        let original = read(&module.path)?;
        let mut text = original.clone();

        let write_assembly = self.filters.assembly_version.matches(module.id(), in_change_set);
        let write_file = self.filters.file_version.matches(module.id(), in_change_set);

        if let Some(version) = new_version.filter(|_| !module.is_test_module) {
            match &module.metadata.assembly_info_path {
                Some(info_path) => {
                    if write_assembly || write_file {
                        let rendered = assembly_version(version);
                        let info = read(info_path)?;
                        let rewritten = assembly_info::rewrite(
                            &info,
                            write_assembly.then_some(rendered.as_str()),
                            write_file.then_some(rendered.as_str()),
                        );
                        if rewritten != info {
                            updates.push(FileUpdate {
                                path: info_path.clone(),
                                contents: rewritten,
                            });
                        }
                    }
                }
                None => {
                    text = self.set_property(&text, module, "Version", &package_version(version))?;
                    if write_assembly {
                        text = self.set_property(
                            &text,
                            module,
                            "AssemblyVersion",
                            &assembly_version(version),
                        )?;
                    }
                    if write_file {
                        text = self.set_property(
                            &text,
                            module,
                            "FileVersion",
                            &assembly_version(version),
                        )?;
                    }
                }
            }
        }

        text = csproj::rewrite_package_references(&text, |package| {
            module
                .find_package_reference(package)
                .filter(|r| r.is_bumped())
                .and_then(|r| r.new_version.as_ref())
                .map(package_version)
        })?;

        if text != original {
            log::debug!("Planned update of {}", module.path.display());
            updates.push(FileUpdate {
                path: module.path.clone(),
                contents: text,
            });
        }
        Ok(())
    }

    fn set_property(&self, text: &str, module: &Module, name: &str, value: &str) -> Result<String> {
        markup::ensure_property(text, name, value).ok_or_else(|| {
            CascadeError::project(format!(
                "Cannot set <{}> in '{}': no <Project> root",
                name,
                module.path.display()
            ))
        })
    }

    fn plan_nuspec(
        &self,
        graph: &ModuleGraph,
        module: &Module,
        version: &SemanticVersion,
        updates: &mut Vec<FileUpdate>,
    ) -> Result<()> {
        let Some(dir) = module.path.parent() else {
            return Ok(());
        };
        let path = dir.join(&self.conventions.nuspec_file);
        if !path.exists() {
            return Ok(());
        }

        let original = read(&path)?;
        let rewritten = nuspec::rewrite(&original, &package_version(version), |dependency| {
            if let Some(reference) = module.find_package_reference(dependency) {
                return reference
                    .is_bumped()
                    .then(|| reference.new_version.as_ref().map(package_version))
                    .flatten();
            }
            module
                .module_references
                .iter()
                .map(|id| graph.module(*id))
                .find(|referenced| {
                    referenced.package_id.as_deref() == Some(dependency)
                        || referenced.id() == dependency
                })
                .filter(|referenced| referenced.info.is_bumped())
                .and_then(|referenced| referenced.info.new_version.as_ref())
                .map(package_version)
        })?;

        if rewritten != original {
            updates.push(FileUpdate {
                path,
                contents: rewritten,
            });
        }
        Ok(())
    }
}
