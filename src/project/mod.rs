//! Project file collaborators
//!
//! Reading turns a Visual Studio solution into [`ModuleRecord`]s for the
//! graph; writing applies a settled change set back to the project files.
//!
//! # Overview
//!
//! The ingestion seam is the [`ModuleSource`] trait:
//!
//! - [solution::SolutionSource]: reads a `.sln` and every `.csproj` it lists
//! - [mock::StaticSource]: serves in-memory records for tests
//!
//! Files are handled as text with targeted regex edits so that formatting,
//! comments and attribute order survive a rewrite.

pub mod assembly_info;
pub mod csproj;
pub mod markup;
pub mod mock;
pub mod nuspec;
pub mod solution;
pub mod writer;

pub use mock::StaticSource;
pub use solution::SolutionSource;
pub use writer::{write_all, FileUpdate, ProjectWriter, WriteFilters};

use crate::boundary::BoundaryWarning;
use crate::domain::ModuleRecord;
use crate::error::Result;
use std::path::{Component, Path, PathBuf};

/// Records read from storage plus any non-fatal findings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedModules {
    pub records: Vec<ModuleRecord>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Source of parsed module records
///
/// Implementations read whatever storage format is in use and return one
/// record per module, with module references expressed as the storage path
/// (or id) of the referenced module.
pub trait ModuleSource {
    fn load(&self) -> Result<LoadedModules>;
}

/// Resolve a path written in a project file against `base`
///
/// Backslashes are treated as separators and `.`/`..` are folded lexically,
/// so the result can be used as a lookup key without touching the disk.
pub fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let raw = raw.trim().replace('\\', "/");
    let joined = base.join(raw);
    let absolute = if joined.is_absolute() {
        joined
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&joined))
            .unwrap_or(joined)
    };
    normalize(&absolute)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path as a lookup key
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
