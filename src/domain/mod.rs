//! Domain types - versions, modules and module-name patterns

pub mod module;
pub mod pattern;
pub mod prerelease;
pub mod version;

pub use module::{Module, ModuleId, ModuleRecord, ModuleRefInfo, ProjectMetadata};
pub use pattern::{ModuleFilter, ModulePattern, ALL_CHANGED};
pub use prerelease::PreRelease;
pub use version::{compare, SemanticVersion};
