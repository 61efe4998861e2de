use std::fmt;

/// Non-fatal conditions found while reading a solution or seeding changes.
/// These should be reported to the user; the run continues.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// A requested module is not part of the solution
    UnknownModule { name: String, version: String },
    /// A requested version does not move the module upward
    VersionNotIncreased {
        module: String,
        current: String,
        requested: String,
    },
    /// A package reference has no version; the default was used
    MissingReferenceVersion {
        project: String,
        package: String,
        substituted: String,
    },
    /// A classic project has no AssemblyInfo.cs compile item
    MissingAssemblyInfo { project: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::UnknownModule { name, version } => {
                write!(
                    f,
                    "Module '{}' is not in the solution; dependents referencing it by package will move to {}",
                    name, version
                )
            }
            BoundaryWarning::VersionNotIncreased {
                module,
                current,
                requested,
            } => {
                write!(
                    f,
                    "Requested version {} for '{}' is not above {}; request ignored",
                    requested, module, current
                )
            }
            BoundaryWarning::MissingReferenceVersion {
                project,
                package,
                substituted,
            } => {
                write!(
                    f,
                    "Package reference '{}' in '{}' has no version; assuming {}",
                    package, project, substituted
                )
            }
            BoundaryWarning::MissingAssemblyInfo { project } => {
                write!(f, "No AssemblyInfo.cs found for classic project '{}'", project)
            }
        }
    }
}
