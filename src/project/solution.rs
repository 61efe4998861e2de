use crate::config::ConventionsConfig;
use crate::error::{CascadeError, Result};
use crate::project::{csproj, resolve_path, LoadedModules, ModuleSource};
use log::debug;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Extract the C# project paths listed in a solution file
///
/// Only `Project(...)` entries whose path ends with `.csproj` are kept;
/// solution folders and other project types are skipped. Paths are resolved
/// against `solution_dir` in the order they appear.
pub fn parse_solution(text: &str, solution_dir: &Path) -> Result<Vec<PathBuf>> {
    let re = Regex::new(r#"^\s*Project\s*\(\s*"\{[^}]*\}"\s*\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)""#)
        .map_err(|e| CascadeError::project(format!("Invalid solution pattern: {}", e)))?;

    let projects = text
        .lines()
        .filter_map(|line| re.captures(line))
        .filter_map(|captures| captures.get(2).map(|m| m.as_str().to_string()))
        .filter(|path| path.to_ascii_lowercase().ends_with(".csproj"))
        .map(|path| resolve_path(solution_dir, &path))
        .collect();

    Ok(projects)
}

/// Module source backed by a `.sln` file on disk
#[derive(Debug, Clone)]
pub struct SolutionSource {
    solution_path: PathBuf,
    conventions: ConventionsConfig,
}

impl SolutionSource {
    pub fn new(solution_path: impl Into<PathBuf>, conventions: ConventionsConfig) -> Self {
        SolutionSource {
            solution_path: solution_path.into(),
            conventions,
        }
    }

    pub fn solution_path(&self) -> &Path {
        &self.solution_path
    }
}

impl ModuleSource for SolutionSource {
    fn load(&self) -> Result<LoadedModules> {
        let text = fs::read_to_string(&self.solution_path).map_err(|e| {
            CascadeError::project(format!(
                "Cannot read solution '{}': {}",
                self.solution_path.display(),
                e
            ))
        })?;
        let solution_dir = self
            .solution_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut loaded = LoadedModules::default();
        for project_path in parse_solution(&text, &solution_dir)? {
            debug!("Reading project {}", project_path.display());
            let (record, warnings) = csproj::read_project(&project_path, &self.conventions)?;
            loaded.records.push(record);
            loaded.warnings.extend(warnings);
        }
        Ok(loaded)
    }
}
