//! Main workflow orchestration logic
//!
//! Keeps CLI argument parsing in main.rs and the update run here, so the
//! workflow can be driven programmatically without clap.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::SemanticVersion;
use crate::error::CascadeError;
use crate::graph::ModuleGraph;
use crate::project::{write_all, ModuleSource, ProjectWriter, SolutionSource, WriteFilters};
use crate::propagation::{ChangeSet, PropagationOptions, SeedOutcome, VersionPropagator};
use crate::ui;

/// Arguments for the update workflow
///
/// Mirrors the CLI Args; pattern lists are merged with the `[write]`
/// section of the configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateWorkflowArgs {
    /// Solution file to read
    pub solution: PathBuf,

    /// Change requests, `"Name Version"` or `Name=Version`
    pub changes: Vec<String>,

    /// Modules that also get AssemblyVersion written
    pub assembly_version: Vec<String>,

    /// Modules that also get FileVersion written
    pub file_version: Vec<String>,

    /// Modules never written
    pub exclude: Vec<String>,

    /// Overrides `propagation.pre_release_signature`
    pub pre_release: Option<String>,

    /// Report without writing
    pub dry_run: bool,
}

/// A requested version for one module name
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRequest {
    pub name: String,
    pub version: SemanticVersion,
}

/// Settled propagation over one source
#[derive(Debug, Clone)]
pub struct Propagation {
    pub graph: ModuleGraph,
    pub change_set: ChangeSet,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a successful update workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Change set member names in insertion order
    pub changed: Vec<String>,

    /// Files rewritten (or that would be, in a dry run)
    pub updated_files: Vec<PathBuf>,

    /// Non-fatal findings
    pub warnings: Vec<BoundaryWarning>,

    /// Whether files were actually written
    pub written: bool,
}

/// Parse `"Name 1.2.0"` or `Name=1.2.0`
pub fn parse_change_request(raw: &str) -> crate::error::Result<ChangeRequest> {
    let raw = raw.trim();
    let split = raw
        .split_once('=')
        .or_else(|| raw.rsplit_once(char::is_whitespace));

    let (name, version) = match split {
        Some((name, version)) if !name.trim().is_empty() && !version.trim().is_empty() => {
            (name.trim(), version.trim())
        }
        _ => {
            return Err(CascadeError::format(format!(
                "Change request '{}' must be 'Name Version' or 'Name=Version'",
                raw
            )))
        }
    };

    Ok(ChangeRequest {
        name: name.to_string(),
        version: SemanticVersion::parse(version)?,
    })
}

/// Load modules, seed the requests and propagate to a fixed point
pub fn propagate_changes<S: ModuleSource>(
    source: &S,
    requests: &[ChangeRequest],
    options: PropagationOptions,
) -> Result<Propagation> {
    let loaded = source.load().context("Failed to load modules")?;
    let mut warnings = loaded.warnings;
    let mut graph = ModuleGraph::build(loaded.records).context("Failed to build module graph")?;

    let propagator = VersionPropagator::new(options);
    let mut seed = ChangeSet::new();
    for request in requests {
        match propagator.seed(&mut graph, &mut seed, &request.name, request.version.clone()) {
            SeedOutcome::Changed(_) => {}
            SeedOutcome::Placeholder => warnings.push(BoundaryWarning::UnknownModule {
                name: request.name.clone(),
                version: request.version.to_string(),
            }),
            SeedOutcome::Rejected { current } => {
                warnings.push(BoundaryWarning::VersionNotIncreased {
                    module: request.name.clone(),
                    current: current
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "None".to_string()),
                    requested: request.version.to_string(),
                })
            }
        }
    }

    let change_set = propagator.propagate(&mut graph, seed)?;
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    Ok(Propagation {
        graph,
        change_set,
        warnings,
    })
}

/// Main update workflow
///
/// 1. Parse change requests and resolve options
/// 2. Read the solution and build the module graph
/// 3. Seed and propagate
/// 4. Report the change set
/// 5. Plan file updates and write them unless `dry_run`
pub fn run_update_workflow(args: UpdateWorkflowArgs, config: Config) -> Result<WorkflowResult> {
    let requests = args
        .changes
        .iter()
        .map(|raw| parse_change_request(raw))
        .collect::<crate::error::Result<Vec<_>>>()?;

    let mut propagation_config = config.propagation.clone();
    if let Some(signature) = &args.pre_release {
        propagation_config.pre_release_signature = signature.clone();
    }
    let options = propagation_config.to_options()?;

    let merge = |configured: &[String], given: &[String]| -> Vec<String> {
        configured.iter().chain(given).cloned().collect()
    };
    let filters = WriteFilters::from_patterns(
        &merge(&config.write.assembly_version, &args.assembly_version),
        &merge(&config.write.file_version, &args.file_version),
        &merge(&config.write.exclude, &args.exclude),
    )?;

    let source = SolutionSource::new(&args.solution, config.conventions.clone());
    let propagation = propagate_changes(&source, &requests, options)?;
    for warning in &propagation.warnings {
        ui::display_boundary_warning(warning);
    }

    if propagation.change_set.is_empty() {
        ui::display_status("Nothing to update");
        return Ok(WorkflowResult {
            changed: Vec::new(),
            updated_files: Vec::new(),
            warnings: propagation.warnings,
            written: false,
        });
    }

    ui::display_change_set(&propagation.graph, &propagation.change_set);

    let writer = ProjectWriter::new(config.conventions.clone(), filters);
    let updates = writer.plan(&propagation.graph, &propagation.change_set)?;
    ui::display_file_updates(&updates, args.dry_run);

    if !args.dry_run {
        write_all(&updates).context("Failed to write project files")?;
        ui::display_success("All Done.");
    }

    Ok(WorkflowResult {
        changed: propagation
            .change_set
            .names()
            .map(str::to_string)
            .collect(),
        updated_files: updates.into_iter().map(|u| u.path).collect(),
        warnings: propagation.warnings,
        written: !args.dry_run,
    })
}
