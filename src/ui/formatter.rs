//! Pure formatting functions for UI output.
//!
//! Report text is built by `format_*` functions so it can be tested; the
//! `display_*` wrappers only add colour and print.

use console::style;
use std::fmt::Write as _;

use crate::boundary::BoundaryWarning;
use crate::domain::{Module, ModuleRefInfo, SemanticVersion};
use crate::graph::ModuleGraph;
use crate::project::FileUpdate;
use crate::propagation::{ChangeEntry, ChangeSet};

const SEPARATOR: &str = "---------------------------";

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

fn version_text(version: Option<&SemanticVersion>) -> String {
    version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "None".to_string())
}

fn reference_line(out: &mut String, reference: &ModuleRefInfo) {
    let _ = writeln!(
        out,
        "   > {} {} => {}",
        reference.id,
        version_text(reference.version.as_ref()),
        version_text(reference.new_version.as_ref())
    );
}

fn module_block(out: &mut String, graph: &ModuleGraph, module: &Module) {
    let _ = writeln!(
        out,
        "* module : {} {} => {}",
        module.id(),
        version_text(module.info.version.as_ref()),
        version_text(module.info.new_version.as_ref())
    );
    let _ = writeln!(
        out,
        "  * framework : {}",
        module.metadata.framework.as_deref().unwrap_or("None")
    );
    let _ = writeln!(out, "  * path : {}", module.path.display());
    if let Some(info_path) = &module.metadata.assembly_info_path {
        let _ = writeln!(out, "  * assembly info : {}", info_path.display());
    }
    if let Some(package_id) = &module.package_id {
        let _ = writeln!(out, "  * package id : {}", package_id);
    }

    let _ = writeln!(out, "  * package references:");
    for reference in &module.package_references {
        reference_line(out, reference);
    }
    let _ = writeln!(out, "  * module references:");
    for id in &module.module_references {
        reference_line(out, &graph.module(*id).info);
    }
    let _ = writeln!(out, "  * test module : {}", module.is_test_module);
}

/// Render the settled change set in insertion order
///
/// Graph modules get a full block; names outside the solution get a single
/// line.
pub fn format_change_set(graph: &ModuleGraph, change_set: &ChangeSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", SEPARATOR);
    for entry in change_set.entries() {
        match entry {
            ChangeEntry::Module(id) => module_block(&mut out, graph, graph.module(*id)),
            ChangeEntry::Placeholder(info) => {
                let _ = writeln!(
                    out,
                    "* external : {} => {}",
                    info.id,
                    version_text(info.new_version.as_ref())
                );
            }
        }
        let _ = writeln!(out, "{}", SEPARATOR);
    }
    out
}

/// Display the change set report.
pub fn display_change_set(graph: &ModuleGraph, change_set: &ChangeSet) {
    println!(
        "\n{}",
        style(format!("Version changes ({}):", change_set.len())).bold()
    );
    print!("{}", format_change_set(graph, change_set));
}

/// List the files a run writes (or would write in a dry run).
pub fn format_file_updates(updates: &[FileUpdate], dry_run: bool) -> String {
    let verb = if dry_run { "Would update" } else { "Updated" };
    let mut out = String::new();
    for update in updates {
        let _ = writeln!(out, "  {} {}", verb, update.path.display());
    }
    out
}

pub fn display_file_updates(updates: &[FileUpdate], dry_run: bool) {
    if updates.is_empty() {
        display_status("No project files need changes");
        return;
    }
    print!("{}", format_file_updates(updates, dry_run));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModuleRecord;
    use crate::propagation::VersionPropagator;
    use std::path::PathBuf;

    fn settled() -> (ModuleGraph, ChangeSet) {
        let mut graph = ModuleGraph::build(vec![
            ModuleRecord::new("Core", "1.0.0", "/src/Core/Core.csproj"),
            ModuleRecord::new("App", "2.0.0", "/src/App/App.csproj")
                .with_module_reference("Core")
                .with_package_reference("Vendor.Lib", "1.0.0"),
        ])
        .unwrap();
        let propagator = VersionPropagator::default();
        let mut seed = ChangeSet::new();
        propagator.seed(&mut graph, &mut seed, "Core", SemanticVersion::parse("1.1.0").unwrap());
        propagator.seed(&mut graph, &mut seed, "Vendor.Lib", SemanticVersion::parse("1.5.0").unwrap());
        let change_set = propagator.propagate(&mut graph, seed).unwrap();
        (graph, change_set)
    }

    #[test]
    fn test_format_change_set() {
        let (graph, change_set) = settled();
        let report = format_change_set(&graph, &change_set);

        assert!(report.contains("* module : Core 1.0.0 => 1.1.0"));
        assert!(report.contains("* external : Vendor.Lib => 1.5.0"));
        assert!(report.contains("* module : App 2.0.0 => 2.0.1"));
        assert!(report.contains("   > Vendor.Lib 1.0.0 => 1.5.0"));
        assert!(report.contains("   > Core 1.0.0 => 1.1.0"));
        assert!(report.contains("  * test module : false"));

        let core = report.find("Core 1.0.0 => 1.1.0").unwrap();
        let external = report.find("* external").unwrap();
        assert!(core < external);
    }

    #[test]
    fn test_format_file_updates() {
        let updates = vec![FileUpdate {
            path: PathBuf::from("/src/Core/Core.csproj"),
            contents: String::new(),
        }];
        assert_eq!(
            format_file_updates(&updates, true),
            "  Would update /src/Core/Core.csproj\n"
        );
        assert_eq!(
            format_file_updates(&updates, false),
            "  Updated /src/Core/Core.csproj\n"
        );
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed
        display_error("test error");
        display_success("test success");
        display_status("test status");
    }
}
