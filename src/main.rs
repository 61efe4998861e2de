use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use log::{debug, LevelFilter};

use version_cascade::cli::{run_update_workflow, UpdateWorkflowArgs};
use version_cascade::{config, ui};

#[derive(clap::Parser, Debug)]
#[command(
    name = "version-cascade",
    version,
    about = "Propagate module version changes through a .NET solution"
)]
struct Args {
    #[arg(help = "Solution (.sln) file to update")]
    solution: PathBuf,

    #[arg(
        short = 'c',
        long = "change",
        required = true,
        help = "Requested version, as \"Name Version\" or Name=Version (repeatable)"
    )]
    changes: Vec<String>,

    #[arg(
        short = 'a',
        long,
        num_args = 1..,
        help = "Modules that also get AssemblyVersion written (glob, or + for all changed)"
    )]
    assembly_version: Vec<String>,

    #[arg(
        short = 'f',
        long,
        num_args = 1..,
        help = "Modules that also get FileVersion written (glob, or + for all changed)"
    )]
    file_version: Vec<String>,

    #[arg(short = 'x', long, num_args = 1.., help = "Modules never written (glob)")]
    exclude: Vec<String>,

    #[arg(long, help = "Pre-release signature for derived versions, e.g. alpha")]
    pre_release: Option<String>,

    #[arg(long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Preview the changes without writing files")]
    dry_run: bool,

    #[arg(long, default_value = "warn", help = "off, error, warn, info, debug or trace")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!("Parsed arguments: {:?}", args);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            process::exit(1);
        }
    };

    let workflow_args = UpdateWorkflowArgs {
        solution: args.solution,
        changes: args.changes,
        assembly_version: args.assembly_version,
        file_version: args.file_version,
        exclude: args.exclude,
        pre_release: args.pre_release,
        dry_run: args.dry_run,
    };

    if let Err(e) = run_update_workflow(workflow_args, config) {
        ui::display_error(&format!("{:#}", e));
        process::exit(1);
    }

    Ok(())
}
