//! Command-line surface.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::app::commands::{AddRequest, RemoveRequest};
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "slnctl",
    author,
    version,
    about = "Add or remove projects in a Visual Studio solution file"
)]
pub struct Cli {
    /// Solution file to modify, or a directory containing exactly one.
    #[arg(value_name = "SLN_FILE", default_value = ".")]
    pub solution: PathBuf,

    /// Log what is being changed to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add one or more projects to the solution.
    Add(AddArgs),
    /// Remove one or more projects from the solution.
    Remove(RemoveArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Place the projects at the root of the solution instead of creating solution folders.
    #[arg(long)]
    pub in_root: bool,

    /// Solution folder path to add the projects to, e.g. `libs/core`.
    #[arg(short = 's', long, value_name = "PATH")]
    pub solution_folder: Option<String>,

    /// Project files, or directories containing a single project file.
    #[arg(value_name = "PROJECT_PATH")]
    pub projects: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Project files, or directories containing a single project file.
    #[arg(value_name = "PROJECT_PATH")]
    pub projects: Vec<String>,
}

/// Execute the parsed command line and print the per-project report.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let report = match cli.command {
        Commands::Add(args) => AddRequest {
            solution: cli.solution,
            projects: args.projects,
            in_root: args.in_root,
            solution_folder: args.solution_folder,
        }
        .run(&config)?,
        Commands::Remove(args) => RemoveRequest {
            solution: cli.solution,
            projects: args.projects,
        }
        .run(&config)?,
    };
    print!("{report}");
    Ok(())
}
