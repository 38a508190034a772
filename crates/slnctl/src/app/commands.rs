//! The `add` and `remove` commands: argument checks, path resolution, mutation, and the
//! final conditional write.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::app::folders::{Placement, folder_chain_for};
use crate::app::membership::SolutionMutator;
use crate::domain::errors::UsageError;
use crate::infra::config::Config;
use crate::infra::paths;
use crate::infra::projects::{
    ensure_all_paths_exist, find_project_file_in_directory, resolve_project_path,
};
use crate::infra::sln::{SOLUTION_EXTENSION, SolutionFile};

const PROGRAM: &str = "slnctl";

/// Outcome for a single project argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
    Added(String),
    AlreadyPresent(String),
    Removed(String),
    NotFound(String),
}

/// What a command did to the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipReport {
    pub solution: PathBuf,
    pub changes: Vec<MembershipChange>,
    /// Whether the solution file was rewritten.
    pub changed: bool,
}

impl fmt::Display for MembershipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.changes {
            match change {
                MembershipChange::Added(path) => {
                    writeln!(f, "Project `{path}` added to the solution.")?
                }
                MembershipChange::AlreadyPresent(path) => writeln!(
                    f,
                    "Solution {} already contains project {path}.",
                    self.solution.display()
                )?,
                MembershipChange::Removed(path) => {
                    writeln!(f, "Project `{path}` removed from the solution.")?
                }
                MembershipChange::NotFound(path) => {
                    writeln!(f, "Project `{path}` could not be found in the solution.")?
                }
            }
        }
        Ok(())
    }
}

/// Arguments of `slnctl <sln> add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRequest {
    pub solution: PathBuf,
    pub projects: Vec<String>,
    pub in_root: bool,
    pub solution_folder: Option<String>,
}

impl AddRequest {
    /// Check the argument shape and work out the placement mode. Touches no files.
    pub fn placement(&self) -> Result<Placement, UsageError> {
        if self.projects.is_empty() {
            return Err(UsageError::NoProjectsToAdd);
        }

        let solution_folder = self
            .solution_folder
            .as_deref()
            .filter(|folder| !folder.is_empty());
        if self.in_root && solution_folder.is_some() {
            return Err(UsageError::ConflictingPlacement);
        }

        let options = match solution_folder {
            Some(folder) => format!("--solution-folder {folder} "),
            None if self.in_root => "--in-root ".to_owned(),
            None => String::new(),
        };
        check_solution_argument(&self.projects, "add", &options)?;

        Ok(Placement::from_options(self.in_root, solution_folder))
    }

    pub fn run(&self, config: &Config) -> Result<MembershipReport> {
        let placement = self.placement()?;

        let mut file = SolutionFile::load(&self.solution)?;
        ensure_all_paths_exist(&self.projects)?;

        let mut resolved = Vec::with_capacity(self.projects.len());
        for argument in &self.projects {
            let path = resolve_project_path(argument)?;
            let type_guid = config.project_types.type_guid_for(&path)?;
            resolved.push((path, type_guid));
        }

        let solution = file.document.path().to_path_buf();
        let base_directory = file.document.base_directory().to_path_buf();
        let mut mutator = SolutionMutator::new(&mut file.document, &config.defaults);
        let mut changes = Vec::with_capacity(resolved.len());
        for (path, type_guid) in &resolved {
            let chain = folder_chain_for(&base_directory, path, &placement);
            let display = paths::relative_to(&base_directory, path);
            if mutator.add_project(path, &chain, type_guid) {
                changes.push(MembershipChange::Added(display));
            } else {
                changes.push(MembershipChange::AlreadyPresent(display));
            }
        }

        let changed = changes
            .iter()
            .any(|change| matches!(change, MembershipChange::Added(_)));
        if changed {
            file.write()?;
        }

        Ok(MembershipReport {
            solution,
            changes,
            changed,
        })
    }
}

/// Arguments of `slnctl <sln> remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveRequest {
    pub solution: PathBuf,
    pub projects: Vec<String>,
}

impl RemoveRequest {
    /// Check the argument shape. Touches no files.
    pub fn validate(&self) -> Result<(), UsageError> {
        if self.projects.is_empty() {
            return Err(UsageError::NoProjectsToRemove);
        }
        check_solution_argument(&self.projects, "remove", "")
    }

    pub fn run(&self, config: &Config) -> Result<MembershipReport> {
        self.validate()?;

        let mut file = SolutionFile::load(&self.solution)?;
        let solution = file.document.path().to_path_buf();
        let base_directory = file.document.base_directory().to_path_buf();

        // Unlike add, a missing path is fine here: the project may already be deleted.
        let mut relative_paths = Vec::with_capacity(self.projects.len());
        for argument in &self.projects {
            let full_path = paths::absolutize(Path::new(argument))?;
            let project = if full_path.is_dir() {
                find_project_file_in_directory(&full_path)?
            } else {
                full_path
            };
            relative_paths.push(paths::relative_to(&base_directory, &project));
        }

        let mut mutator = SolutionMutator::new(&mut file.document, &config.defaults);
        let mut changes = Vec::with_capacity(relative_paths.len());
        for relative in relative_paths {
            if mutator.remove_project(&relative) {
                changes.push(MembershipChange::Removed(relative));
            } else {
                changes.push(MembershipChange::NotFound(relative));
            }
        }
        let pruned_configurations = mutator.remove_empty_configuration_sections();
        let pruned_folders = mutator.remove_empty_solution_folders();
        tracing::debug!(pruned_configurations, pruned_folders, "cleaned up solution");

        let changed = changes
            .iter()
            .any(|change| matches!(change, MembershipChange::Removed(_)));
        if changed {
            file.write()?;
        }

        Ok(MembershipReport {
            solution,
            changes,
            changed,
        })
    }
}

/// Reject a solution file passed among the project arguments, suggesting the corrected
/// command line.
fn check_solution_argument(
    projects: &[String],
    subcommand: &str,
    options: &str,
) -> Result<(), UsageError> {
    let extension = format!(".{SOLUTION_EXTENSION}");
    let Some(solution) = projects.iter().find(|path| path.ends_with(&extension)) else {
        return Ok(());
    };

    let remaining: Vec<&str> = projects
        .iter()
        .filter(|path| !path.ends_with(&extension))
        .map(String::as_str)
        .collect();
    Err(UsageError::MisplacedSolutionArgument {
        solution: solution.clone(),
        suggestion: format!(
            "{PROGRAM} {solution} {subcommand} {options}{}",
            remaining.join(" ")
        ),
    })
}
