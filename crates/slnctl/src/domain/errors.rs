//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Problems with the shape of the command line, detected before any I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Specify at least one project to add.")]
    NoProjectsToAdd,
    #[error("Specify at least one project to remove.")]
    NoProjectsToRemove,
    #[error(
        "The --solution-folder and --in-root options cannot be used together; use only one of the options."
    )]
    ConflictingPlacement,
    #[error("Solution argument '{solution}' is misplaced.\nDid you mean:\n  {suggestion}")]
    MisplacedSolutionArgument { solution: String, suggestion: String },
}

/// Failures turning user-supplied paths into solution or project files.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Could not find project or directory `{}`.", .0.display())]
    PathNotFound(PathBuf),
    #[error("Could not find any project in `{}`.", .0.display())]
    NoProjectFile(PathBuf),
    #[error("Found more than one project in `{}`. Specify which one to use.", .0.display())]
    MultipleProjectFiles(PathBuf),
    #[error(
        "Specified solution file {} does not exist, or there is no solution file in the directory.",
        .0.display()
    )]
    SolutionNotFound(PathBuf),
    #[error("Found more than one solution file in {}. Specify which one to use.", .0.display())]
    MultipleSolutionFiles(PathBuf),
    #[error("Unsupported project type for `{}`; add its extension to [project_types].", .0.display())]
    UnsupportedProjectType(PathBuf),
}

/// Malformed solution file content.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolutionParseError {
    #[error("line {line}: invalid project declaration")]
    InvalidProjectHeader { line: usize },
    #[error("line {line}: project block is missing EndProject")]
    UnterminatedProject { line: usize },
    #[error("line {line}: global section is missing EndGlobalSection")]
    UnterminatedSection { line: usize },
    #[error("line {line}: Global block is missing EndGlobal")]
    UnterminatedGlobal { line: usize },
}
