//! Resolving command-line paths to project files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::errors::ResolutionError;
use crate::infra::paths;

/// Fail on the first of `inputs` that does not exist.
pub fn ensure_all_paths_exist<P: AsRef<Path>>(inputs: &[P]) -> Result<(), ResolutionError> {
    for input in inputs {
        let path: &Path = input.as_ref();
        if !path.exists() {
            return Err(ResolutionError::PathNotFound(path.to_path_buf()));
        }
    }
    Ok(())
}

/// The single project file (`*.*proj`) directly inside `directory`.
pub fn find_project_file_in_directory(directory: &Path) -> Result<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(directory)
        .with_context(|| format!("failed to list directory {}", directory.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file() && is_project_file(path))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(ResolutionError::NoProjectFile(directory.to_path_buf()).into()),
        1 => Ok(candidates.remove(0)),
        _ => Err(ResolutionError::MultipleProjectFiles(directory.to_path_buf()).into()),
    }
}

/// Absolute path of the project named by `argument`: a project file as-is, or the single
/// project file inside a directory.
pub fn resolve_project_path(argument: &str) -> Result<PathBuf> {
    let full_path = paths::absolutize(Path::new(argument))?;
    if full_path.is_dir() {
        find_project_file_in_directory(&full_path)
    } else {
        Ok(full_path)
    }
}

fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.ends_with("proj"))
}
