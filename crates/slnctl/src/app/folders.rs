//! Deriving the solution-folder chain a project should be nested under.

use std::path::Path;

use crate::infra::paths;

/// How the caller wants a project placed in the folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Placement {
    /// Mirror the on-disk directory layout.
    #[default]
    Derived,
    /// Put every project directly under the solution root.
    Root,
    /// Use the given folder chain, outermost first.
    Explicit(Vec<String>),
}

impl Placement {
    /// Build a placement from the `--in-root` / `--solution-folder` pair. The caller is
    /// responsible for rejecting the combination of both.
    pub fn from_options(in_root: bool, solution_folder: Option<&str>) -> Self {
        match solution_folder.filter(|folder| !folder.is_empty()) {
            Some(folder) => Placement::Explicit(split_folder_path(folder)),
            None if in_root => Placement::Root,
            None => Placement::Derived,
        }
    }
}

/// Split a user-supplied folder path on either separator, dropping empty segments.
pub fn split_folder_path(path: &str) -> Vec<String> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Folder chain for the project at `absolute_project` in a solution rooted at `base_directory`.
pub fn folder_chain_for(
    base_directory: &Path,
    absolute_project: &Path,
    placement: &Placement,
) -> Vec<String> {
    match placement {
        Placement::Derived => {
            let relative = paths::relative_to(base_directory, absolute_project);
            derive_folder_chain(&relative, placement)
        }
        _ => derive_folder_chain("", placement),
    }
}

/// Compute the folder chain for a `/`-separated path relative to the solution directory.
///
/// With [`Placement::Derived`] the project's own directory is not turned into a folder:
/// `libs/foo/foo.csproj` lands in `libs`, `libs/sub/foo/foo.csproj` in `libs/sub`.
/// Projects outside the solution directory go to the root.
pub fn derive_folder_chain(relative_path: &str, placement: &Placement) -> Vec<String> {
    match placement {
        Placement::Root => Vec::new(),
        Placement::Explicit(names) => names.clone(),
        Placement::Derived => derive_from_layout(relative_path),
    }
}

fn derive_from_layout(relative_path: &str) -> Vec<String> {
    let normalized = paths::to_forward_slashes(relative_path);
    if normalized.starts_with("..") {
        return Vec::new();
    }

    let trimmed = normalized.strip_prefix("./").unwrap_or(&normalized);

    let Some(project_dir) = parent_of(trimmed) else {
        return Vec::new();
    };
    let Some(folders) = parent_of(project_dir) else {
        return Vec::new();
    };

    folders
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}
