//! Path arithmetic shared by the loader and the commands.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Make `path` absolute against the current directory and resolve `.` and `..`
/// lexically. Symlinks are left alone.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("failed to resolve path {}", path.display()))?;
    Ok(normalize(&absolute))
}

/// Lexically resolve `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Express `target` relative to `base` using `/` separators. Both paths are
/// expected to be absolute and normalized. When they share no root (different
/// drives) the target is returned as-is.
pub fn relative_to(base: &Path, target: &Path) -> String {
    let base_components: Vec<Component<'_>> = base.components().collect();
    let target_components: Vec<Component<'_>> = target.components().collect();

    if base_components.first() != target_components.first() {
        return to_forward_slashes(&target.to_string_lossy());
    }

    let common = base_components
        .iter()
        .zip(&target_components)
        .take_while(|(left, right)| left == right)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_string(), base_components.len() - common));
    parts.extend(
        target_components[common..]
            .iter()
            .map(|component| component.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Convert a `/`-separated relative path into the backslash form stored in `.sln` files.
pub fn to_solution_separators(path: &str) -> String {
    path.replace('/', "\\")
}

pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}
