//! Configuration management utilities.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::domain::errors::ResolutionError;
use crate::domain::model::normalize_guid;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".slnctl/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default = "ProjectTypes::empty")]
    pub project_types: ProjectTypes,
}

/// Settings for new entries. A key left out of a layer keeps the value of the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Defaults {
    /// Configurations seeded into a solution that declares none.
    #[serde(default)]
    configurations: Option<Vec<String>>,
    #[serde(default)]
    platforms: Option<Vec<String>>,
    /// Platform new projects build as, whatever the solution platform.
    #[serde(default)]
    project_platform: Option<String>,
}

impl Defaults {
    fn default_configurations() -> Vec<String> {
        vec!["Debug".into(), "Release".into()]
    }

    fn default_platforms() -> Vec<String> {
        vec!["Any CPU".into()]
    }

    fn default_project_platform() -> String {
        "Any CPU".into()
    }

    pub fn configurations(&self) -> Vec<String> {
        self.configurations
            .clone()
            .unwrap_or_else(Self::default_configurations)
    }

    pub fn platforms(&self) -> Vec<String> {
        self.platforms
            .clone()
            .unwrap_or_else(Self::default_platforms)
    }

    pub fn project_platform(&self) -> String {
        self.project_platform
            .clone()
            .unwrap_or_else(Self::default_project_platform)
    }

    /// `Configuration|Platform` pairs for a solution without any.
    pub fn solution_configurations(&self) -> Vec<String> {
        let platforms = self.platforms();
        self.configurations()
            .iter()
            .flat_map(|configuration| {
                platforms
                    .iter()
                    .map(move |platform| format!("{configuration}|{platform}"))
            })
            .collect()
    }
}

/// Project type GUIDs keyed by project file extension.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProjectTypes(BTreeMap<String, String>);

impl Default for ProjectTypes {
    fn default() -> Self {
        let mut types = Self(BTreeMap::new());
        types.insert("csproj", "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}");
        types.insert("fsproj", "{F2A71F9B-5D33-465A-A702-920D77279786}");
        types.insert("vbproj", "{F184B08F-C81C-45F6-A57F-5ABD9991F28F}");
        types
    }
}

impl ProjectTypes {
    /// A table without the built-in types, used for layers that declare none.
    fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Type GUID for the project file at `path`.
    pub fn type_guid_for(&self, path: &Path) -> Result<String, ResolutionError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.0.get(&ext.to_ascii_lowercase()))
            .map(|guid| normalize_guid(guid))
            .ok_or_else(|| ResolutionError::UnsupportedProjectType(path.to_path_buf()))
    }

    pub fn insert(&mut self, extension: impl Into<String>, guid: impl Into<String>) {
        self.0
            .insert(extension.into().to_ascii_lowercase(), guid.into());
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    project_platform: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            project_platform: env::var("SLNCTL_PROJECT_PLATFORM").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(project_platform: &str) -> Self {
        Self {
            project_platform: Some(project_platform.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data).with_context(|| format!("in config file {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            project_types: merge_project_types(self.project_types, other.project_types),
        }
    }
}

fn merge_defaults(mut base: Defaults, overlay: Defaults) -> Defaults {
    if let Some(value) = overlay.configurations {
        base.configurations = Some(value);
    }
    if let Some(value) = overlay.platforms {
        base.platforms = Some(value);
    }
    if let Some(value) = overlay.project_platform {
        base.project_platform = Some(value);
    }
    base
}

fn merge_project_types(mut base: ProjectTypes, overlay: ProjectTypes) -> ProjectTypes {
    for (extension, guid) in overlay.0 {
        base.insert(extension, guid);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("slnctl/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(platform) = env.project_platform {
        config.defaults.project_platform = Some(platform);
    }
    config
}
