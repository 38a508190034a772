//! Adding and removing project entries while keeping the solution consistent.

use std::collections::HashSet;
use std::path::Path;

use uuid::Uuid;

use crate::domain::model::{
    ConfigurationEntry, Entry, EntryId, SolutionConfiguration, SolutionDocument, normalize_guid,
};
use crate::infra::config::Defaults;
use crate::infra::paths;

/// Applies membership changes to a borrowed [`SolutionDocument`].
#[derive(Debug)]
pub struct SolutionMutator<'a> {
    document: &'a mut SolutionDocument,
    defaults: &'a Defaults,
}

impl<'a> SolutionMutator<'a> {
    pub fn new(document: &'a mut SolutionDocument, defaults: &'a Defaults) -> Self {
        Self { document, defaults }
    }

    /// Add the project at `absolute_path` under `folder_chain`, creating missing folders.
    ///
    /// Returns `false` without touching the document when a project with the same relative
    /// path is already present, wherever it is nested.
    pub fn add_project(
        &mut self,
        absolute_path: &Path,
        folder_chain: &[String],
        type_guid: &str,
    ) -> bool {
        let relative = paths::relative_to(self.document.base_directory(), absolute_path);
        if self.document.find_project(&relative).is_some() {
            tracing::debug!(path = %relative, "project already in solution");
            return false;
        }

        let parent = self.ensure_folders(folder_chain);
        let name = absolute_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| relative.clone());
        let entry = Entry::new(type_guid, name, relative.clone(), new_guid());
        let guid = entry.guid.clone();
        self.document.insert(entry, parent);
        self.map_configurations(&guid);

        tracing::debug!(path = %relative, folders = ?folder_chain, "added project");
        true
    }

    /// Remove the project whose relative path is exactly `relative_path`.
    pub fn remove_project(&mut self, relative_path: &str) -> bool {
        let relative = paths::to_forward_slashes(relative_path);
        let Some(id) = self.document.find_project(&relative) else {
            tracing::debug!(path = %relative, "project not in solution");
            return false;
        };
        self.document.remove(id);
        tracing::debug!(path = %relative, "removed project");
        true
    }

    /// Drop configuration lines that reference projects no longer in the document. Once
    /// no project is left the solution-level configurations go too.
    pub fn remove_empty_configuration_sections(&mut self) -> usize {
        let live: HashSet<String> = self
            .document
            .projects()
            .map(|(_, entry)| normalize_guid(&entry.guid))
            .collect();
        let before = self.document.project_configurations.len();
        self.document
            .project_configurations
            .retain(|entry| live.contains(&normalize_guid(&entry.project_guid)));
        let mut removed = before - self.document.project_configurations.len();

        if live.is_empty() {
            removed += self.document.solution_configurations.len();
            self.document.solution_configurations.clear();
        }
        removed
    }

    /// Remove folders that hold no projects, cascading up through parents that become
    /// empty in turn. Folders with their own content (solution items) are kept.
    pub fn remove_empty_solution_folders(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let empty: Vec<EntryId> = self
                .document
                .folders()
                .filter(|(_, folder)| {
                    folder.children().is_empty()
                        && folder.body.iter().all(|line| line.trim().is_empty())
                })
                .map(|(id, _)| id)
                .collect();
            if empty.is_empty() {
                return removed;
            }
            for id in empty {
                if let Some(folder) = self.document.remove(id) {
                    tracing::debug!(folder = %folder.name, "pruned empty solution folder");
                    removed += 1;
                }
            }
        }
    }

    fn ensure_folders(&mut self, folder_chain: &[String]) -> Option<EntryId> {
        let mut parent = None;
        for name in folder_chain {
            let folder = match self.document.find_child_folder(parent, name) {
                Some(existing) => existing,
                None => {
                    tracing::debug!(folder = %name, "creating solution folder");
                    self.document
                        .insert(Entry::folder(name.clone(), new_guid()), parent)
                }
            };
            parent = Some(folder);
        }
        parent
    }

    fn map_configurations(&mut self, project_guid: &str) {
        if self.document.solution_configurations.is_empty() {
            self.document.solution_configurations = self
                .defaults
                .solution_configurations()
                .into_iter()
                .map(SolutionConfiguration::new)
                .collect();
        }

        let platform = self.defaults.project_platform();
        let mappings: Vec<ConfigurationEntry> = self
            .document
            .solution_configurations
            .iter()
            .flat_map(|solution_configuration| {
                let name = &solution_configuration.name;
                let configuration = name.split_once('|').map_or(name.as_str(), |(cfg, _)| cfg);
                let value = format!("{configuration}|{platform}");
                ["ActiveCfg", "Build.0"].map(|suffix| ConfigurationEntry {
                    project_guid: project_guid.to_owned(),
                    key: format!("{name}.{suffix}"),
                    value: value.clone(),
                })
            })
            .collect();
        self.document.project_configurations.extend(mappings);
    }
}

fn new_guid() -> String {
    normalize_guid(&Uuid::new_v4().to_string())
}
