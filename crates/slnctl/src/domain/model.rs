//! Domain model for solution documents: project and folder entries kept in an arena.

use std::path::{Path, PathBuf};

/// Type GUID marking an entry as a solution folder.
pub const SOLUTION_FOLDER_TYPE: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

/// Stable handle to an entry in a [`SolutionDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Project,
    Folder,
}

/// A project reference or a solution folder.
///
/// GUIDs keep the text they were read with; compare them with [`same_guid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub type_guid: String,
    pub name: String,
    /// Path relative to the base directory, `/`-separated. Folders use their name.
    pub path: String,
    pub guid: String,
    /// Lines between the declaration and `EndProject`, kept verbatim.
    pub body: Vec<String>,
    parent: Option<EntryId>,
    children: Vec<EntryId>,
}

impl Entry {
    pub fn new(
        type_guid: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        guid: impl Into<String>,
    ) -> Self {
        Self {
            type_guid: type_guid.into(),
            name: name.into(),
            path: path.into(),
            guid: guid.into(),
            body: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn folder(name: impl Into<String>, guid: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(SOLUTION_FOLDER_TYPE, name.clone(), name, guid)
    }

    pub fn kind(&self) -> EntryKind {
        if same_guid(&self.type_guid, SOLUTION_FOLDER_TYPE) {
            EntryKind::Folder
        } else {
            EntryKind::Project
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == EntryKind::Folder
    }

    pub fn parent(&self) -> Option<EntryId> {
        self.parent
    }

    pub fn children(&self) -> &[EntryId] {
        &self.children
    }
}

/// A solution-level build configuration, e.g. `Debug|Any CPU = Debug|Any CPU`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionConfiguration {
    /// `Configuration|Platform` pair.
    pub name: String,
    pub value: String,
}

impl SolutionConfiguration {
    /// A configuration that maps to itself.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            value: name.clone(),
            name,
        }
    }
}

/// One line of the per-project build configuration table, e.g.
/// `{GUID}.Debug|Any CPU.ActiveCfg = Debug|Any CPU`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationEntry {
    pub project_guid: String,
    pub key: String,
    pub value: String,
}

/// In-memory solution: entries, their folder tree, and configuration tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDocument {
    path: PathBuf,
    base_directory: PathBuf,
    entries: Vec<Option<Entry>>,
    root: Vec<EntryId>,
    /// Solution-level configurations in declaration order.
    pub solution_configurations: Vec<SolutionConfiguration>,
    pub project_configurations: Vec<ConfigurationEntry>,
}

impl SolutionDocument {
    /// Create an empty document for the solution file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base_directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            path,
            base_directory,
            entries: Vec::new(),
            root: Vec::new(),
            solution_configurations: Vec::new(),
            project_configurations: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory all entry paths are relative to.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0).and_then(Option::as_ref)
    }

    pub fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live entries in creation order.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|entry| (EntryId(idx), entry)))
    }

    pub fn projects(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.entries().filter(|(_, entry)| !entry.is_folder())
    }

    pub fn folders(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.entries().filter(|(_, entry)| entry.is_folder())
    }

    /// Children of `parent`, or of the root when `parent` is `None`.
    pub fn children(&self, parent: Option<EntryId>) -> &[EntryId] {
        match parent {
            None => &self.root,
            Some(id) => self.entry(id).map(Entry::children).unwrap_or(&[]),
        }
    }

    /// Find a project by its exact relative path.
    pub fn find_project(&self, relative_path: &str) -> Option<EntryId> {
        self.projects()
            .find(|(_, entry)| entry.path == relative_path)
            .map(|(id, _)| id)
    }

    pub fn find_by_guid(&self, guid: &str) -> Option<EntryId> {
        self.entries()
            .find(|(_, entry)| same_guid(&entry.guid, guid))
            .map(|(id, _)| id)
    }

    /// Find a folder directly under `parent` by exact name.
    pub fn find_child_folder(&self, parent: Option<EntryId>, name: &str) -> Option<EntryId> {
        self.children(parent).iter().copied().find(|id| {
            self.entry(*id)
                .is_some_and(|entry| entry.is_folder() && entry.name == name)
        })
    }

    /// Chain of folder names from the root down to the entry's parent.
    pub fn folder_chain(&self, id: EntryId) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.entry(id).and_then(Entry::parent);
        while let Some(folder) = current.and_then(|id| self.entry(id)) {
            chain.push(folder.name.clone());
            current = folder.parent;
        }
        chain.reverse();
        chain
    }

    /// Insert `entry` as the last child of `parent` (or the root).
    pub fn insert(&mut self, mut entry: Entry, parent: Option<EntryId>) -> EntryId {
        let id = EntryId(self.entries.len());
        entry.parent = parent.filter(|parent| self.entry(*parent).is_some());
        entry.children.clear();
        self.child_list_mut(entry.parent).push(id);
        self.entries.push(Some(entry));
        id
    }

    /// Move `id` under `parent`. Refuses moves that would create a cycle.
    pub fn set_parent(&mut self, id: EntryId, parent: Option<EntryId>) -> bool {
        if self.entry(id).is_none() || parent.is_some_and(|p| self.entry(p).is_none()) {
            return false;
        }
        if parent.is_some_and(|p| p == id || self.is_ancestor(id, p)) {
            return false;
        }
        let previous = self.entry(id).and_then(Entry::parent);
        self.child_list_mut(previous).retain(|child| *child != id);
        self.child_list_mut(parent).push(id);
        if let Some(entry) = self.entry_mut(id) {
            entry.parent = parent;
        }
        true
    }

    /// Detach `id` from its parent and delete it. Children of a removed folder move
    /// up to the removed folder's parent.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let entry = self.entries.get_mut(id.0)?.take()?;
        self.child_list_mut(entry.parent).retain(|child| *child != id);
        for child in &entry.children {
            if let Some(child_entry) = self.entry_mut(*child) {
                child_entry.parent = entry.parent;
            }
            self.child_list_mut(entry.parent).push(*child);
        }
        Some(entry)
    }

    fn is_ancestor(&self, ancestor: EntryId, mut id: EntryId) -> bool {
        while let Some(parent) = self.entry(id).and_then(Entry::parent) {
            if parent == ancestor {
                return true;
            }
            id = parent;
        }
        false
    }

    fn child_list_mut(&mut self, parent: Option<EntryId>) -> &mut Vec<EntryId> {
        match parent {
            Some(id) => match self.entries.get_mut(id.0).and_then(Option::as_mut) {
                Some(entry) => &mut entry.children,
                None => &mut self.root,
            },
            None => &mut self.root,
        }
    }
}

/// Upper-case a GUID and make sure it is braced.
pub fn normalize_guid(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('{').trim_end_matches('}');
    format!("{{{}}}", trimmed.to_ascii_uppercase())
}

/// Whether two GUIDs are equal, ignoring case and braces.
pub fn same_guid(left: &str, right: &str) -> bool {
    normalize_guid(left) == normalize_guid(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> SolutionDocument {
        SolutionDocument::new("/repo/App.sln")
    }

    #[test]
    fn base_directory_is_solution_parent() {
        let doc = document();
        assert_eq!(doc.base_directory(), Path::new("/repo"));
    }

    #[test]
    fn insert_links_parent_and_children() {
        let mut doc = document();
        let libs = doc.insert(Entry::folder("libs", "{a}"), None);
        let project = doc.insert(
            Entry::new("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}", "Foo", "libs/Foo/Foo.csproj", "{b}"),
            Some(libs),
        );

        assert_eq!(doc.children(None), &[libs]);
        assert_eq!(doc.children(Some(libs)), &[project]);
        assert_eq!(doc.folder_chain(project), vec!["libs".to_string()]);
        assert_eq!(doc.find_project("libs/Foo/Foo.csproj"), Some(project));
        assert_eq!(doc.find_child_folder(None, "libs"), Some(libs));
        assert_eq!(doc.find_child_folder(None, "Libs"), None);
    }

    #[test]
    fn remove_keeps_other_ids_stable() {
        let mut doc = document();
        let first = doc.insert(Entry::folder("a", "{1}"), None);
        let second = doc.insert(Entry::folder("b", "{2}"), None);

        assert!(doc.remove(first).is_some());
        assert!(doc.entry(first).is_none());
        assert_eq!(doc.entry(second).map(|e| e.name.as_str()), Some("b"));
        assert_eq!(doc.children(None), &[second]);
        assert!(doc.remove(first).is_none());
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut doc = document();
        let outer = doc.insert(Entry::folder("outer", "{1}"), None);
        let inner = doc.insert(Entry::folder("inner", "{2}"), Some(outer));

        assert!(!doc.set_parent(outer, Some(inner)));
        assert!(!doc.set_parent(outer, Some(outer)));
        assert!(doc.set_parent(inner, None));
        assert_eq!(doc.children(None), &[outer, inner]);
    }

    #[test]
    fn guids_compare_ignoring_case() {
        assert_eq!(normalize_guid("abc-def"), "{ABC-DEF}");
        assert_eq!(normalize_guid("{abc}"), "{ABC}");
        assert!(same_guid("{abc}", "ABC"));
        assert!(!same_guid("{abc}", "{abd}"));

        let mut doc = document();
        let id = doc.insert(Entry::folder("x", "{abc}"), None);
        assert_eq!(doc.find_by_guid("{ABC}"), Some(id));
        assert_eq!(doc.entry(id).map(|entry| entry.guid.as_str()), Some("{abc}"));

        let lower_folder = Entry::new(
            SOLUTION_FOLDER_TYPE.to_ascii_lowercase(),
            "y",
            "y",
            "{def}",
        );
        assert!(lower_folder.is_folder());
    }
}
