//! Loading and writing `.sln` files.
//!
//! Only the parts the membership engine manages are modelled: `Project` blocks and the
//! `SolutionConfigurationPlatforms`, `ProjectConfigurationPlatforms` and `NestedProjects`
//! global sections. Everything else is carried through as opaque lines, and modelled
//! content that was not changed is written back with its original text.

use std::collections::HashMap;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::{ResolutionError, SolutionParseError};
use crate::domain::model::{
    ConfigurationEntry, Entry, EntryId, SolutionConfiguration, SolutionDocument,
};
use crate::infra::paths;

/// File extension of solution files, without the dot.
pub const SOLUTION_EXTENSION: &str = "sln";

static PROJECT_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^Project\(\s*"(?P<type>[^"]*)"\s*\)\s*=\s*"(?P<name>[^"]*)"\s*,\s*"(?P<path>[^"]*)"\s*,\s*"(?P<guid>[^"]*)""#,
    )
    .expect("project header pattern is valid")
});

static SECTION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^GlobalSection\(\s*(?P<name>[^)]*?)\s*\)\s*=\s*(?P<phase>\S+)")
        .expect("section header pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ManagedSection {
    SolutionConfigurations,
    ProjectConfigurations,
    NestedProjects,
}

impl ManagedSection {
    const ALL: [ManagedSection; 3] = [
        ManagedSection::SolutionConfigurations,
        ManagedSection::ProjectConfigurations,
        ManagedSection::NestedProjects,
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.name() == name)
    }

    fn name(self) -> &'static str {
        match self {
            ManagedSection::SolutionConfigurations => "SolutionConfigurationPlatforms",
            ManagedSection::ProjectConfigurations => "ProjectConfigurationPlatforms",
            ManagedSection::NestedProjects => "NestedProjects",
        }
    }

    fn phase(self) -> &'static str {
        match self {
            ManagedSection::ProjectConfigurations => "postSolution",
            _ => "preSolution",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GlobalItem {
    Managed(ManagedSection),
    Raw {
        name: String,
        header: String,
        lines: Vec<String>,
        footer: String,
    },
    Line(String),
}

impl GlobalItem {
    fn is_managed(&self, kind: ManagedSection) -> bool {
        matches!(self, GlobalItem::Managed(existing) if *existing == kind)
    }

    fn is_raw_named(&self, wanted: &str) -> bool {
        matches!(self, GlobalItem::Raw { name, .. } if name == wanted)
    }
}

/// A managed section as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OriginalSection {
    header: String,
    footer: String,
    lines: Vec<OriginalLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OriginalLine {
    /// Match key of the `key = value` pair, `None` for blank or unrecognised lines.
    key: Option<String>,
    text: String,
}

/// The text a project declaration was read from, with its canonical rendering at load
/// time. The original is reused while the rendering stays the same.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    rendered: String,
    original: String,
}

/// Text surrounding the modelled content, kept so unrelated parts round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layout {
    bom: bool,
    newline: &'static str,
    final_newline: bool,
    header: Vec<String>,
    /// Lines between two `Project` blocks, keyed by the entry that follows them.
    leading: HashMap<EntryId, Vec<String>>,
    declarations: HashMap<EntryId, Declaration>,
    /// Lines after the last `Project` block and before `Global`.
    interlude: Vec<String>,
    global: Option<Vec<GlobalItem>>,
    managed: HashMap<ManagedSection, OriginalSection>,
    trailer: Vec<String>,
}

/// A solution document together with the on-disk layout it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionFile {
    pub document: SolutionDocument,
    layout: Layout,
}

impl SolutionFile {
    /// Load the solution at `path_or_directory`. A directory must contain exactly one
    /// solution file.
    pub fn load(path_or_directory: &Path) -> Result<Self> {
        let path = locate_solution(path_or_directory)?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read solution file {}", path.display()))?;
        let file = Self::parse(&path, &contents)
            .with_context(|| format!("invalid solution file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            entries = file.document.entries().count(),
            "loaded solution"
        );
        Ok(file)
    }

    /// Parse solution text read from `path`.
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Result<Self, SolutionParseError> {
        let (bom, text) = match contents.strip_prefix('\u{feff}') {
            Some(rest) => (true, rest),
            None => (false, contents),
        };
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };

        let mut document = SolutionDocument::new(path);
        let mut layout = Layout {
            bom,
            newline,
            final_newline: text.is_empty() || text.ends_with('\n'),
            header: Vec::new(),
            leading: HashMap::new(),
            declarations: HashMap::new(),
            interlude: Vec::new(),
            global: None,
            managed: HashMap::new(),
            trailer: Vec::new(),
        };
        let mut nested: Vec<(String, String)> = Vec::new();
        let mut seen_project = false;
        let mut pending: Vec<String> = Vec::new();

        let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));
        while let Some((number, line)) = lines.next() {
            let trimmed = line.trim();
            if layout.global.is_none() && trimmed.starts_with("Project(") {
                let entry = parse_project(number, trimmed, &mut lines)?;
                let rendered = declaration(&entry);
                let id = document.insert(entry, None);
                layout.declarations.insert(
                    id,
                    Declaration {
                        rendered,
                        original: line.to_owned(),
                    },
                );
                if !pending.is_empty() {
                    layout.leading.insert(id, mem::take(&mut pending));
                }
                seen_project = true;
            } else if layout.global.is_none() && trimmed == "Global" {
                layout.interlude = mem::take(&mut pending);
                let items = parse_global(
                    number,
                    &mut lines,
                    &mut document,
                    &mut layout.managed,
                    &mut nested,
                )?;
                layout.global = Some(items);
            } else if layout.global.is_some() {
                layout.trailer.push(line.to_owned());
            } else if seen_project {
                pending.push(line.to_owned());
            } else {
                layout.header.push(line.to_owned());
            }
        }
        if layout.global.is_none() {
            layout.interlude = pending;
        }

        for (child, parent) in nested {
            let linked = match (document.find_by_guid(&child), document.find_by_guid(&parent)) {
                (Some(child_id), Some(parent_id)) => document.set_parent(child_id, Some(parent_id)),
                _ => false,
            };
            if !linked {
                tracing::warn!(%child, %parent, "ignoring unresolved nested project reference");
            }
        }

        Ok(Self { document, layout })
    }

    /// Serialize the document, preserving the layout it was loaded with.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.layout.bom {
            out.push('\u{feff}');
        }
        let newline = self.layout.newline;
        let mut push = |line: &str| {
            out.push_str(line);
            out.push_str(newline);
        };

        self.layout.header.iter().for_each(|line| push(line));

        for (id, entry) in self.document.entries() {
            if let Some(lines) = self.layout.leading.get(&id) {
                lines.iter().for_each(|line| push(line));
            }
            let rendered = declaration(entry);
            match self.layout.declarations.get(&id) {
                Some(original) if original.rendered == rendered => push(&original.original),
                _ => push(&rendered),
            }
            entry.body.iter().for_each(|line| push(line));
            push("EndProject");
        }

        self.layout.interlude.iter().for_each(|line| push(line));

        let items = self.global_items();
        if self.layout.global.is_some() || !items.is_empty() {
            push("Global");
            for item in &items {
                match item {
                    GlobalItem::Managed(kind) => {
                        if let Some(block) = self.managed_block(*kind) {
                            block.iter().for_each(|line| push(line));
                        }
                    }
                    GlobalItem::Raw {
                        header,
                        lines,
                        footer,
                        ..
                    } => {
                        push(header);
                        lines.iter().for_each(|line| push(line));
                        push(footer);
                    }
                    GlobalItem::Line(line) => push(line),
                }
            }
            push("EndGlobal");
        }

        self.layout.trailer.iter().for_each(|line| push(line));

        if !self.layout.final_newline && out.ends_with(newline) {
            out.truncate(out.len() - newline.len());
        }
        out
    }

    /// Write the rendered solution back to its path.
    pub fn write(&self) -> Result<()> {
        let path = self.document.path();
        fs::write(path, self.render())
            .with_context(|| format!("failed to write solution file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote solution");
        Ok(())
    }

    /// Global items in output order, with managed sections that now have content but
    /// were absent from the original file slotted into their usual position.
    fn global_items(&self) -> Vec<GlobalItem> {
        let mut items = self.layout.global.clone().unwrap_or_default();
        for kind in ManagedSection::ALL {
            if items.iter().any(|item| item.is_managed(kind))
                || self.managed_pairs(kind).is_empty()
            {
                continue;
            }
            let position = match kind {
                ManagedSection::SolutionConfigurations => 0,
                ManagedSection::ProjectConfigurations => items
                    .iter()
                    .position(|item| item.is_managed(ManagedSection::SolutionConfigurations))
                    .map_or(0, |idx| idx + 1),
                ManagedSection::NestedProjects => items
                    .iter()
                    .position(|item| item.is_raw_named("ExtensibilityGlobals"))
                    .unwrap_or(items.len()),
            };
            items.insert(position, GlobalItem::Managed(kind));
        }
        items
    }

    /// Lines of a managed section, header and footer included, or `None` when the
    /// section has nothing left to say.
    ///
    /// Lines read from the file are kept in place while the model still holds them;
    /// pairs the file did not have are appended.
    fn managed_block(&self, kind: ManagedSection) -> Option<Vec<String>> {
        let original = self.layout.managed.get(&kind);
        let mut pending: Vec<Option<(String, String)>> = self
            .managed_pairs(kind)
            .into_iter()
            .map(|(key, value)| Some((line_key(&key, &value), format!("\t\t{key} = {value}"))))
            .collect();

        let had_pairs =
            original.is_some_and(|section| section.lines.iter().any(|line| line.key.is_some()));
        if pending.is_empty() && (original.is_none() || had_pairs) {
            return None;
        }

        let mut block = vec![original.map_or_else(
            || format!("\tGlobalSection({}) = {}", kind.name(), kind.phase()),
            |section| section.header.clone(),
        )];
        for line in original.iter().flat_map(|section| &section.lines) {
            let Some(key) = &line.key else {
                block.push(line.text.clone());
                continue;
            };
            let matched = pending
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|(pending_key, _)| pending_key == key));
            if let Some(slot) = matched {
                slot.take();
                block.push(line.text.clone());
            }
        }
        block.extend(pending.into_iter().flatten().map(|(_, text)| text));
        block.push(original.map_or_else(
            || "\tEndGlobalSection".to_owned(),
            |section| section.footer.clone(),
        ));
        Some(block)
    }

    fn managed_pairs(&self, kind: ManagedSection) -> Vec<(String, String)> {
        let document = &self.document;
        match kind {
            ManagedSection::SolutionConfigurations => document
                .solution_configurations
                .iter()
                .map(|configuration| (configuration.name.clone(), configuration.value.clone()))
                .collect(),
            ManagedSection::ProjectConfigurations => document
                .project_configurations
                .iter()
                .map(|entry| {
                    (
                        format!("{}.{}", entry.project_guid, entry.key),
                        entry.value.clone(),
                    )
                })
                .collect(),
            ManagedSection::NestedProjects => document
                .entries()
                .filter_map(|(_, entry)| {
                    let parent = document.entry(entry.parent()?)?;
                    Some((entry.guid.clone(), parent.guid.clone()))
                })
                .collect(),
        }
    }
}

fn declaration(entry: &Entry) -> String {
    format!(
        "Project(\"{}\") = \"{}\", \"{}\", \"{}\"",
        entry.type_guid,
        entry.name,
        paths::to_solution_separators(&entry.path),
        entry.guid
    )
}

/// Key two `key = value` lines are matched on. GUIDs appear in either case.
fn line_key(key: &str, value: &str) -> String {
    format!("{} = {}", key.trim(), value.trim()).to_ascii_uppercase()
}

fn parse_project<'a>(
    number: usize,
    header: &str,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
) -> Result<Entry, SolutionParseError> {
    let captures = PROJECT_HEADER
        .captures(header)
        .ok_or(SolutionParseError::InvalidProjectHeader { line: number })?;
    let mut entry = Entry::new(
        &captures["type"],
        &captures["name"],
        paths::to_forward_slashes(&captures["path"]),
        &captures["guid"],
    );

    for (_, line) in lines.by_ref() {
        if line.trim() == "EndProject" {
            return Ok(entry);
        }
        entry.body.push(line.to_owned());
    }
    Err(SolutionParseError::UnterminatedProject { line: number })
}

fn parse_global<'a>(
    start: usize,
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    document: &mut SolutionDocument,
    managed: &mut HashMap<ManagedSection, OriginalSection>,
    nested: &mut Vec<(String, String)>,
) -> Result<Vec<GlobalItem>, SolutionParseError> {
    let mut items: Vec<GlobalItem> = Vec::new();

    while let Some((number, line)) = lines.next() {
        let trimmed = line.trim();
        if trimmed == "EndGlobal" {
            return Ok(items);
        }
        let Some(captures) = SECTION_HEADER.captures(trimmed) else {
            items.push(GlobalItem::Line(line.to_owned()));
            continue;
        };

        let name = captures["name"].to_owned();
        let mut body: Vec<String> = Vec::new();
        let mut footer = None;
        for (_, line) in lines.by_ref() {
            if line.trim() == "EndGlobalSection" {
                footer = Some(line.to_owned());
                break;
            }
            body.push(line.to_owned());
        }
        let footer = footer.ok_or(SolutionParseError::UnterminatedSection { line: number })?;

        match ManagedSection::from_name(&name) {
            Some(kind) => {
                let original = read_managed_section(kind, body, document, nested);
                managed
                    .entry(kind)
                    .or_insert_with(|| OriginalSection {
                        header: line.to_owned(),
                        footer,
                        lines: Vec::new(),
                    })
                    .lines
                    .extend(original);
                if !items.iter().any(|item| item.is_managed(kind)) {
                    items.push(GlobalItem::Managed(kind));
                }
            }
            None => items.push(GlobalItem::Raw {
                name,
                header: line.to_owned(),
                lines: body,
                footer,
            }),
        }
    }

    Err(SolutionParseError::UnterminatedGlobal { line: start })
}

fn read_managed_section(
    kind: ManagedSection,
    body: Vec<String>,
    document: &mut SolutionDocument,
    nested: &mut Vec<(String, String)>,
) -> Vec<OriginalLine> {
    body.into_iter()
        .map(|text| {
            let key = read_managed_line(kind, &text, document, nested);
            OriginalLine { key, text }
        })
        .collect()
}

/// Record one section line in the model and return its match key.
fn read_managed_line(
    kind: ManagedSection,
    text: &str,
    document: &mut SolutionDocument,
    nested: &mut Vec<(String, String)>,
) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some((key, value)) = trimmed.split_once('=') else {
        tracing::warn!(section = kind.name(), line = trimmed, "skipping malformed line");
        return None;
    };
    let (key, value) = (key.trim(), value.trim());

    match kind {
        ManagedSection::SolutionConfigurations => {
            document.solution_configurations.push(SolutionConfiguration {
                name: key.to_owned(),
                value: value.to_owned(),
            });
        }
        ManagedSection::ProjectConfigurations => {
            let Some((guid, rest)) = key.split_once('.') else {
                tracing::warn!(line = key, "skipping project configuration without a GUID");
                return None;
            };
            document.project_configurations.push(ConfigurationEntry {
                project_guid: guid.to_owned(),
                key: rest.to_owned(),
                value: value.to_owned(),
            });
        }
        ManagedSection::NestedProjects => {
            nested.push((key.to_owned(), value.to_owned()));
        }
    }
    Some(line_key(key, value))
}

fn locate_solution(path_or_directory: &Path) -> Result<PathBuf> {
    let absolute = paths::absolutize(path_or_directory)?;
    if absolute.is_file() {
        return Ok(absolute);
    }
    if !absolute.is_dir() {
        return Err(ResolutionError::SolutionNotFound(absolute).into());
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(&absolute)
        .with_context(|| format!("failed to list directory {}", absolute.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext == SOLUTION_EXTENSION)
        })
        .collect();

    match candidates.len() {
        0 => Err(ResolutionError::SolutionNotFound(absolute).into()),
        1 => Ok(candidates.remove(0)),
        _ => Err(ResolutionError::MultipleSolutionFiles(absolute).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::model::EntryKind;

    const SAMPLE: &str = "\
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
VisualStudioVersion = 17.0.31903.59
MinimumVisualStudioVersion = 10.0.40219.1
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"libs\", \"libs\", \"{11111111-1111-1111-1111-111111111111}\"
EndProject
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Core\", \"libs\\Core\\Core.csproj\", \"{22222222-2222-2222-2222-222222222222}\"
EndProject
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"Solution Items\", \"Solution Items\", \"{33333333-3333-3333-3333-333333333333}\"
\tProjectSection(SolutionItems) = preProject
\t\tREADME.md = README.md
\tEndProjectSection
EndProject
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tDebug|Any CPU = Debug|Any CPU
\t\tRelease|Any CPU = Release|Any CPU
\tEndGlobalSection
\tGlobalSection(ProjectConfigurationPlatforms) = postSolution
\t\t{22222222-2222-2222-2222-222222222222}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
\t\t{22222222-2222-2222-2222-222222222222}.Debug|Any CPU.Build.0 = Debug|Any CPU
\tEndGlobalSection
\tGlobalSection(SolutionProperties) = preSolution
\t\tHideSolutionNode = FALSE
\tEndGlobalSection
\tGlobalSection(NestedProjects) = preSolution
\t\t{22222222-2222-2222-2222-222222222222} = {11111111-1111-1111-1111-111111111111}
\tEndGlobalSection
EndGlobal
";

    fn sample() -> SolutionFile {
        SolutionFile::parse("/repo/App.sln", SAMPLE).expect("sample parses")
    }

    #[test]
    fn parses_entries_and_nesting() {
        let file = sample();
        let doc = &file.document;

        assert_eq!(doc.entries().count(), 3);
        let core = doc.find_project("libs/Core/Core.csproj").expect("core project");
        assert_eq!(doc.folder_chain(core), vec!["libs".to_string()]);

        let items = doc
            .find_by_guid("{33333333-3333-3333-3333-333333333333}")
            .and_then(|id| doc.entry(id))
            .expect("solution items folder");
        assert_eq!(items.kind(), EntryKind::Folder);
        assert_eq!(items.body.len(), 3);
    }

    #[test]
    fn parses_configuration_tables() {
        let doc = sample().document;
        assert_eq!(
            doc.solution_configurations,
            vec![
                SolutionConfiguration::new("Debug|Any CPU"),
                SolutionConfiguration::new("Release|Any CPU"),
            ]
        );
        assert_eq!(doc.project_configurations.len(), 2);
        assert_eq!(
            doc.project_configurations[0].project_guid,
            "{22222222-2222-2222-2222-222222222222}"
        );
        assert_eq!(doc.project_configurations[1].key, "Debug|Any CPU.Build.0");
    }

    #[test]
    fn untouched_file_round_trips() {
        assert_eq!(sample().render(), SAMPLE);
    }

    #[test]
    fn preserves_crlf_and_bom() {
        let crlf = format!("\u{feff}{}", SAMPLE.replace('\n', "\r\n"));
        let file = SolutionFile::parse("/repo/App.sln", &crlf).expect("crlf parses");
        assert_eq!(file.render(), crlf);
    }

    #[test]
    fn lowercase_guids_and_missing_final_newline_survive() {
        let text = "\
Project(\"{fae04ec0-301f-11d3-bf4b-00c04f79efbc}\") = \"A\", \"A\\A.csproj\", \"{aaaaaaaa-0000-0000-0000-000000000000}\"
EndProject
Global
\tGlobalSection(ProjectConfigurationPlatforms) = postSolution
\t\t{aaaaaaaa-0000-0000-0000-000000000000}.Debug|Any CPU.ActiveCfg = Debug|Any CPU
\tEndGlobalSection
EndGlobal";
        let mut file = SolutionFile::parse("/repo/App.sln", text).expect("parses");
        assert_eq!(file.render(), text);

        let folder = file
            .document
            .insert(Entry::folder("tools", "{BBBBBBBB-0000-0000-0000-000000000000}"), None);
        let project = file
            .document
            .find_project("A/A.csproj")
            .expect("project A");
        assert!(file.document.set_parent(project, Some(folder)));

        let rendered = file.render();
        assert!(rendered.starts_with(
            "Project(\"{fae04ec0-301f-11d3-bf4b-00c04f79efbc}\") = \"A\", \"A\\A.csproj\", \"{aaaaaaaa-0000-0000-0000-000000000000}\"\n"
        ));
        assert!(rendered.contains(
            "\t\t{aaaaaaaa-0000-0000-0000-000000000000}.Debug|Any CPU.ActiveCfg = Debug|Any CPU\n"
        ));
        assert!(rendered.contains(
            "\t\t{aaaaaaaa-0000-0000-0000-000000000000} = {BBBBBBBB-0000-0000-0000-000000000000}\n"
        ));
        assert!(rendered.ends_with("EndGlobal"));
    }

    #[test]
    fn lines_between_projects_stay_in_place() {
        let text = "\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"A\", \"A\\A.csproj\", \"{AAAAAAAA-0000-0000-0000-000000000000}\"
EndProject
# between A and B

Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"B\", \"B/B.csproj\", \"{BBBBBBBB-0000-0000-0000-000000000000}\"
EndProject
Global
EndGlobal
";
        let mut file = SolutionFile::parse("/repo/App.sln", text).expect("parses");
        assert_eq!(file.render(), text);

        file.document.insert(
            Entry::new(
                "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}",
                "C",
                "C/C.csproj",
                "{CCCCCCCC-0000-0000-0000-000000000000}",
            ),
            None,
        );
        let rendered = file.render();
        let comment = rendered.find("# between A and B").expect("comment kept");
        let first = rendered.find("\"A\"").expect("project A");
        let second = rendered.find("\"B\"").expect("project B");
        let added = rendered.find("\"C\"").expect("project C");
        assert!(first < comment && comment < second && second < added);
        assert!(rendered.contains("\"B/B.csproj\""));
    }

    #[test]
    fn solution_configuration_values_are_kept() {
        let text = "\
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tDebug|Mixed = Debug|Any CPU
\tEndGlobalSection
EndGlobal
";
        let mut file = SolutionFile::parse("/repo/App.sln", text).expect("parses");
        assert_eq!(
            file.document.solution_configurations,
            vec![SolutionConfiguration {
                name: "Debug|Mixed".into(),
                value: "Debug|Any CPU".into(),
            }]
        );

        file.document
            .solution_configurations
            .push(SolutionConfiguration::new("Release|Mixed"));
        let rendered = file.render();
        assert!(rendered.contains(
            "\t\tDebug|Mixed = Debug|Any CPU\n\t\tRelease|Mixed = Release|Mixed\n"
        ));
    }

    #[test]
    fn empty_managed_sections_are_dropped() {
        let mut file = sample();
        let core = file
            .document
            .find_project("libs/Core/Core.csproj")
            .expect("core project");
        file.document.remove(core);
        file.document.project_configurations.clear();

        let rendered = file.render();
        assert!(!rendered.contains("NestedProjects"));
        assert!(!rendered.contains("ProjectConfigurationPlatforms"));
        assert!(rendered.contains("SolutionProperties"));
    }

    #[test]
    fn missing_nested_section_is_inserted() {
        let text = "\
Project(\"{2150E333-8FDC-42A3-9474-1A3956D46DE8}\") = \"libs\", \"libs\", \"{11111111-1111-1111-1111-111111111111}\"
EndProject
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Core\", \"libs\\Core\\Core.csproj\", \"{22222222-2222-2222-2222-222222222222}\"
EndProject
Global
\tGlobalSection(ExtensibilityGlobals) = postSolution
\t\tSolutionGuid = {44444444-4444-4444-4444-444444444444}
\tEndGlobalSection
EndGlobal
";
        let mut file = SolutionFile::parse("/repo/App.sln", text).expect("parses");
        let libs = file
            .document
            .find_child_folder(None, "libs")
            .expect("libs folder");
        let core = file
            .document
            .find_project("libs/Core/Core.csproj")
            .expect("core project");
        assert!(file.document.set_parent(core, Some(libs)));

        let rendered = file.render();
        let nested = rendered.find("GlobalSection(NestedProjects)").expect("nested section");
        let extensibility = rendered
            .find("GlobalSection(ExtensibilityGlobals)")
            .expect("extensibility section");
        assert!(nested < extensibility);
        assert!(rendered.contains(
            "\t\t{22222222-2222-2222-2222-222222222222} = {11111111-1111-1111-1111-111111111111}\n"
        ));
    }

    #[test]
    fn unresolved_nesting_is_ignored() {
        let text = "\
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Core\", \"Core\\Core.csproj\", \"{22222222-2222-2222-2222-222222222222}\"
EndProject
Global
\tGlobalSection(NestedProjects) = preSolution
\t\t{22222222-2222-2222-2222-222222222222} = {99999999-9999-9999-9999-999999999999}
\tEndGlobalSection
EndGlobal
";
        let file = SolutionFile::parse("/repo/App.sln", text).expect("parses");
        assert_eq!(file.document.children(None).len(), 1);
        assert!(!file.render().contains("NestedProjects"));
    }

    #[test]
    fn malformed_input_reports_line() {
        let err = SolutionFile::parse("/repo/App.sln", "Project(\"x\") = \"a\"\n").unwrap_err();
        assert_eq!(err, SolutionParseError::InvalidProjectHeader { line: 1 });

        let unterminated = "\nProject(\"{A}\") = \"a\", \"a.csproj\", \"{B}\"\n";
        let err = SolutionFile::parse("/repo/App.sln", unterminated).unwrap_err();
        assert_eq!(err, SolutionParseError::UnterminatedProject { line: 2 });

        let err = SolutionFile::parse("/repo/App.sln", "Global\n").unwrap_err();
        assert_eq!(err, SolutionParseError::UnterminatedGlobal { line: 1 });
    }

    #[test]
    fn load_finds_single_solution_in_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("App.sln"), SAMPLE)?;
        let file = SolutionFile::load(temp.path())?;
        assert_eq!(file.document.entries().count(), 3);
        assert_eq!(
            file.document.base_directory(),
            paths::absolutize(temp.path())?.as_path()
        );
        Ok(())
    }

    #[test]
    fn load_rejects_missing_or_ambiguous_solutions() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let err = SolutionFile::load(temp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::SolutionNotFound(_))
        ));

        fs::write(temp.path().join("A.sln"), SAMPLE)?;
        fs::write(temp.path().join("B.sln"), SAMPLE)?;
        let err = SolutionFile::load(temp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::MultipleSolutionFiles(_))
        ));

        let err = SolutionFile::load(&temp.path().join("missing.sln")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::SolutionNotFound(_))
        ));
        Ok(())
    }
}
