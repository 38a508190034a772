#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

pub const EMPTY_SOLUTION: &str = "\
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
VisualStudioVersion = 17.0.31903.59
MinimumVisualStudioVersion = 10.0.40219.1
Global
\tGlobalSection(SolutionConfigurationPlatforms) = preSolution
\t\tDebug|Any CPU = Debug|Any CPU
\t\tRelease|Any CPU = Release|Any CPU
\tEndGlobalSection
\tGlobalSection(SolutionProperties) = preSolution
\t\tHideSolutionNode = FALSE
\tEndGlobalSection
EndGlobal
";

/// A solution without any build configurations.
pub const BARE_SOLUTION: &str = "\
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
VisualStudioVersion = 17.0.31903.59
MinimumVisualStudioVersion = 10.0.40219.1
Global
\tGlobalSection(SolutionProperties) = preSolution
\t\tHideSolutionNode = FALSE
\tEndGlobalSection
EndGlobal
";

const WELL_KNOWN_GUIDS: [&str; 2] = [
    "{2150E333-8FDC-42A3-9474-1A3956D46DE8}",
    "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}",
];

/// Write `App.sln` with `contents` into `root` and return its path.
pub fn write_solution(root: &Path, contents: &str) -> PathBuf {
    let path = root.join("App.sln");
    fs::write(&path, contents).expect("write solution");
    path
}

/// Create an empty project file at `root/relative` and return its path.
pub fn write_project(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("project has a parent")).expect("create project dir");
    fs::write(&path, "<Project Sdk=\"Microsoft.NET.Sdk\" />\n").expect("write project");
    path
}

/// Replace generated GUIDs with stable placeholders numbered by first appearance.
pub fn redact_guids(text: &str) -> String {
    let pattern = Regex::new(r"\{[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{12}\}")
        .expect("guid pattern");
    let mut seen: Vec<String> = Vec::new();
    pattern
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let guid = &captures[0];
            if WELL_KNOWN_GUIDS.contains(&guid) {
                return guid.to_string();
            }
            let index = match seen.iter().position(|known| known == guid) {
                Some(index) => index,
                None => {
                    seen.push(guid.to_string());
                    seen.len() - 1
                }
            };
            format!("{{GUID-{}}}", index + 1)
        })
        .into_owned()
}
