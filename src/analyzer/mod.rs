//! AnalyzerCore — multi-ecosystem polyglot repository introspection
//! (spec.md §4.4). Orchestrates type detection, language counting,
//! dependency parsing, git metadata, docs scanning, and health scoring
//! into a single [`types::ProjectReport`].
pub mod deps;
pub mod detect;
pub mod docs;
pub mod git;
pub mod health;
pub mod langs;
pub mod types;

use crate::error::{Result, ToolboxError};
use std::path::Path;
use types::ProjectReport;

/// Runs the full analyzer pipeline over `root` and assembles a
/// [`ProjectReport`]. Fails only if `root` doesn't exist or isn't a
/// directory (spec.md §7 "Usage"); every sub-scanner degrades gracefully
/// on its own (missing manifests, non-repo, unreadable subtrees).
pub fn analyze(root: &Path) -> Result<ProjectReport> {
    tracing::debug!(root = %root.display(), "running analyzer pipeline");
    if !root.is_dir() {
        return Err(ToolboxError::NotFound(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut project_types = detect::detect_project_types(root);
    let dep_reports = deps::parse_all(root);
    attach_frameworks(&mut project_types, &dep_reports);

    Ok(ProjectReport {
        root: root.display().to_string(),
        project_types,
        languages: langs::count_languages(root),
        build_tools: detect::detect_build_tools(root),
        deps: dep_reports,
        git: git::gather(root),
        docs: docs::scan(root),
        health: health::score(root),
    })
}

fn attach_frameworks(project_types: &mut [types::ProjectType], dep_reports: &[types::DepsReport]) {
    for report in dep_reports {
        let frameworks = deps::detect_frameworks(report);
        if frameworks.is_empty() {
            continue;
        }
        let target_language = match report {
            types::DepsReport::Go { .. } => "Go",
            types::DepsReport::Node { .. } => "JavaScript/TypeScript",
            _ => continue,
        };
        for pt in project_types.iter_mut() {
            if pt.language == target_language {
                pt.frameworks.extend(frameworks.iter().cloned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn analyze_assembles_full_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module example\ngo 1.22\n").unwrap();
        fs::write(dir.path().join("main.go"), "package main\n").unwrap();
        fs::write(dir.path().join("README.md"), "hi").unwrap();

        let report = analyze(dir.path()).unwrap();
        assert_eq!(report.project_types.len(), 1);
        assert_eq!(report.project_types[0].language, "Go");
        assert!(report.languages.iter().any(|l| l.name == "Go"));
        assert!(!report.git.is_repo);
        assert!(report.docs.has_readme);
    }

    #[test]
    fn analyze_rejects_non_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "x").unwrap();
        assert!(analyze(&file).is_err());
    }
}
