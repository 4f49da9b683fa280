//! Health scoring — 12 checks summing to 0..100 (spec.md §4.4).
use super::docs::scan as scan_docs;
use super::git::gather as gather_git;
use super::types::{HealthCheck, HealthReport};
use std::path::Path;

const TEST_DIR_NAMES: &[&str] = &["tests", "test", "__tests__", "spec"];

/// A file or directory matching any of these patterns counts as test
/// evidence (spec.md §4.4). Simple suffix/prefix checks stand in for the
/// glob patterns in the spec text.
fn looks_like_test_file(name: &str) -> bool {
    name.ends_with("_test.go")
        || name.ends_with(".test.js")
        || name.ends_with(".test.ts")
        || name.ends_with(".test.tsx")
        || name.ends_with(".spec.js")
        || name.ends_with(".spec.ts")
        || name.ends_with("_test.py")
        || name.ends_with("_test.rs")
        || name.starts_with("test_")
}

fn has_tests(dir: &Path) -> bool {
    fn walk(dir: &Path, depth: u32) -> bool {
        if depth > 3 {
            return false;
        }
        let Ok(entries) = std::fs::read_dir(dir) else {
            return false;
        };
        for entry in entries.filter_map(|e| e.ok()) {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with('.') || name_str == "node_modules" || name_str == "target" {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                if TEST_DIR_NAMES.iter().any(|d| name_str.eq_ignore_ascii_case(d)) {
                    return true;
                }
                if walk(&path, depth + 1) {
                    return true;
                }
            } else if looks_like_test_file(&name_str) {
                return true;
            }
        }
        false
    }
    walk(dir, 0)
}

fn has_build_automation(dir: &Path) -> bool {
    const MARKERS: &[&str] = &[
        "Taskfile.yml",
        "Taskfile.yaml",
        "Makefile",
        "Dockerfile",
        "docker-compose.yml",
        "docker-compose.yaml",
    ];
    MARKERS.iter().any(|m| dir.join(m).is_file())
}

/// Runs the 12 checks and sums them into a 0..100 score with a letter
/// grade per the table in spec.md §4.4.
pub fn score(dir: &Path) -> HealthReport {
    let docs = scan_docs(dir);
    let git = gather_git(dir);
    let tests_present = has_tests(dir);
    let build_present = has_build_automation(dir);

    let mut checks = Vec::new();
    let mut total = 0u32;

    let mut check = |name: &str, passed: bool, max_pts: u32, details: &str| {
        let points = if passed { max_pts } else { 0 };
        total += points;
        checks.push(HealthCheck {
            name: name.to_string(),
            passed,
            points,
            max_pts,
            details: details.to_string(),
        });
    };

    check("README", docs.has_readme, 15, "README.md present");
    check(
        "LICENSE",
        docs.has_license,
        10,
        &docs.license_type.clone().unwrap_or_else(|| "absent".to_string()),
    );
    check(".gitignore", docs.has_gitignore, 5, ".gitignore present");
    check("CI/CD", !docs.ci_configs.is_empty(), 15, "CI configuration detected");
    check("Tests", tests_present, 15, "test files or directory detected");
    check(
        "Linter config",
        !docs.linter_configs.is_empty(),
        10,
        "linter configuration detected",
    );
    check("Git clean", git.is_repo && git.clean, 5, "working tree has no pending changes");
    check("CONTRIBUTING", docs.has_contributing, 5, "CONTRIBUTING present");
    check("docs/ dir", docs.has_docs_dir, 5, "docs/ directory present");
    check("CHANGELOG", docs.has_changelog, 5, "CHANGELOG present");
    check(".editorconfig", docs.has_editorconfig, 5, ".editorconfig present");
    check("Build automation", build_present, 5, "build/task runner file detected");

    let grade = match total {
        90..=100 => 'A',
        80..=89 => 'B',
        70..=79 => 'C',
        60..=69 => 'D',
        _ => 'F',
    };

    HealthReport {
        score: total,
        grade,
        checks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn floor_score_for_minimal_project() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "hi").unwrap();
        fs::write(
            dir.path().join("LICENSE"),
            "MIT License\nPermission is hereby granted, free of charge",
        )
        .unwrap();
        fs::write(dir.path().join(".gitignore"), "target/").unwrap();
        fs::write(dir.path().join("Taskfile.yml"), "version: '3'").unwrap();

        let report = score(dir.path());
        assert!(report.score >= 35, "expected score >= 35, got {}", report.score);
    }

    #[test]
    fn grade_boundaries() {
        let dir = tempfile::tempdir().unwrap();
        let report = score(dir.path());
        assert_eq!(report.grade, 'F');
    }
}
