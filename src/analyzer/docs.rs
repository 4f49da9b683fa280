//! Documentation presence scanning and license classification
//! (spec.md §4.4 "License detection").
use super::types::DocsReport;
use std::path::Path;

const CI_CONFIGS: &[&str] = &[
    ".github/workflows",
    ".gitlab-ci.yml",
    ".circleci/config.yml",
    "azure-pipelines.yml",
    ".travis.yml",
    "Jenkinsfile",
];

const LINTER_CONFIGS: &[&str] = &[
    ".eslintrc",
    ".eslintrc.json",
    ".eslintrc.js",
    ".golangci.yml",
    ".golangci.yaml",
    ".rubocop.yml",
    "clippy.toml",
    ".flake8",
    "pyproject.toml",
    ".pylintrc",
];

fn find_case_insensitive(dir: &Path, stem: &str) -> Option<std::path::PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.eq_ignore_ascii_case(stem) || n.to_ascii_lowercase().starts_with(&format!("{}.", stem.to_ascii_lowercase())))
                .unwrap_or(false)
        })
}

pub fn scan(dir: &Path) -> DocsReport {
    let readme = find_case_insensitive(dir, "README");
    let license_path = find_case_insensitive(dir, "LICENSE");
    let license_type = license_path
        .as_ref()
        .and_then(|p| std::fs::read_to_string(p).ok())
        .map(|content| classify_license(&content));

    DocsReport {
        has_readme: readme.is_some(),
        has_license: license_path.is_some(),
        license_type,
        has_changelog: find_case_insensitive(dir, "CHANGELOG").is_some(),
        has_contributing: find_case_insensitive(dir, "CONTRIBUTING").is_some(),
        has_claude_md: dir.join("CLAUDE.md").is_file(),
        has_docs_dir: dir.join("docs").is_dir(),
        has_gitignore: dir.join(".gitignore").is_file(),
        has_editorconfig: dir.join(".editorconfig").is_file(),
        ci_configs: CI_CONFIGS
            .iter()
            .filter(|c| dir.join(c).exists())
            .map(|c| c.to_string())
            .collect(),
        linter_configs: LINTER_CONFIGS
            .iter()
            .filter(|c| dir.join(c).is_file())
            .map(|c| c.to_string())
            .collect(),
    }
}

/// Case-insensitive substring classification (spec.md §4.4).
pub fn classify_license(content: &str) -> String {
    let lower = content.to_ascii_lowercase();

    if lower.contains("mit license") || lower.contains("permission is hereby granted, free of charge") {
        return "MIT".to_string();
    }
    if lower.contains("apache license") && lower.contains("version 2.0") {
        return "Apache-2.0".to_string();
    }
    if lower.contains("bsd 3-clause")
        || (lower.contains("redistribution") && lower.contains("neither the name"))
    {
        return "BSD-3-Clause".to_string();
    }
    if lower.contains("redistribution") && lower.contains("binary form") {
        return "BSD-2-Clause".to_string();
    }
    if lower.contains("gnu lesser general public license") {
        return "LGPL".to_string();
    }
    if lower.contains("gnu general public license") {
        if lower.contains("version 3") {
            return "GPL-3.0".to_string();
        }
        if lower.contains("version 2") {
            return "GPL-2.0".to_string();
        }
        return "GPL".to_string();
    }
    if lower.contains("mozilla public license") && lower.contains("version 2.0") {
        return "MPL-2.0".to_string();
    }
    if lower.contains("isc license") {
        return "ISC".to_string();
    }
    if lower.contains("the unlicense") {
        return "Unlicense".to_string();
    }
    "Unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn classifies_mit() {
        let text = "MIT License\n\nPermission is hereby granted, free of charge, to any person...";
        assert_eq!(classify_license(text), "MIT");
    }

    #[test]
    fn classifies_apache_2() {
        let text = "Apache License\nVersion 2.0, January 2004\n";
        assert_eq!(classify_license(text), "Apache-2.0");
    }

    #[test]
    fn unknown_license_falls_through() {
        assert_eq!(classify_license("Do whatever you want with this."), "Unknown");
    }

    #[test]
    fn scans_presence_flags() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "hello").unwrap();
        fs::write(dir.path().join("LICENSE"), "MIT License\nPermission is hereby granted, free of charge").unwrap();
        fs::write(dir.path().join(".gitignore"), "target/").unwrap();

        let report = scan(dir.path());
        assert!(report.has_readme);
        assert!(report.has_license);
        assert_eq!(report.license_type.as_deref(), Some("MIT"));
        assert!(report.has_gitignore);
        assert!(!report.has_changelog);
    }
}
