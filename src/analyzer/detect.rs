//! Project-type detection via marker files, and build-tool presence
//! detection (spec.md §4.4).
use super::types::ProjectType;
use std::path::Path;

/// Ordered marker → language table. First match per language wins; entries
/// earlier in the list are tried first, but every marker present on disk
/// contributes an entry (duplicates by language name are suppressed after).
const MARKERS: &[(&str, &str)] = &[
    ("go.mod", "Go"),
    ("package.json", "JavaScript/TypeScript"),
    ("Cargo.toml", "Rust"),
    ("pom.xml", "Java"),
    ("build.gradle", "Java/Kotlin"),
    ("build.gradle.kts", "Java/Kotlin"),
    ("requirements.txt", "Python"),
    ("pyproject.toml", "Python"),
    ("setup.py", "Python"),
    ("Gemfile", "Ruby"),
    ("composer.json", "PHP"),
    ("CMakeLists.txt", "C/C++"),
    ("Makefile", "C/C++"),
    ("mix.exs", "Elixir"),
    ("stack.yaml", "Haskell"),
];

pub fn detect_project_types(root: &Path) -> Vec<ProjectType> {
    let mut seen_languages = std::collections::HashSet::new();
    let mut types = Vec::new();

    for (marker, language) in MARKERS {
        if root.join(marker).is_file() && seen_languages.insert(language.to_string()) {
            types.push(ProjectType {
                language: language.to_string(),
                build_file: marker.to_string(),
                frameworks: Vec::new(),
            });
        }
    }

    // *.csproj → C# (glob-like marker, scanned separately from the fixed table)
    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csproj") {
                let build_file = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                types.push(ProjectType {
                    language: "C#".to_string(),
                    build_file,
                    frameworks: Vec::new(),
                });
                break;
            }
        }
    }

    types
}

const BUILD_TOOLS: &[&[&str]] = &[
    &["Taskfile.yml", "Taskfile.yaml"],
    &["Makefile"],
    &["Dockerfile"],
    &["docker-compose.yml", "docker-compose.yaml"],
    &[".goreleaser.yml", ".goreleaser.yaml"],
    &["Jenkinsfile"],
    &["Vagrantfile"],
    &["Procfile"],
    &["fly.toml"],
    &["vercel.json"],
    &["netlify.toml"],
];

/// Each tool is reported once even if multiple of its marker filenames match.
pub fn detect_build_tools(root: &Path) -> Vec<String> {
    let mut tools = Vec::new();
    for variants in BUILD_TOOLS {
        if variants.iter().any(|f| root.join(f).is_file()) {
            tools.push(variants[0].to_string());
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn detects_go_module() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("go.mod"), "module example\n").unwrap();
        let types = detect_project_types(dir.path());
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].language, "Go");
    }

    #[test]
    fn suppresses_duplicate_language_from_multiple_gradle_variants() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("build.gradle"), "").unwrap();
        fs::write(dir.path().join("build.gradle.kts"), "").unwrap();
        let types = detect_project_types(dir.path());
        assert_eq!(types.iter().filter(|t| t.language == "Java/Kotlin").count(), 1);
    }

    #[test]
    fn build_tools_each_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Makefile"), "").unwrap();
        fs::write(dir.path().join("docker-compose.yaml"), "").unwrap();
        let tools = detect_build_tools(dir.path());
        assert_eq!(tools, vec!["Makefile".to_string(), "docker-compose.yml".to_string()]);
    }
}
