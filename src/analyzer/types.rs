//! Data model for AnalyzerCore (spec.md §3 "Project entities").
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectType {
    pub language: String,
    pub build_file: String,
    #[serde(default)]
    pub frameworks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageInfo {
    pub name: String,
    pub file_count: usize,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dependency {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Dependency {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), version: None }
    }
    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self { name: name.into(), version: Some(version.into()) }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "ecosystem")]
pub enum DepsReport {
    Go {
        module: String,
        go_version: String,
        direct: Vec<Dependency>,
        indirect: Vec<Dependency>,
        total: usize,
    },
    Node {
        package_manager: String,
        dependencies: Vec<Dependency>,
        dev_dependencies: Vec<Dependency>,
    },
    Python {
        dependencies: Vec<Dependency>,
    },
    Rust {
        package_name: Option<String>,
        dependencies: Vec<Dependency>,
    },
    Java {
        dependencies: Vec<Dependency>,
    },
    Ruby {
        gems: Vec<Dependency>,
    },
    Php {
        dependencies: Vec<Dependency>,
    },
    DotNet {
        packages: Vec<Dependency>,
    },
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct GitReport {
    pub is_repo: bool,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub clean: bool,
    #[serde(default)]
    pub ahead: u32,
    #[serde(default)]
    pub behind: u32,
    #[serde(default)]
    pub recent_commits: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub total_commits: u32,
    #[serde(default)]
    pub contributors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DocsReport {
    pub has_readme: bool,
    pub has_license: bool,
    #[serde(default)]
    pub license_type: Option<String>,
    pub has_changelog: bool,
    pub has_contributing: bool,
    pub has_claude_md: bool,
    pub has_docs_dir: bool,
    pub has_gitignore: bool,
    pub has_editorconfig: bool,
    #[serde(default)]
    pub ci_configs: Vec<String>,
    #[serde(default)]
    pub linter_configs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub passed: bool,
    pub points: u32,
    pub max_pts: u32,
    pub details: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub score: u32,
    pub grade: char,
    pub checks: Vec<HealthCheck>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub root: String,
    pub project_types: Vec<ProjectType>,
    pub languages: Vec<LanguageInfo>,
    pub build_tools: Vec<String>,
    pub deps: Vec<DepsReport>,
    pub git: GitReport,
    pub docs: DocsReport,
    pub health: HealthReport,
}
