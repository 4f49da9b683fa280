//! Dependency-file parsers, one per ecosystem (spec.md §4.4). Each parser
//! is line-oriented or does a minimal structured decode; parse failures on
//! a single manifest are swallowed by the caller (spec.md §7 "Parse" kind —
//! "skipped silently per file in AnalyzerCore").
use super::types::{DepsReport, Dependency};
use std::path::Path;

fn read(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

// ── Go ──────────────────────────────────────────────────────────────────────

/// Parses `go.mod`: `module` line, `go` directive, and `require (...)`
/// blocks (plus bare `require` lines), classifying each requirement as
/// direct or indirect by a trailing `// indirect` comment.
pub fn parse_go_mod(dir: &Path) -> Option<DepsReport> {
    let content = read(&dir.join("go.mod"))?;
    let mut module = String::new();
    let mut go_version = String::new();
    let mut direct = Vec::new();
    let mut indirect = Vec::new();
    let mut in_require_block = false;

    for raw_line in content.lines() {
        let line = raw_line.trim();
        if let Some(rest) = line.strip_prefix("module ") {
            module = rest.trim().to_string();
            continue;
        }
        if let Some(rest) = line.strip_prefix("go ") {
            if go_version.is_empty() {
                go_version = rest.trim().to_string();
            }
            continue;
        }
        if line.starts_with("require (") {
            in_require_block = true;
            continue;
        }
        if in_require_block {
            if line == ")" {
                in_require_block = false;
                continue;
            }
            push_go_requirement(line, &mut direct, &mut indirect);
            continue;
        }
        if let Some(rest) = line.strip_prefix("require ") {
            push_go_requirement(rest, &mut direct, &mut indirect);
        }
    }

    let total = direct.len() + indirect.len();
    Some(DepsReport::Go {
        module,
        go_version,
        direct,
        indirect,
        total,
    })
}

fn push_go_requirement(line: &str, direct: &mut Vec<Dependency>, indirect: &mut Vec<Dependency>) {
    if line.is_empty() {
        return;
    }
    let is_indirect = line.contains("// indirect");
    let without_comment = line.split("//").next().unwrap_or(line).trim();
    let mut parts = without_comment.split_whitespace();
    let Some(name) = parts.next() else { return };
    let version = parts.next().unwrap_or("");
    let dep = Dependency::with_version(name, version);
    if is_indirect {
        indirect.push(dep);
    } else {
        direct.push(dep);
    }
}

// ── Node ────────────────────────────────────────────────────────────────────

/// Parses `package.json`'s `dependencies`/`devDependencies`, picking a
/// package manager by lockfile presence (spec.md §4.4).
pub fn parse_package_json(dir: &Path) -> Option<DepsReport> {
    let content = read(&dir.join("package.json"))?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;

    let package_manager = if dir.join("pnpm-lock.yaml").is_file() {
        "pnpm"
    } else if dir.join("yarn.lock").is_file() {
        "yarn"
    } else if dir.join("bun.lockb").is_file() {
        "bun"
    } else {
        "npm"
    };

    let dependencies = deps_object(&value, "dependencies");
    let dev_dependencies = deps_object(&value, "devDependencies");

    Some(DepsReport::Node {
        package_manager: package_manager.to_string(),
        dependencies,
        dev_dependencies,
    })
}

fn deps_object(value: &serde_json::Value, key: &str) -> Vec<Dependency> {
    value
        .get(key)
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .map(|(name, version)| {
                    Dependency::with_version(name.clone(), version.as_str().unwrap_or("").to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

// ── Python ──────────────────────────────────────────────────────────────────

const PY_VERSION_SPECIFIERS: &[&str] = &["==", ">=", "<=", "~=", "!=", ">", "<", "["];

/// Prefers `requirements.txt`; falls back to `pyproject.toml`'s
/// `[project].dependencies` array (spec.md §4.4).
pub fn parse_python_deps(dir: &Path) -> Option<DepsReport> {
    if let Some(content) = read(&dir.join("requirements.txt")) {
        let dependencies = content
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| Dependency::new(strip_py_specifier(l)))
            .collect();
        return Some(DepsReport::Python { dependencies });
    }

    let content = read(&dir.join("pyproject.toml"))?;
    let doc: toml::Value = content.parse().ok()?;
    let dependencies = doc
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .map(|s| Dependency::new(strip_py_specifier(s)))
                .collect()
        })
        .unwrap_or_default();
    Some(DepsReport::Python { dependencies })
}

fn strip_py_specifier(entry: &str) -> String {
    let mut end = entry.len();
    for spec in PY_VERSION_SPECIFIERS {
        if let Some(idx) = entry.find(spec) {
            end = end.min(idx);
        }
    }
    entry[..end].trim().to_string()
}

// ── Rust ────────────────────────────────────────────────────────────────────

/// Parses `Cargo.toml`'s `[package]` name and `[dependencies]` keys
/// (spec.md §4.4).
pub fn parse_cargo_toml(dir: &Path) -> Option<DepsReport> {
    let content = read(&dir.join("Cargo.toml"))?;
    let doc: toml::Value = content.parse().ok()?;

    let package_name = doc
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .map(|s| s.to_string());

    let dependencies = doc
        .get("dependencies")
        .and_then(|d| d.as_table())
        .map(|table| {
            table
                .iter()
                .map(|(name, spec)| {
                    let version = match spec {
                        toml::Value::String(v) => Some(v.clone()),
                        toml::Value::Table(t) => t
                            .get("version")
                            .and_then(|v| v.as_str())
                            .map(|s| s.to_string()),
                        _ => None,
                    };
                    match version {
                        Some(v) => Dependency::with_version(name.clone(), v),
                        None => Dependency::new(name.clone()),
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    Some(DepsReport::Rust {
        package_name,
        dependencies,
    })
}

// ── Java ────────────────────────────────────────────────────────────────────

/// `pom.xml` `<dependency><artifactId>` extraction, or a regex scan of a
/// Gradle build file for configuration-prefixed coordinates (spec.md §4.4).
pub fn parse_java_deps(dir: &Path) -> Option<DepsReport> {
    if let Some(content) = read(&dir.join("pom.xml")) {
        let re = regex::Regex::new(r"<artifactId>([^<]+)</artifactId>").ok()?;
        let dependencies = re
            .captures_iter(&content)
            .map(|c| Dependency::new(c[1].to_string()))
            .collect();
        return Some(DepsReport::Java { dependencies });
    }

    for gradle_file in ["build.gradle", "build.gradle.kts"] {
        if let Some(content) = read(&dir.join(gradle_file)) {
            let re = regex::Regex::new(
                r#"(?:implementation|api|compileOnly|runtimeOnly|testImplementation)\s*[\('"]+([^'")]+)"#,
            )
            .ok()?;
            let dependencies = re
                .captures_iter(&content)
                .map(|c| Dependency::new(c[1].trim().to_string()))
                .collect();
            return Some(DepsReport::Java { dependencies });
        }
    }
    None
}

// ── Ruby ────────────────────────────────────────────────────────────────────

/// Regex `^\s*gem\s+['"](.+?)['"]` over each line of `Gemfile` (spec.md §4.4).
pub fn parse_gemfile(dir: &Path) -> Option<DepsReport> {
    let content = read(&dir.join("Gemfile"))?;
    let re = regex::Regex::new(r#"^\s*gem\s+['"](.+?)['"]"#).ok()?;
    let gems = content
        .lines()
        .filter_map(|line| re.captures(line).map(|c| Dependency::new(c[1].to_string())))
        .collect();
    Some(DepsReport::Ruby { gems })
}

// ── PHP ─────────────────────────────────────────────────────────────────────

/// `composer.json`'s `require` object, excluding `php` and `ext-*` entries
/// (spec.md §4.4).
pub fn parse_composer_json(dir: &Path) -> Option<DepsReport> {
    let content = read(&dir.join("composer.json"))?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    let dependencies = value
        .get("require")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter(|(name, _)| *name != "php" && !name.starts_with("ext-"))
                .map(|(name, version)| {
                    Dependency::with_version(name.clone(), version.as_str().unwrap_or("").to_string())
                })
                .collect()
        })
        .unwrap_or_default();
    Some(DepsReport::Php { dependencies })
}

// ── .NET ────────────────────────────────────────────────────────────────────

/// First `*.csproj` in the directory; `<PackageReference Include="...">`
/// extraction (spec.md §4.4).
pub fn parse_csproj(dir: &Path) -> Option<DepsReport> {
    let entries = std::fs::read_dir(dir).ok()?;
    let csproj = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().and_then(|e| e.to_str()) == Some("csproj"))?;
    let content = read(&csproj)?;
    let re = regex::Regex::new(r#"<PackageReference\s+Include="([^"]+)""#).ok()?;
    let packages = re
        .captures_iter(&content)
        .map(|c| Dependency::new(c[1].to_string()))
        .collect();
    Some(DepsReport::DotNet { packages })
}

/// Runs every ecosystem parser against `dir`, collecting whichever manifests
/// are present. A manifest's parse failure drops just that entry.
pub fn parse_all(dir: &Path) -> Vec<DepsReport> {
    [
        parse_go_mod(dir),
        parse_package_json(dir),
        parse_python_deps(dir),
        parse_cargo_toml(dir),
        parse_java_deps(dir),
        parse_gemfile(dir),
        parse_composer_json(dir),
        parse_csproj(dir),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// ── Framework detection ──────────────────────────────────────────────────────

const GO_FRAMEWORKS: &[&str] = &[
    "github.com/spf13/cobra",
    "github.com/go-chi/chi",
    "github.com/gin-gonic/gin",
    "github.com/labstack/echo",
    "github.com/gofiber/fiber",
    "google.golang.org/grpc",
    "gorm.io/gorm",
    "entgo.io/ent",
    "github.com/charmbracelet/bubbletea",
];

const NODE_FRAMEWORKS: &[&str] = &[
    "react",
    "next",
    "vue",
    "nuxt",
    "svelte",
    "express",
    "fastify",
    "@nestjs/core",
    "@angular/core",
];

/// Intersects parsed direct (Go) or dependencies∪devDependencies (Node)
/// entries against the fixed allow-list (spec.md §4.4).
pub fn detect_frameworks(report: &DepsReport) -> Vec<String> {
    match report {
        DepsReport::Go { direct, .. } => direct
            .iter()
            .filter(|d| GO_FRAMEWORKS.contains(&d.name.as_str()))
            .map(|d| friendly_name(&d.name))
            .collect(),
        DepsReport::Node {
            dependencies,
            dev_dependencies,
            ..
        } => dependencies
            .iter()
            .chain(dev_dependencies.iter())
            .filter(|d| NODE_FRAMEWORKS.contains(&d.name.as_str()))
            .map(|d| friendly_name(&d.name))
            .collect(),
        _ => Vec::new(),
    }
}

fn friendly_name(coordinate: &str) -> String {
    coordinate
        .rsplit('/')
        .next()
        .unwrap_or(coordinate)
        .trim_start_matches('@')
        .to_string()
}
