//! Dispatcher handlers for `toolbox project ...` (spec.md §6), wiring CLI
//! tokens onto [`crate::analyzer::analyze`].
use crate::analyzer::types::{DepsReport, ProjectReport};
use crate::analyzer::{self};
use crate::error::Result;
use std::path::PathBuf;

fn resolve_path(path: Option<String>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."))
}

pub fn info(path: Option<String>, json: bool, markdown: bool) -> Result<String> {
    let report = analyzer::analyze(&resolve_path(path))?;
    Ok(if json {
        serde_json::to_string_pretty(&report)?
    } else if markdown {
        render_info_markdown(&report)
    } else {
        render_info_text(&report)
    })
}

pub fn deps(path: Option<String>, json: bool, markdown: bool) -> Result<String> {
    let report = analyzer::analyze(&resolve_path(path))?;
    Ok(if json {
        serde_json::to_string_pretty(&report.deps)?
    } else if markdown {
        render_deps_markdown(&report.deps)
    } else {
        render_deps_text(&report.deps)
    })
}

pub fn health(path: Option<String>, json: bool) -> Result<String> {
    let report = analyzer::analyze(&resolve_path(path))?;
    Ok(if json {
        serde_json::to_string_pretty(&report.health)?
    } else {
        let mut out = format!("score: {}  grade: {}\n", report.health.score, report.health.grade);
        for check in &report.health.checks {
            let mark = if check.passed { "✓" } else { "✗" };
            out.push_str(&format!(
                "  {mark} {} ({}/{}) {}\n",
                check.name, check.points, check.max_pts, check.details
            ));
        }
        out
    })
}

fn render_info_text(report: &ProjectReport) -> String {
    let mut out = format!("{}\n", report.root);
    for pt in &report.project_types {
        out.push_str(&format!("  type: {} ({})\n", pt.language, pt.build_file));
        if !pt.frameworks.is_empty() {
            out.push_str(&format!("    frameworks: {}\n", pt.frameworks.join(", ")));
        }
    }
    out.push_str("  languages:\n");
    for lang in &report.languages {
        out.push_str(&format!("    {} ({} files)\n", lang.name, lang.file_count));
    }
    out.push_str(&format!(
        "  git: repo={} branch={:?} clean={}\n",
        report.git.is_repo, report.git.branch, report.git.clean
    ));
    out.push_str(&format!(
        "  docs: readme={} license={:?}\n",
        report.docs.has_readme, report.docs.license_type
    ));
    out.push_str(&format!(
        "  health: {} ({})\n",
        report.health.score, report.health.grade
    ));
    out
}

fn render_info_markdown(report: &ProjectReport) -> String {
    let mut out = format!("# {}\n\n", report.root);
    out.push_str("## Languages\n\n");
    for lang in &report.languages {
        out.push_str(&format!("- **{}**: {} files\n", lang.name, lang.file_count));
    }
    out.push_str(&format!(
        "\n## Health\n\nScore: {} (grade {})\n",
        report.health.score, report.health.grade
    ));
    out
}

fn render_deps_text(reports: &[DepsReport]) -> String {
    let mut out = String::new();
    for report in reports {
        match report {
            DepsReport::Go { module, go_version, direct, indirect, total } => {
                out.push_str(&format!("go: {module} (go {go_version}) — {total} deps ({} direct, {} indirect)\n", direct.len(), indirect.len()));
            }
            DepsReport::Node { package_manager, dependencies, dev_dependencies } => {
                out.push_str(&format!(
                    "node ({package_manager}): {} deps, {} dev deps\n",
                    dependencies.len(),
                    dev_dependencies.len()
                ));
            }
            DepsReport::Python { dependencies } => {
                out.push_str(&format!("python: {} deps\n", dependencies.len()));
            }
            DepsReport::Rust { package_name, dependencies } => {
                out.push_str(&format!(
                    "rust ({}): {} deps\n",
                    package_name.as_deref().unwrap_or("unnamed"),
                    dependencies.len()
                ));
            }
            DepsReport::Java { dependencies } => {
                out.push_str(&format!("java: {} deps\n", dependencies.len()));
            }
            DepsReport::Ruby { gems } => {
                out.push_str(&format!("ruby: {} gems\n", gems.len()));
            }
            DepsReport::Php { dependencies } => {
                out.push_str(&format!("php: {} deps\n", dependencies.len()));
            }
            DepsReport::DotNet { packages } => {
                out.push_str(&format!(".net: {} packages\n", packages.len()));
            }
        }
    }
    if out.is_empty() {
        out.push_str("(no recognized manifests)\n");
    }
    out
}

fn render_deps_markdown(reports: &[DepsReport]) -> String {
    let mut out = String::from("# Dependencies\n\n");
    out.push_str(&render_deps_text(reports).lines().map(|l| format!("- {l}\n")).collect::<String>());
    out
}
