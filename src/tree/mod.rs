//! TreeCore ("twig") — scan a directory into an in-memory tree, render it
//! as text/JSON/NDJSON, and reconstruct a directory layout from rendered
//! text (spec.md §4.6).
pub mod build;
pub mod format;
pub mod node;
pub mod parse;
pub mod scan;

pub use build::{build, BuildConfig, BuildResult, OverwritePolicy};
pub use format::{format_json, format_ndjson, format_text, FormatConfig};
pub use node::{compute_stats, Arena, NodeData, NodeView, TreeStats};
pub use parse::parse;
pub use scan::{scan, ScanConfig};

use crate::error::Result;
use std::path::Path;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Ndjson,
}

/// Scans `root` and renders it in one shot — the non-streaming half of
/// `twig gen` (spec.md §4.6). For NDJSON framing under true streaming
/// (nodes emitted as they're discovered rather than after a full scan),
/// callers compose [`scan::scan`] and [`format::format_ndjson`] directly.
pub fn generate(root: &Path, scan_config: &ScanConfig, output: OutputFormat) -> Result<String> {
    let cancel = CancellationToken::new();
    let (arena, root_id) = scan(root, scan_config, &cancel)?;
    let stats = compute_stats(&arena, root_id);

    Ok(match output {
        OutputFormat::Text => format_text(&arena, root_id, &FormatConfig::default()),
        OutputFormat::Json => format_json(&arena, root_id, &stats).to_string(),
        OutputFormat::Ndjson => format_ndjson(&arena, root_id, Some(&stats)),
    })
}

/// Parses rendered tree text and materializes it under `target` — the
/// `twig create` pipeline (spec.md §4.6 "Parser" → "Builder").
pub fn materialize_from_text(text: &str, target: &Path, config: &BuildConfig) -> Result<BuildResult> {
    let (arena, root_id) = parse(text)?;
    build::ensure_target_usable(target, config.overwrite)?;
    build(config, &arena, root_id, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn generate_text_then_materialize_round_trips_shape() {
        let source = tempfile::tempdir().unwrap();
        fs::create_dir_all(source.path().join("src")).unwrap();
        fs::write(source.path().join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(source.path().join("README.md"), "hi").unwrap();

        let text = generate(source.path(), &ScanConfig::default(), OutputFormat::Text).unwrap();

        let dest = tempfile::tempdir().unwrap();
        let target = dest.path().join("rebuilt");
        let result = materialize_from_text(&text, &target, &BuildConfig::default()).unwrap();

        assert!(result.errors.is_empty());
        assert!(target.join("src").is_dir());
        assert!(target.join("src/main.rs").is_file());
        assert!(target.join("README.md").is_file());
    }

    #[test]
    fn generate_json_embeds_stats_and_tree() {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("a.txt"), "x").unwrap();

        let out = generate(source.path(), &ScanConfig::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["tree"]["children"].is_array());
        assert_eq!(value["stats"]["total_files"], 1);
    }
}
