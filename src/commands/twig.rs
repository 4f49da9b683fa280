//! Dispatcher handlers for `toolbox twig ...` (spec.md §6), wiring CLI
//! tokens onto TreeCore's scan/format/parse/build pipeline.
use crate::error::{Result, ToolboxError};
use crate::tree::{self, BuildConfig, OutputFormat, OverwritePolicy, ScanConfig};
use std::io::Read;
use std::path::{Path, PathBuf};

#[allow(clippy::too_many_arguments)]
pub fn gen(
    path: &str,
    json: bool,
    ndjson: bool,
    depth: Option<i64>,
    hidden: bool,
    hash: bool,
) -> Result<String> {
    let root = Path::new(path);
    let config = ScanConfig {
        max_depth: depth.unwrap_or(-1),
        show_hidden: hidden,
        show_hash: hash,
        ..ScanConfig::default()
    };

    let output_format = if json {
        OutputFormat::Json
    } else if ndjson {
        OutputFormat::Ndjson
    } else {
        OutputFormat::Text
    };

    tree::generate(root, &config, output_format)
}

/// Materializes a rendered tree (read from `from` or stdin) under
/// `target_path`. Refuses to overwrite an already-populated target.
pub fn create(from: Option<String>, target_path: &str) -> Result<String> {
    let text = match from {
        Some(path) => std::fs::read_to_string(path).map_err(ToolboxError::Io)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(ToolboxError::Io)?;
            buf
        }
    };

    let target: PathBuf = PathBuf::from(target_path);
    let config = BuildConfig {
        overwrite: OverwritePolicy::Fail,
        ..BuildConfig::default()
    };
    let result = tree::materialize_from_text(&text, &target, &config)?;

    if !result.errors.is_empty() {
        let details = result
            .errors
            .iter()
            .map(|(path, err)| format!("{}: {err}", path.display()))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ToolboxError::External(details));
    }

    Ok(format!("created {} entries", result.created.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn gen_text_lists_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();

        let out = gen(dir.path().to_str().unwrap(), false, false, None, false, false).unwrap();
        assert!(out.contains("a.txt"));
    }

    #[test]
    fn create_refuses_populated_target() {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("a.txt"), "x").unwrap();
        let text = gen(source.path().to_str().unwrap(), false, false, None, false, false).unwrap();

        let dest = tempfile::tempdir().unwrap();
        fs::write(dest.path().join("existing.txt"), "y").unwrap();

        let text_file = dest.path().join("tree.txt");
        fs::write(&text_file, text).unwrap();

        let err = create(Some(text_file.display().to_string()), dest.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ToolboxError::AlreadyExists(_)));
    }
}
