//! Builder — materializes an [`Arena`] onto the filesystem (spec.md §4.6
//! "Builder", backing `twig create`).
use super::node::Arena;
use crate::error::{Result, ToolboxError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Existing files/dirs are left untouched; no error.
    Skip,
    /// Existing files are truncated and rewritten.
    Overwrite,
    /// Any existing path on disk is a hard error.
    Fail,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub overwrite: OverwritePolicy,
    pub dry_run: bool,
    #[cfg(unix)]
    pub dir_mode: u32,
    #[cfg(unix)]
    pub file_mode: u32,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            overwrite: OverwritePolicy::Skip,
            dry_run: false,
            #[cfg(unix)]
            dir_mode: 0o755,
            #[cfg(unix)]
            file_mode: 0o644,
        }
    }
}

#[derive(Debug, Default)]
pub struct BuildResult {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Materializes `arena` rooted at `root` under `target`. Directory nodes
/// become directories; file nodes become empty placeholder files stamped
/// with the node's comment (if any) as their sole content line — twig never
/// reconstructs original file bytes, only the shape (spec.md §4.6 "Builder
/// never invents file content").
pub fn build(config: &BuildConfig, arena: &Arena, root: usize, target: &Path) -> Result<BuildResult> {
    tracing::debug!(target = %target.display(), dry_run = config.dry_run, "materializing tree onto filesystem");
    let mut result = BuildResult::default();
    build_node(config, arena, root, target, &mut result);
    tracing::debug!(
        created = result.created.len(),
        skipped = result.skipped.len(),
        errors = result.errors.len(),
        "materialize complete"
    );
    Ok(result)
}

fn build_node(config: &BuildConfig, arena: &Arena, id: usize, path: &Path, result: &mut BuildResult) {
    let node = arena.get(id);
    let exists = path.exists();

    if exists && config.overwrite == OverwritePolicy::Fail {
        result
            .errors
            .push((path.to_path_buf(), "path already exists".to_string()));
        return;
    }

    if node.is_dir {
        if exists && config.overwrite == OverwritePolicy::Skip {
            result.skipped.push(path.to_path_buf());
        } else if !config.dry_run {
            if let Err(e) = std::fs::create_dir_all(path) {
                result.errors.push((path.to_path_buf(), e.to_string()));
                return;
            }
            apply_dir_mode(config, path);
            result.created.push(path.to_path_buf());
        } else {
            result.created.push(path.to_path_buf());
        }

        for &child_id in &node.children {
            let child_name = &arena.get(child_id).name;
            build_node(config, arena, child_id, &path.join(child_name), result);
        }
    } else {
        if exists && config.overwrite == OverwritePolicy::Skip {
            result.skipped.push(path.to_path_buf());
            return;
        }
        if config.dry_run {
            result.created.push(path.to_path_buf());
            return;
        }
        let contents = node.comment.clone().unwrap_or_default();
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                result.errors.push((path.to_path_buf(), e.to_string()));
                return;
            }
        }
        if let Err(e) = std::fs::write(path, contents) {
            result.errors.push((path.to_path_buf(), e.to_string()));
            return;
        }
        apply_file_mode(config, path);
        result.created.push(path.to_path_buf());
    }
}

#[cfg(unix)]
fn apply_dir_mode(config: &BuildConfig, path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(config.dir_mode));
}

#[cfg(not(unix))]
fn apply_dir_mode(_config: &BuildConfig, _path: &Path) {}

#[cfg(unix)]
fn apply_file_mode(config: &BuildConfig, path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(config.file_mode));
}

#[cfg(not(unix))]
fn apply_file_mode(_config: &BuildConfig, _path: &Path) {}

/// Rejects a target that already contains entries unless the caller intends
/// to overwrite or skip them — a guard against accidental destructive
/// materialization into a populated directory.
pub fn ensure_target_usable(target: &Path, overwrite: OverwritePolicy) -> Result<()> {
    if overwrite == OverwritePolicy::Fail && target.exists() {
        let has_entries = std::fs::read_dir(target)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if has_entries {
            return Err(ToolboxError::AlreadyExists(target.display().to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::node::NodeData;
    use super::*;

    fn sample_arena() -> (Arena, usize) {
        let mut arena = Arena::new();
        let root = arena.push(NodeData {
            name: "proj".to_string(),
            path: String::new(),
            is_dir: true,
            hash: None,
            comment: None,
            level: 0,
            children: Vec::new(),
            parent: None,
        });
        let src = arena.push(NodeData {
            name: "src".to_string(),
            path: String::new(),
            is_dir: true,
            hash: None,
            comment: None,
            level: 1,
            children: Vec::new(),
            parent: None,
        });
        let main = arena.push(NodeData {
            name: "main.rs".to_string(),
            path: String::new(),
            is_dir: false,
            hash: None,
            comment: None,
            level: 2,
            children: Vec::new(),
            parent: None,
        });
        arena.attach(root, src);
        arena.attach(src, main);
        (arena, root)
    }

    #[test]
    fn creates_nested_directories_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let (arena, root) = sample_arena();
        let target = dir.path().join("proj");

        let result = build(&BuildConfig::default(), &arena, root, &target).unwrap();
        assert!(result.errors.is_empty());
        assert!(target.join("src").is_dir());
        assert!(target.join("src/main.rs").is_file());
        assert_eq!(result.created.len(), 3);
    }

    #[test]
    fn skip_policy_leaves_existing_files_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (arena, root) = sample_arena();
        let target = dir.path().join("proj");
        std::fs::create_dir_all(target.join("src")).unwrap();
        std::fs::write(target.join("src/main.rs"), "untouched").unwrap();

        let result = build(&BuildConfig::default(), &arena, root, &target).unwrap();
        let contents = std::fs::read_to_string(target.join("src/main.rs")).unwrap();
        assert_eq!(contents, "untouched");
        assert!(result.skipped.iter().any(|p| p.ends_with("main.rs")));
    }

    #[test]
    fn dry_run_creates_nothing_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let (arena, root) = sample_arena();
        let target = dir.path().join("proj");

        let config = BuildConfig {
            dry_run: true,
            ..BuildConfig::default()
        };
        let result = build(&config, &arena, root, &target).unwrap();
        assert!(!target.exists());
        assert_eq!(result.created.len(), 3);
    }

    #[test]
    fn fail_policy_rejects_populated_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(&dir.path().join("existing")).unwrap();
        std::fs::write(dir.path().join("existing/file.txt"), "x").unwrap();

        let err = ensure_target_usable(&dir.path().join("existing"), OverwritePolicy::Fail).unwrap_err();
        assert!(matches!(err, ToolboxError::AlreadyExists(_)));
    }
}
