//! Parallel directory scanner (spec.md §4.6 "Scanner").
use super::node::{Arena, NodeData};
use crate::error::{Result, ToolboxError};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Directories pruned unless `ignore_patterns` (or an explicit need to see
/// them) overrides this — same default set as AnalyzerCore's language
/// counter (spec.md §4.6).
const DEFAULT_IGNORE: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "__pycache__",
    ".idea",
    ".vscode",
    "target",
    "build",
    "dist",
    "bin",
    ".next",
    ".nuxt",
];

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// -1 = unlimited. Depth 0 is the root itself.
    pub max_depth: i64,
    pub show_hidden: bool,
    pub dirs_only: bool,
    pub show_hash: bool,
    pub ignore_patterns: Vec<String>,
    pub max_files: usize,
    pub parallel: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: -1,
            show_hidden: false,
            dirs_only: false,
            show_hash: false,
            ignore_patterns: Vec::new(),
            max_files: usize::MAX,
            parallel: 1,
        }
    }
}

/// A plain recursive owned tree, built without arena indices so that
/// independent subtrees can be constructed on separate worker threads and
/// merged afterward (materialized into the shared [`Arena`] by the caller).
struct RawNode {
    name: String,
    path: PathBuf,
    is_dir: bool,
    hash: Option<String>,
    children: Vec<RawNode>,
}

fn build_ignore_set(patterns: &[String]) -> Result<globset::GlobSet> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::Glob::new(pattern)
            .map_err(|e| ToolboxError::Usage(format!("invalid ignore pattern {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ToolboxError::Usage(format!("invalid ignore pattern set: {e}")))
}

fn hash_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = format!("{:x}", hasher.finalize());
    tracing::trace!(path = %path.display(), %digest, "hashed file");
    Ok(digest)
}

fn should_skip(name: &str, show_hidden: bool, ignore: &globset::GlobSet) -> bool {
    if !show_hidden && name.starts_with('.') {
        return true;
    }
    if ignore.is_match(name) {
        return true;
    }
    if !show_hidden && DEFAULT_IGNORE.contains(&name) {
        return true;
    }
    false
}

/// Sorted directory-before-file, then alphabetical — the stable ordering
/// rule required by spec.md §4.6 to keep output deterministic under
/// parallel scanning.
fn sorted_entries(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by(|a, b| {
        let a_dir = a.path().is_dir();
        let b_dir = b.path().is_dir();
        b_dir.cmp(&a_dir).then_with(|| a.file_name().cmp(&b.file_name()))
    });
    Ok(entries)
}

fn build_raw(
    path: &Path,
    depth: i64,
    config: &ScanConfig,
    ignore: &globset::GlobSet,
    file_count: &AtomicUsize,
    cancel: &CancellationToken,
) -> Result<Option<RawNode>> {
    if cancel.is_cancelled() {
        return Err(ToolboxError::Cancelled);
    }

    let metadata = std::fs::symlink_metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if metadata.is_dir() {
        let mut children = Vec::new();
        if config.max_depth < 0 || depth < config.max_depth {
            let entries = sorted_entries(path)?;
            for entry in entries {
                let entry_name = entry.file_name().to_string_lossy().to_string();
                if should_skip(&entry_name, config.show_hidden, ignore) {
                    continue;
                }
                let child_path = entry.path();
                let is_file = child_path.is_file();
                if is_file && config.dirs_only {
                    continue;
                }
                if is_file && file_count.load(Ordering::Relaxed) >= config.max_files {
                    continue;
                }
                if let Some(child) = build_raw(&child_path, depth + 1, config, ignore, file_count, cancel)? {
                    if !child.is_dir {
                        file_count.fetch_add(1, Ordering::Relaxed);
                    }
                    children.push(child);
                }
            }
        }
        Ok(Some(RawNode {
            name,
            path: path.to_path_buf(),
            is_dir: true,
            hash: None,
            children,
        }))
    } else if metadata.is_file() {
        let hash = if config.show_hash { Some(hash_file(path)?) } else { None };
        Ok(Some(RawNode {
            name,
            path: path.to_path_buf(),
            is_dir: false,
            hash,
            children: Vec::new(),
        }))
    } else {
        Ok(None)
    }
}

/// Builds the root node. When `config.parallel > 1` and the root has more
/// than one subdirectory, fans enumeration of those subdirectories out
/// across up to `parallel` worker threads (spec.md §4.6 "Parallelism").
/// Each worker recurses single-threaded within its assigned subtree; the
/// parent reassembles children in the same deterministic sorted order
/// regardless of which worker finishes first.
fn build_raw_root(
    path: &Path,
    config: &ScanConfig,
    ignore: &globset::GlobSet,
    file_count: &AtomicUsize,
    cancel: &CancellationToken,
) -> Result<RawNode> {
    let metadata = std::fs::symlink_metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    if !metadata.is_dir() {
        let hash = if config.show_hash { Some(hash_file(path)?) } else { None };
        return Ok(RawNode {
            name,
            path: path.to_path_buf(),
            is_dir: false,
            hash,
            children: Vec::new(),
        });
    }

    let at_depth_limit = config.max_depth == 0;
    if at_depth_limit {
        return Ok(RawNode {
            name,
            path: path.to_path_buf(),
            is_dir: true,
            hash: None,
            children: Vec::new(),
        });
    }

    let entries = sorted_entries(path)?;
    let filtered: Vec<std::fs::DirEntry> = entries
        .into_iter()
        .filter(|e| {
            let entry_name = e.file_name().to_string_lossy().to_string();
            !should_skip(&entry_name, config.show_hidden, ignore)
        })
        .collect();

    let subdir_count = filtered.iter().filter(|e| e.path().is_dir()).count();

    let children: Vec<RawNode> = if config.parallel > 1 && subdir_count > 1 {
        scan_entries_parallel(&filtered, config, ignore, file_count, cancel)?
    } else {
        scan_entries_sequential(&filtered, config, ignore, file_count, cancel)?
    };

    Ok(RawNode {
        name,
        path: path.to_path_buf(),
        is_dir: true,
        hash: None,
        children,
    })
}

fn scan_entries_sequential(
    entries: &[std::fs::DirEntry],
    config: &ScanConfig,
    ignore: &globset::GlobSet,
    file_count: &AtomicUsize,
    cancel: &CancellationToken,
) -> Result<Vec<RawNode>> {
    let mut children = Vec::new();
    for entry in entries {
        let path = entry.path();
        let is_file = path.is_file();
        if is_file && config.dirs_only {
            continue;
        }
        if is_file && file_count.load(Ordering::Relaxed) >= config.max_files {
            continue;
        }
        if let Some(child) = build_raw(&path, 1, config, ignore, file_count, cancel)? {
            if !child.is_dir {
                file_count.fetch_add(1, Ordering::Relaxed);
            }
            children.push(child);
        }
    }
    Ok(children)
}

fn scan_entries_parallel(
    entries: &[std::fs::DirEntry],
    config: &ScanConfig,
    ignore: &globset::GlobSet,
    file_count: &AtomicUsize,
    cancel: &CancellationToken,
) -> Result<Vec<RawNode>> {
    let slots: Vec<Mutex<Option<Result<Option<RawNode>>>>> =
        (0..entries.len()).map(|_| Mutex::new(None)).collect();
    let next_index = AtomicUsize::new(0);
    let workers = config.parallel.min(entries.len()).max(1);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let idx = next_index.fetch_add(1, Ordering::SeqCst);
                if idx >= entries.len() {
                    break;
                }
                let entry = &entries[idx];
                let path = entry.path();
                let is_file = path.is_file();
                let result = if is_file && config.dirs_only {
                    Ok(None)
                } else if is_file && file_count.load(Ordering::Relaxed) >= config.max_files {
                    Ok(None)
                } else {
                    let result = build_raw(&path, 1, config, ignore, file_count, cancel);
                    if let Ok(Some(ref child)) = result {
                        if !child.is_dir {
                            file_count.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                    result
                };
                *slots[idx].lock().unwrap() = Some(result);
            });
        }
    });

    let mut children = Vec::with_capacity(entries.len());
    for slot in slots {
        match slot.into_inner().unwrap() {
            Some(Ok(Some(node))) => children.push(node),
            Some(Ok(None)) => {}
            Some(Err(e)) => return Err(e),
            None => unreachable!("every slot is filled by its assigned worker"),
        }
    }
    Ok(children)
}

fn materialize(arena: &mut Arena, raw: RawNode, level: usize, parent: Option<usize>) -> usize {
    let id = arena.push(NodeData {
        name: raw.name,
        path: raw.path.display().to_string(),
        is_dir: raw.is_dir,
        hash: raw.hash,
        comment: None,
        level,
        children: Vec::new(),
        parent,
    });
    for child in raw.children {
        let child_id = materialize(arena, child, level + 1, Some(id));
        arena.attach(id, child_id);
    }
    id
}

/// Scans `root`, returning the populated [`Arena`] and the root's node id.
pub fn scan(root: &Path, config: &ScanConfig, cancel: &CancellationToken) -> Result<(Arena, usize)> {
    tracing::debug!(root = %root.display(), parallel = config.parallel, "starting tree scan");
    let canonical = root
        .canonicalize()
        .map_err(|_| ToolboxError::NotFound(root.display().to_string()))?;
    let ignore = build_ignore_set(&config.ignore_patterns)?;
    let file_count = AtomicUsize::new(0);
    let raw = build_raw_root(&canonical, config, &ignore, &file_count, cancel)?;
    let mut arena = Arena::new();
    let root_id = materialize(&mut arena, raw, 0, None);
    tracing::debug!(files = file_count.load(Ordering::Relaxed), "tree scan complete");
    Ok((arena, root_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scans_nested_directory_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.go"), "package main").unwrap();
        fs::write(dir.path().join("README.md"), "hi").unwrap();

        let config = ScanConfig::default();
        let (arena, root) = scan(dir.path(), &config, &CancellationToken::new()).unwrap();

        let root_node = arena.get(root);
        assert!(root_node.is_dir);
        assert_eq!(root_node.children.len(), 2);

        // directories sort before files
        let first_child = arena.get(root_node.children[0]);
        assert!(first_child.is_dir);
        assert_eq!(first_child.name, "src");
    }

    #[test]
    fn respects_max_depth() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "x").unwrap();

        let config = ScanConfig {
            max_depth: 1,
            ..ScanConfig::default()
        };
        let (arena, root) = scan(dir.path(), &config, &CancellationToken::new()).unwrap();
        let root_node = arena.get(root);
        let a = arena.get(root_node.children[0]);
        assert_eq!(a.name, "a");
        assert!(a.children.is_empty(), "depth 1 should not descend into a/b");
    }

    #[test]
    fn hashes_file_content_with_sha256() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), "hello world").unwrap();
        let config = ScanConfig {
            show_hash: true,
            ..ScanConfig::default()
        };
        let (arena, root) = scan(dir.path(), &config, &CancellationToken::new()).unwrap();
        let file = arena.get(arena.get(root).children[0]);
        let expected = {
            let mut hasher = Sha256::new();
            hasher.update(b"hello world");
            format!("{:x}", hasher.finalize())
        };
        assert_eq!(file.hash.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn default_ignore_set_skips_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/dep.js"), "").unwrap();
        fs::write(dir.path().join("app.js"), "").unwrap();

        let (arena, root) = scan(dir.path(), &ScanConfig::default(), &CancellationToken::new()).unwrap();
        assert_eq!(arena.get(root).children.len(), 1);
    }

    #[test]
    fn parallel_scan_matches_sequential_scan() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b", "c"] {
            fs::create_dir_all(dir.path().join(name)).unwrap();
            fs::write(dir.path().join(name).join("file.txt"), name).unwrap();
        }

        let sequential = scan(dir.path(), &ScanConfig::default(), &CancellationToken::new()).unwrap();
        let parallel_config = ScanConfig {
            parallel: 4,
            ..ScanConfig::default()
        };
        let parallel = scan(dir.path(), &parallel_config, &CancellationToken::new()).unwrap();

        let names = |arena: &Arena, root: usize| -> Vec<String> {
            arena.get(root).children.iter().map(|&c| arena.get(c).name.clone()).collect()
        };
        assert_eq!(names(&sequential.0, sequential.1), names(&parallel.0, parallel.1));
    }
}
