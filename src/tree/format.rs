//! Formatter — text/simple ASCII-art rendering, nested JSON, and
//! streaming NDJSON (spec.md §4.6 "Formatter").
use super::node::{Arena, TreeStats};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct FormatConfig {
    pub show_colors: bool,
    pub show_dir_slash: bool,
    pub show_size: bool,
    pub show_date: bool,
    pub show_hash: bool,
    pub flatten_files_hash: bool,
    pub json_output: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            show_colors: false,
            show_dir_slash: true,
            show_size: false,
            show_date: false,
            show_hash: false,
            flatten_files_hash: false,
            json_output: false,
        }
    }
}

/// Renders the ASCII box-drawing tree (spec.md §4.6 "Text / Simple
/// output"). `prefix` accumulates `│   `/`    ` continuation groups as the
/// walk descends; the caller always passes an empty prefix for the root.
pub fn format_text(arena: &Arena, root: usize, config: &FormatConfig) -> String {
    let mut out = String::new();
    let node = arena.get(root);
    writeln!(out, "{}", render_label(node, config)).unwrap();
    render_children(arena, root, "", config, &mut out);
    out
}

fn render_children(
    arena: &Arena,
    id: usize,
    prefix: &str,
    config: &FormatConfig,
    out: &mut String,
) {
    let children = &arena.get(id).children;
    for (i, &child_id) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let child = arena.get(child_id);
        writeln!(out, "{prefix}{connector}{}", render_label(child, config)).unwrap();

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        render_children(arena, child_id, &child_prefix, config, out);
    }
}

fn render_label(node: &super::node::NodeData, config: &FormatConfig) -> String {
    let mut label = node.name.clone();
    if node.is_dir && config.show_dir_slash {
        label.push('/');
    }
    if config.show_hash || config.flatten_files_hash {
        if let Some(hash) = &node.hash {
            let abbreviated = &hash[..hash.len().min(12)];
            write!(label, " [{abbreviated}]").unwrap();
        }
    }
    if let Some(comment) = &node.comment {
        write!(label, " # {comment}").unwrap();
    }
    label
}

/// `{ "tree": <nested-node>, "stats": <tree-stats> }` (spec.md §4.6 "JSON
/// output"). The parent back-reference is never part of [`super::node::NodeView`].
pub fn format_json(arena: &Arena, root: usize, stats: &TreeStats) -> serde_json::Value {
    json!({
        "tree": arena.to_view(root),
        "stats": stats,
    })
}

// `NodeData.children`/`parent` are arena indices, not serialization
// payload; a dedicated flatten-friendly shape keeps the stream contract
// to the fields spec.md §3 lists without leaking indices.
#[derive(Debug, Serialize)]
struct StreamNodeFields<'a> {
    name: &'a str,
    path: &'a str,
    is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: &'a Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: &'a Option<String>,
    level: usize,
}

/// Streaming NDJSON: `begin`, one `node` line per pre-order node, an
/// optional `stats` line, then `end` (spec.md §4.6 "Streaming NDJSON").
pub fn format_ndjson(arena: &Arena, root: usize, stats: Option<&TreeStats>) -> String {
    let mut out = String::new();
    writeln!(out, "{}", json!({"type": "begin"})).unwrap();

    for id in arena.iter_preorder(root) {
        let node = arena.get(id);
        let fields = StreamNodeFields {
            name: &node.name,
            path: &node.path,
            is_dir: node.is_dir,
            hash: &node.hash,
            comment: &node.comment,
            level: node.level,
        };
        let mut line = serde_json::to_value(&fields).unwrap();
        line.as_object_mut()
            .unwrap()
            .insert("type".to_string(), json!("node"));
        writeln!(out, "{line}").unwrap();
    }

    if let Some(stats) = stats {
        let mut line = serde_json::to_value(stats).unwrap();
        line.as_object_mut()
            .unwrap()
            .insert("type".to_string(), json!("stats"));
        writeln!(out, "{line}").unwrap();
    }

    writeln!(out, "{}", json!({"type": "end"})).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::super::node::{compute_stats, NodeData};
    use super::*;

    fn sample_arena() -> (Arena, usize) {
        let mut arena = Arena::new();
        let root = arena.push(NodeData {
            name: "project".to_string(),
            path: "/project".to_string(),
            is_dir: true,
            hash: None,
            comment: None,
            level: 0,
            children: Vec::new(),
            parent: None,
        });
        let src = arena.push(NodeData {
            name: "src".to_string(),
            path: "/project/src".to_string(),
            is_dir: true,
            hash: None,
            comment: None,
            level: 1,
            children: Vec::new(),
            parent: None,
        });
        let main = arena.push(NodeData {
            name: "main.go".to_string(),
            path: "/project/src/main.go".to_string(),
            is_dir: false,
            hash: None,
            comment: None,
            level: 2,
            children: Vec::new(),
            parent: None,
        });
        let readme = arena.push(NodeData {
            name: "README.md".to_string(),
            path: "/project/README.md".to_string(),
            is_dir: false,
            hash: None,
            comment: None,
            level: 1,
            children: Vec::new(),
            parent: None,
        });
        arena.attach(root, src);
        arena.attach(src, main);
        arena.attach(root, readme);
        (arena, root)
    }

    #[test]
    fn text_format_draws_last_branch_with_corner_connector() {
        let (arena, root) = sample_arena();
        let text = format_text(&arena, root, &FormatConfig::default());
        assert!(text.contains("├── src/"));
        assert!(text.contains("└── README.md"));
        assert!(text.contains("    └── main.go"));
    }

    #[test]
    fn json_format_nests_tree_and_includes_stats() {
        let (arena, root) = sample_arena();
        let stats = compute_stats(&arena, root);
        let value = format_json(&arena, root, &stats);
        assert_eq!(value["tree"]["name"], "project");
        assert_eq!(value["tree"]["children"][0]["name"], "src");
        assert_eq!(value["stats"]["total_files"], 2);
    }

    #[test]
    fn ndjson_frames_begin_node_stats_end() {
        let (arena, root) = sample_arena();
        let stats = compute_stats(&arena, root);
        let out = format_ndjson(&arena, root, Some(&stats));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.first().unwrap(), &r#"{"type":"begin"}"#);
        assert_eq!(lines.last().unwrap(), &r#"{"type":"end"}"#);

        let node_lines = lines.iter().filter(|l| l.contains(r#""type":"node""#)).count();
        assert_eq!(node_lines, stats.total_dirs + stats.total_files);

        for line in &lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(parsed["type"].is_string());
        }
    }
}
