//! Parses the text/simple tree format produced by [`super::format::format_text`]
//! back into a [`super::node::Arena`] (spec.md §4.6 "Parser" — round-trips
//! `gen` output back into a graph so `twig create` can materialize it).
use super::node::{Arena, NodeData};
use crate::error::{Result, ToolboxError};

/// One line of input, reduced to its indent depth and decorated label.
struct ParsedLine {
    depth: usize,
    is_dir: bool,
    name: String,
    hash: Option<String>,
    comment: Option<String>,
}

fn parse_line(raw: &str) -> Result<ParsedLine> {
    let mut depth = 0;
    let mut rest = raw;
    loop {
        if let Some(stripped) = rest.strip_prefix("│   ").or_else(|| rest.strip_prefix("    ")) {
            depth += 1;
            rest = stripped;
            continue;
        }
        break;
    }

    let rest = rest
        .strip_prefix("├── ")
        .or_else(|| rest.strip_prefix("└── "))
        .unwrap_or(rest);

    if rest.is_empty() {
        return Err(ToolboxError::Parse("empty node label".to_string()));
    }

    let mut label = rest.to_string();

    let comment = if let Some(idx) = label.find(" # ") {
        let comment = label[idx + 3..].trim().to_string();
        label.truncate(idx);
        Some(comment)
    } else {
        None
    };

    let hash = if let Some(start) = label.rfind(" [") {
        if label.ends_with(']') {
            let hash = label[start + 2..label.len() - 1].to_string();
            label.truncate(start);
            Some(hash)
        } else {
            None
        }
    } else {
        None
    };

    let is_dir = label.ends_with('/');
    if is_dir {
        label.pop();
    }

    if label.is_empty() {
        return Err(ToolboxError::Parse(format!("could not extract a name from {raw:?}")));
    }

    Ok(ParsedLine {
        depth,
        is_dir,
        name: label,
        hash,
        comment,
    })
}

/// Parses `text` (as produced by `format_text`) into an [`Arena`], returning
/// the root node id. The first non-empty line is always the root, at
/// depth 0 regardless of indentation (spec.md §4.6 "Parser").
pub fn parse(text: &str) -> Result<(Arena, usize)> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let root_label = lines
        .next()
        .ok_or_else(|| ToolboxError::Parse("empty tree text".to_string()))?;
    let root_parsed = parse_line(root_label)?;

    let mut arena = Arena::new();
    let root_id = arena.push(NodeData {
        name: root_parsed.name,
        path: String::new(),
        is_dir: true,
        hash: root_parsed.hash,
        comment: root_parsed.comment,
        level: 0,
        children: Vec::new(),
        parent: None,
    });

    // last_at_depth[d] is the arena id of the most recently emitted node at
    // depth d+1 (0-indexed here as depth-1, since depth 0 is always root).
    let mut last_at_depth: Vec<usize> = vec![root_id];

    for raw in lines {
        let parsed = parse_line(raw)?;
        let level = parsed.depth + 1;

        if level > last_at_depth.len() {
            return Err(ToolboxError::Parse(format!(
                "line {raw:?} jumps more than one indent level"
            )));
        }
        last_at_depth.truncate(level);
        let parent = last_at_depth[level - 1];

        let id = arena.push(NodeData {
            name: parsed.name,
            path: String::new(),
            is_dir: parsed.is_dir,
            hash: parsed.hash,
            comment: parsed.comment,
            level,
            children: Vec::new(),
            parent: None,
        });
        arena.attach(parent, id);
        last_at_depth.push(id);
    }

    fill_paths(&mut arena, root_id, "");
    Ok((arena, root_id))
}

fn fill_paths(arena: &mut Arena, id: usize, parent_path: &str) {
    let name = arena.get(id).name.clone();
    let path = if parent_path.is_empty() {
        name.clone()
    } else {
        format!("{parent_path}/{name}")
    };
    arena.get_mut(id).path = path.clone();
    let children = arena.get(id).children.clone();
    for child in children {
        fill_paths(arena, child, &path);
    }
}

#[cfg(test)]
mod tests {
    use super::super::format::{format_text, FormatConfig};
    use super::*;

    #[test]
    fn round_trips_generated_text_back_into_same_shape() {
        let mut arena = Arena::new();
        let root = arena.push(NodeData {
            name: "project".to_string(),
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
            name: "main.go".to_string(),
            path: String::new(),
            is_dir: false,
            hash: None,
            comment: None,
            level: 2,
            children: Vec::new(),
            parent: None,
        });
        let readme = arena.push(NodeData {
            name: "README.md".to_string(),
            path: String::new(),
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

        let text = format_text(&arena, root, &FormatConfig::default());
        let (parsed_arena, parsed_root) = parse(&text).unwrap();

        assert_eq!(parsed_arena.get(parsed_root).name, "project");
        assert_eq!(parsed_arena.get(parsed_root).children.len(), 2);

        let parsed_src = parsed_arena.get(parsed_arena.get(parsed_root).children[0]);
        assert_eq!(parsed_src.name, "src");
        assert!(parsed_src.is_dir);
        assert_eq!(parsed_src.children.len(), 1);

        let parsed_main = parsed_arena.get(parsed_src.children[0]);
        assert_eq!(parsed_main.name, "main.go");
        assert!(!parsed_main.is_dir);
    }

    #[test]
    fn extracts_hash_and_comment_decorations() {
        let text = "root/\n└── file.txt [abc123def456] # generated\n";
        let (arena, root) = parse(text).unwrap();
        let file = arena.get(arena.get(root).children[0]);
        assert_eq!(file.name, "file.txt");
        assert_eq!(file.hash.as_deref(), Some("abc123def456"));
        assert_eq!(file.comment.as_deref(), Some("generated"));
    }

    #[test]
    fn rejects_indent_jump_of_more_than_one_level() {
        let text = "root/\n│   │   └── too-deep.txt\n";
        assert!(parse(text).is_err());
    }
}
