//! Node/TreeStats data model for TreeCore (spec.md §3, §9).
//!
//! Ownership: the arena `Vec<NodeData>` is the sole owner of every node.
//! `parent` is a plain `usize` index — a relation, never a deallocation
//! path (spec.md §9 "Cyclic references in Node"). This sidesteps the
//! Rc/Weak ceremony the spec's ownership-strict-language note anticipates:
//! in Rust, an index into an owning `Vec` already can't form an ownership
//! cycle, so there's nothing further to guard against.
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct NodeData {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub hash: Option<String>,
    pub comment: Option<String>,
    pub level: usize,
    pub children: Vec<usize>,
    pub parent: Option<usize>,
}

/// Arena of nodes reachable from a single scan or parse. Index 0 is always
/// the root.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<NodeData>,
}

impl Arena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, data: NodeData) -> usize {
        self.nodes.push(data);
        self.nodes.len() - 1
    }

    pub fn get(&self, id: usize) -> &NodeData {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: usize) -> &mut NodeData {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends `child` to `parent`'s children and sets `child`'s parent
    /// back-reference.
    pub fn attach(&mut self, parent: usize, child: usize) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    pub fn iter_preorder(&self, root: usize) -> PreorderIter<'_> {
        PreorderIter {
            arena: self,
            stack: vec![root],
        }
    }

    /// A nested, owned snapshot suitable for JSON serialization. The
    /// parent back-reference is not carried into the view (spec.md §4.6
    /// "the parent back-reference is not serialized").
    pub fn to_view(&self, id: usize) -> NodeView {
        let n = self.get(id);
        NodeView {
            name: n.name.clone(),
            path: n.path.clone(),
            is_dir: n.is_dir,
            hash: n.hash.clone(),
            comment: n.comment.clone(),
            level: n.level,
            children: n.children.iter().map(|&c| self.to_view(c)).collect(),
        }
    }
}

pub struct PreorderIter<'a> {
    arena: &'a Arena,
    stack: Vec<usize>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let id = self.stack.pop()?;
        let node = self.arena.get(id);
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub level: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TreeStats {
    pub total_dirs: usize,
    pub total_files: usize,
    pub max_depth: usize,
    pub total_items: usize,
}

pub fn compute_stats(arena: &Arena, root: usize) -> TreeStats {
    let mut stats = TreeStats::default();
    for id in arena.iter_preorder(root) {
        let node = arena.get(id);
        if node.is_dir {
            stats.total_dirs += 1;
        } else {
            stats.total_files += 1;
        }
        stats.max_depth = stats.max_depth.max(node.level);
    }
    stats.total_items = stats.total_dirs + stats.total_files;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, level: usize) -> NodeData {
        NodeData {
            name: name.to_string(),
            path: name.to_string(),
            is_dir: false,
            hash: None,
            comment: None,
            level,
            children: Vec::new(),
            parent: None,
        }
    }

    #[test]
    fn preorder_visits_parent_before_children() {
        let mut arena = Arena::new();
        let root = arena.push(NodeData {
            is_dir: true,
            ..leaf("root", 0)
        });
        let child = arena.push(leaf("child.txt", 1));
        arena.attach(root, child);

        let order: Vec<usize> = arena.iter_preorder(root).collect();
        assert_eq!(order, vec![root, child]);
        assert_eq!(arena.get(child).parent, Some(root));
    }

    #[test]
    fn stats_count_dirs_and_files_and_max_depth() {
        let mut arena = Arena::new();
        let root = arena.push(NodeData {
            is_dir: true,
            ..leaf("root", 0)
        });
        let dir = arena.push(NodeData {
            is_dir: true,
            ..leaf("src", 1)
        });
        let file = arena.push(leaf("main.rs", 2));
        arena.attach(root, dir);
        arena.attach(dir, file);

        let stats = compute_stats(&arena, root);
        assert_eq!(stats.total_dirs, 2);
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.total_items, 3);
    }
}
