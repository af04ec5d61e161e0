//! Parse trees kept in current-view coordinates.
//!
//! Nodes live in a generational [`Arena`]: replacing a re-parsed subtree
//! frees the old nodes, and any [`NodeKey`] still pointing at them stops
//! resolving instead of dangling.

mod arena;
mod builder;
mod grammar;
mod node;
mod path;
#[cfg(test)]
mod tests;

pub use arena::{Arena, Key};
pub use builder::{Builder, Subtree, SubtreeNode};
pub use grammar::{Grammar, Token};
pub use node::{Arity, IdGenerator, Node, NodeId, NodeKey, NodeKind, Sequential};
pub use path::Path;
use text_size::{TextRange, TextSize};
use twig_text::{PositionedChar, TrackedText, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    arena: Arena<Node>,
    root: NodeKey,
}

impl Tree {
    pub fn new(subtree: Subtree, ids: &mut dyn IdGenerator) -> Self {
        let mut arena = Arena::new();
        let root = graft_into(&mut arena, subtree, ids);
        Self { arena, root }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Resolves `key`, or `None` when the node has been replaced since.
    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.arena.get(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.arena.contains(key)
    }

    pub fn node(&self, key: NodeKey) -> &Node {
        &self.arena[key]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn kind(&self, key: NodeKey) -> &NodeKind {
        &self.arena[key].kind
    }

    pub fn range(&self, key: NodeKey) -> TextRange {
        self.arena[key].range
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.arena[key].parent
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        &self.arena[key].children
    }

    pub fn index_in_parent(&self, key: NodeKey) -> Option<usize> {
        let parent = self.parent(key)?;
        let index = self.children(parent).iter().position(|&child| child == key);
        Some(index.expect("a node is listed among its parent's children"))
    }

    pub fn previous_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let index = self.index_in_parent(key)?.checked_sub(1)?;
        let parent = self.parent(key)?;
        Some(self.children(parent)[index])
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let index = self.index_in_parent(key)?;
        let parent = self.parent(key)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Child indices leading from the root down to `key`.
    pub fn path(&self, key: NodeKey) -> Path {
        let mut indices = Vec::new();
        let mut current = key;
        while let Some(index) = self.index_in_parent(current) {
            indices.push(index);
            current = self.arena[current].parent.expect("indexed nodes have a parent");
        }
        indices.reverse();
        Path::from(indices)
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeKey> {
        path.iter().try_fold(self.root, |node, &index| self.children(node).get(index).copied())
    }

    /// Every node containing `position`, from the root to the innermost one.
    ///
    /// Descent stops at the first node none of whose children contain the
    /// position. A position outside the root yields an empty path.
    pub fn path_for_position(&self, position: TextSize) -> Vec<NodeKey> {
        let mut path = Vec::new();
        if !self.range(self.root).contains(position) {
            return path;
        }

        let mut current = self.root;
        loop {
            path.push(current);
            let next = self
                .children(current)
                .iter()
                .copied()
                .take_while(|&child| self.range(child).start() <= position)
                .find(|&child| self.range(child).contains(position));
            match next {
                Some(child) => current = child,
                None => return path,
            }
        }
    }

    /// Pre-order walk of the subtree under `key`, `key` included.
    pub fn descendants(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        let mut stack = vec![key];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(self.children(next).iter().rev());
            Some(next)
        })
    }

    pub fn set_range(&mut self, key: NodeKey, range: TextRange) {
        self.arena[key].range = range;
    }

    /// Moves `key` and everything under it by `delta`.
    pub fn offset_by(&mut self, key: NodeKey, delta: i32) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let node = &mut self.arena[current];
            node.range = shift_range(node.range, delta);
            stack.extend(node.children.iter().copied());
        }
    }

    /// Accounts for `key` having grown by `delta` at its end: later siblings
    /// move, and every ancestor's end moves with them.
    pub fn offset_successors_by(&mut self, key: NodeKey, delta: i32) {
        let mut current = key;
        while let Some(parent) = self.parent(current) {
            let index = self.index_in_parent(current).expect("child of its parent");
            for later in index + 1..self.children(parent).len() {
                let sibling = self.children(parent)[later];
                self.offset_by(sibling, delta);
            }
            self.grow_end(parent, delta);
            current = parent;
        }
    }

    pub fn grow_end(&mut self, key: NodeKey, delta: i32) {
        let node = &mut self.arena[key];
        node.range = TextRange::new(node.range.start(), shift(node.range.end(), delta));
    }

    /// Moves the children of `key` that start at or after `from`.
    pub fn shift_children_from(&mut self, key: NodeKey, from: TextSize, delta: i32) {
        for index in 0..self.children(key).len() {
            let child = self.children(key)[index];
            if self.range(child).start() >= from {
                self.offset_by(child, delta);
            }
        }
    }

    /// Allocates `subtree` without attaching it anywhere.
    pub fn graft(&mut self, subtree: Subtree, ids: &mut dyn IdGenerator) -> NodeKey {
        graft_into(&mut self.arena, subtree, ids)
    }

    /// Puts the detached node `new` where `old` is and frees `old` with
    /// everything under it.
    pub fn replace(&mut self, old: NodeKey, new: NodeKey) {
        let parent = self.parent(old);
        match parent {
            Some(parent) => {
                let index = self.index_in_parent(old).expect("child of its parent");
                self.arena[parent].children[index] = new;
            }
            None => self.root = new,
        }
        self.arena[new].parent = parent;
        self.remove_subtree(old);
    }

    fn remove_subtree(&mut self, key: NodeKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
        }
    }

    /// One `(start,end): label` line per node, `end` inclusive, children
    /// indented by two spaces. An empty range prints `-` for its end.
    pub fn render_as_tree(&self, key: NodeKey) -> String {
        let mut out = String::new();
        self.render_as_tree_into(&mut out, key, 0);
        out
    }

    fn render_as_tree_into(&self, out: &mut String, key: NodeKey, depth: usize) {
        let node = &self.arena[key];
        let start = u32::from(node.range.start());
        let end = match u32::from(node.range.end()) {
            end if end > start => (end - 1).to_string(),
            _ => "-".to_owned(),
        };
        let indent = depth * 2;
        out.push_str(&format!("{:indent$}({start},{end}): {}\n", "", node.label()));
        for &child in &node.children {
            self.render_as_tree_into(out, child, depth + 1);
        }
    }

    pub fn render_as_text(&self, key: NodeKey, text: &TrackedText, view: View) -> String {
        PositionedChar::collect_text(&text.slice(view, self.range(key)))
    }

    /// Lays the subtree out as source, breaking lists that do not fit in
    /// `max_column` one child per line.
    pub fn pretty_print(&self, key: NodeKey, max_column: usize) -> String {
        self.pretty_print_at(key, 0, max_column)
    }

    fn pretty_print_at(&self, key: NodeKey, indent: usize, max_column: usize) -> String {
        let node = &self.arena[key];
        match &node.kind {
            NodeKind::Atom(content) => content.to_string(),
            NodeKind::Quote => {
                let quoted = node.children.first().map_or(String::new(), |&child| {
                    self.pretty_print_at(child, indent + 1, max_column)
                });
                format!("'{quoted}")
            }
            NodeKind::List if node.children.is_empty() => "()".to_owned(),
            NodeKind::List => {
                let one_line = node
                    .children
                    .iter()
                    .map(|&child| self.pretty_print_at(child, indent, usize::MAX))
                    .collect::<Vec<_>>()
                    .join(" ");
                if indent + one_line.chars().count() + 2 <= max_column {
                    return format!("({one_line})");
                }

                let separator = format!("\n{:width$}", "", width = indent + 1);
                let lines = node
                    .children
                    .iter()
                    .map(|&child| self.pretty_print_at(child, indent + 1, max_column))
                    .collect::<Vec<_>>()
                    .join(&separator);
                format!("({lines})")
            }
        }
    }
}

fn graft_into(arena: &mut Arena<Node>, subtree: Subtree, ids: &mut dyn IdGenerator) -> NodeKey {
    let mut links = Vec::with_capacity(subtree.nodes.len());
    let keys: Vec<NodeKey> = subtree
        .nodes
        .into_iter()
        .map(|node| {
            links.push((node.parent, node.children));
            arena.alloc(Node {
                id: ids.next_id(),
                kind: node.kind,
                range: node.range,
                parent: None,
                children: Vec::new(),
            })
        })
        .collect();

    for (&key, (parent, children)) in keys.iter().zip(links) {
        let node = &mut arena[key];
        node.parent = parent.map(|index| keys[index]);
        node.children = children.into_iter().map(|index| keys[index]).collect();
    }

    keys[0]
}

fn shift(position: TextSize, delta: i32) -> TextSize {
    let shifted = u32::from(position).checked_add_signed(delta);
    TextSize::new(shifted.expect("node position moved below zero"))
}

fn shift_range(range: TextRange, delta: i32) -> TextRange {
    TextRange::new(shift(range.start(), delta), shift(range.end(), delta))
}
