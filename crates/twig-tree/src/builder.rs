use text_size::{TextRange, TextSize};

use crate::NodeKind;

/// A parsed fragment that is not attached to any tree yet.
///
/// Nodes are stored in pre-order, the first one is the fragment's root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    pub(crate) nodes: Vec<SubtreeNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeNode {
    pub(crate) kind: NodeKind,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
}

impl SubtreeNode {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }
}

impl Subtree {
    pub fn root(&self) -> &SubtreeNode {
        &self.nodes[0]
    }

    pub fn range(&self) -> TextRange {
        self.root().range
    }

    pub fn nodes(&self) -> &[SubtreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds a [`Subtree`] from start/finish events.
///
/// A parser that bails out half way simply drops its builder.
#[derive(Debug, Default)]
pub struct Builder {
    nodes: Vec<SubtreeNode>,
    opened: Vec<usize>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, range: TextRange) -> usize {
        debug_assert!(
            !self.opened.is_empty() || self.nodes.is_empty(),
            "a subtree has a single root"
        );

        let index = self.nodes.len();
        let parent = self.opened.last().copied();
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        self.nodes.push(SubtreeNode { kind, range, parent, children: Vec::new() });
        index
    }

    /// Opens a node that starts at `start`; its children follow until the
    /// matching [`Builder::finish_node`].
    pub fn start_node(&mut self, kind: NodeKind, start: TextSize) {
        let index = self.push(kind, TextRange::empty(start));
        self.opened.push(index);
    }

    pub fn finish_node(&mut self, end: TextSize) {
        let index = self.opened.pop().expect("`finish_node` without a matching `start_node`");
        let node = &mut self.nodes[index];
        debug_assert!(
            node.kind.arity().accepts(node.children.len()),
            "{:?} cannot have {} children",
            node.kind,
            node.children.len()
        );
        node.range = TextRange::new(node.range.start(), end);
    }

    pub fn leaf(&mut self, kind: NodeKind, range: TextRange) {
        self.push(kind, range);
    }

    pub fn finish(self) -> Subtree {
        assert!(self.opened.is_empty(), "unfinished nodes left in the builder");
        assert!(!self.nodes.is_empty(), "the builder produced no node");
        Subtree { nodes: self.nodes }
    }
}
