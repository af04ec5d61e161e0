use std::fmt;

use text_size::TextRange;

use crate::arena::Key;

pub type NodeKey = Key<Node>;

/// Identifies a node for as long as it is not re-parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait IdGenerator {
    fn next_id(&mut self) -> NodeId;
}

/// Hands out `1, 2, 3, ...`; one per document.
#[derive(Debug, Clone)]
pub struct Sequential {
    next: u32,
}

impl Default for Sequential {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator for Sequential {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Atom(Box<str>),
    /// A quote prefix applied to exactly one form.
    Quote,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Leaf,
    Exactly(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, children: usize) -> bool {
        match self {
            Self::Leaf => children == 0,
            Self::Exactly(count) => children == count,
            Self::Any => true,
        }
    }
}

impl NodeKind {
    pub fn atom(content: &str) -> Self {
        Self::Atom(content.into())
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Atom(content) => content,
            Self::Quote => "' (quote)",
            Self::List => "() (list)",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Atom(_) => Arity::Leaf,
            Self::Quote => Arity::Exactly(1),
            Self::List => Arity::Any,
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) range: TextRange,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        self.kind.label()
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}
