//! Keeps a parse tree in step with a [`TrackedText`] as single characters
//! are typed and deleted, and restructures the tree by editing the text
//! under it.
//!
//! Every edit re-parses the smallest node that covers it and climbs towards
//! the root while the grammar rejects the result. Structural edits splice
//! whole node spans and roll back when the parent no longer parses.

mod error;
mod swap;
#[cfg(test)]
mod tests;

use std::fmt;
use std::rc::Rc;

pub use error::EditError;
use swap::Swap;
use text_size::{TextRange, TextSize};
use tracing::{debug, trace};
use twig_errors::ParseError;
use twig_text::{TrackedText, TrackedTextBuilder, View};
use twig_tree::{Grammar, IdGenerator, NodeKey, Path, Sequential, Subtree, Tree};

/// What a character edit did to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// `node` re-parsed cleanly and replaced the node the edit started at or
    /// one of its ancestors. Its span is committed in the buffer.
    Reparsed { root: NodeKey, node: NodeKey },
    /// Not even the root parses with the edit applied. The edit stays in the
    /// buffer as an uncommitted change and the tree keeps its last good shape
    /// with shifted coordinates.
    Pending { root: NodeKey },
}

impl EditOutcome {
    pub fn root(self) -> NodeKey {
        match self {
            Self::Reparsed { root, .. } | Self::Pending { root } => root,
        }
    }

    pub fn is_reparsed(self) -> bool {
        matches!(self, Self::Reparsed { .. })
    }
}

/// A text buffer together with the tree parsed from it.
pub struct Document<G: Grammar> {
    text: TrackedText,
    tree: Tree,
    grammar: Rc<G>,
    ids: Box<dyn IdGenerator>,
    /// The root span was stretched over an edit outside it and may cover
    /// trivia once that edit is committed.
    stretched_root: bool,
}

impl<G: Grammar> Document<G> {
    /// Parses `text` as a single top-level form.
    pub fn parse(grammar: impl Into<Rc<G>>, text: &str) -> Result<Self, ParseError> {
        Self::with_ids(grammar, text, Box::new(Sequential::default()))
    }

    pub fn with_ids(
        grammar: impl Into<Rc<G>>,
        text: &str,
        mut ids: Box<dyn IdGenerator>,
    ) -> Result<Self, ParseError> {
        let grammar = grammar.into();
        let text = TrackedText::from(text);
        let chars = text.current_slice(TextRange::up_to(text.current_len()));
        let subtree = grammar.parse_all(&chars)?;
        let tree = Tree::new(subtree, ids.as_mut());
        Ok(Self { text, tree, grammar, ids, stretched_root: false })
    }

    pub fn text(&self) -> &TrackedText {
        &self.text
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn grammar(&self) -> &Rc<G> {
        &self.grammar
    }

    pub fn root(&self) -> NodeKey {
        self.tree.root()
    }

    /// True when the tree describes the current text, i.e. the buffer holds
    /// no uncommitted edit.
    pub fn is_synchronized(&self) -> bool {
        !self.text.has_changes()
    }

    pub fn path_for_position(&self, position: TextSize) -> Vec<NodeKey> {
        self.tree.path_for_position(position)
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<NodeKey> {
        self.tree.node_at_path(path)
    }

    pub fn path(&self, node: NodeKey) -> Path {
        self.tree.path(node)
    }

    pub fn render_as_text(&self, node: NodeKey, view: View) -> String {
        self.tree.render_as_text(node, &self.text, view)
    }

    pub fn render_as_tree(&self) -> String {
        self.tree.render_as_tree(self.tree.root())
    }

    pub fn pretty_print(&self, max_column: usize) -> String {
        self.tree.pretty_print(self.tree.root(), max_column)
    }

    pub fn insert_character(
        &mut self,
        ch: char,
        position: TextSize,
    ) -> Result<EditOutcome, EditError> {
        let len = self.text.current_len();
        if position > len {
            return Err(out_of_bounds(position, len));
        }

        let node = self.affected_node(position, TextSize::new(0));
        // Deleted characters right before a node belong to whatever precedes it.
        if self.tree.range(node).start() == position {
            self.text.insert_char_past_deletions(ch, position);
        } else {
            self.text.insert_char(ch, position);
        }
        self.tree.grow_end(node, 1);
        self.tree.shift_children_from(node, position, 1);
        self.tree.offset_successors_by(node, 1);
        debug!(?ch, ?position, node = %self.tree.node(node).id(), "inserted character");

        Ok(self.reparse_upward(node))
    }

    pub fn delete_character(&mut self, position: TextSize) -> Result<EditOutcome, EditError> {
        let len = self.text.current_len();
        if position >= len {
            return Err(out_of_bounds(position, len));
        }

        let node = self.affected_node(position, TextSize::new(1));
        self.text.delete_char(position);
        self.tree.grow_end(node, -1);
        self.tree.shift_children_from(node, position + TextSize::new(1), -1);
        self.tree.offset_successors_by(node, -1);
        debug!(?position, node = %self.tree.node(node).id(), "deleted character");

        Ok(self.reparse_upward(node))
    }

    /// Swaps `node` with its previous sibling. Returns the new root, or
    /// `None` when there is no previous sibling or the swapped parent does
    /// not parse, in which case nothing changed.
    pub fn move_up(&mut self, node: NodeKey) -> Result<Option<NodeKey>, EditError> {
        self.ensure_live(node)?;
        Ok(self.tree.previous_sibling(node).and_then(|previous| self.swap(previous, node)))
    }

    /// Swaps `node` with its next sibling, see [`Document::move_up`].
    pub fn move_down(&mut self, node: NodeKey) -> Result<Option<NodeKey>, EditError> {
        self.ensure_live(node)?;
        Ok(self.tree.next_sibling(node).and_then(|next| self.swap(node, next)))
    }

    /// Inserts a copy of `node` right after it. Returns the new root, or
    /// `None` for the root itself and when the parent does not parse with the
    /// copy as one more child, in which case nothing changed.
    pub fn duplicate(&mut self, node: NodeKey) -> Result<Option<NodeKey>, EditError> {
        self.ensure_live(node)?;
        let Some(parent) = self.tree.parent(node) else {
            return Ok(None);
        };

        let range = self.tree.range(node);
        let mut copy = TrackedTextBuilder::new();
        copy.push_text(self.grammar.separator())
            .push_tracked(&self.text.slice_with_changes(range));
        let copy = copy.finish();
        let len = copy.current_len();

        // The copy goes after any deletions trailing the node, so it cannot
        // end up inside a delimiter the node has lost.
        let splice = self.text.splice_after(range.end(), &copy);
        self.tree.offset_successors_by(node, delta(len));

        let siblings = self.tree.children(parent).len();
        match self.parse_node(parent, View::Original) {
            Ok(subtree) if subtree.root().children().len() == siblings + 1 => {
                self.install(parent, subtree, View::Original);
                debug!(?range, "duplicated node");
                return Ok(Some(self.tree.root()));
            }
            Ok(_) => debug!(?range, "copy merged with its neighbours"),
            Err(error) => debug!(%error, ?range, "parent does not parse with the copy"),
        }

        self.text.unsplice(splice);
        self.tree.offset_successors_by(node, -delta(len));
        debug!(?range, "duplicate rolled back");
        Ok(None)
    }

    fn ensure_live(&self, node: NodeKey) -> Result<(), EditError> {
        if self.tree.contains(node) { Ok(()) } else { Err(EditError::StaleNode) }
    }

    /// The innermost node containing `position`. An edit outside the root
    /// stretches the root over it.
    fn affected_node(&mut self, position: TextSize, width: TextSize) -> NodeKey {
        if let Some(&node) = self.tree.path_for_position(position).last() {
            return node;
        }

        let root = self.tree.root();
        let range = self.tree.range(root).cover(TextRange::at(position, width));
        self.tree.set_range(root, range);
        self.stretched_root = true;
        root
    }

    fn reparse_upward(&mut self, mut node: NodeKey) -> EditOutcome {
        loop {
            let span = self.tree.range(node);
            if self.is_glued(node) {
                debug!(?span, "node reads as one token with a neighbour");
            } else {
                match self.reparse(node, View::Current) {
                    Ok(new) => {
                        self.commit_reparsed(new, span);
                        return EditOutcome::Reparsed { root: self.tree.root(), node: new };
                    }
                    Err(error) => debug!(%error, ?span, "reparse failed"),
                }
            }

            match self.tree.parent(node) {
                Some(parent) => node = parent,
                None => {
                    debug!("root does not parse, edit left pending");
                    return EditOutcome::Pending { root: node };
                }
            }
        }
    }

    /// Commits the text `new` was parsed from. A root that was stretched
    /// over an edit is shrunk back to its tokens once nothing is pending.
    fn commit_reparsed(&mut self, new: NodeKey, span: TextRange) {
        if self.tree.parent(new).is_none() {
            self.text.validate_all();
            self.stretched_root = false;
            return;
        }

        self.text.validate_slice(span);
        if self.stretched_root && !self.text.has_changes() {
            self.trim_root();
            self.stretched_root = false;
        }
    }

    fn trim_root(&mut self) {
        let root = self.tree.root();
        let chars = self.text.current_slice(self.tree.range(root));
        let Ok(tokens) = self.grammar.tokenize(&chars) else {
            return;
        };
        if let (Some(first), Some(last)) = (tokens.first(), tokens.last()) {
            let range = TextRange::new(first.range.start(), last.range.end());
            trace!(?range, "trimmed root");
            self.tree.set_range(root, range);
        }
    }

    /// Whether the first or last character of `node` forms one token with
    /// the character just outside it. Such a node cannot be re-parsed on its
    /// own.
    fn is_glued(&self, node: NodeKey) -> bool {
        let range = self.tree.range(node);
        if self.tree.parent(node).is_none() || range.is_empty() {
            return false;
        }

        let one = TextSize::new(1);
        let before = range.start().checked_sub(one);
        let window = TextRange::new(before.unwrap_or(range.start()), range.end() + one);
        let chars = self.text.current_slice(window);
        let at = |position: TextSize| chars.iter().find(|c| c.position == position).map(|c| c.ch);
        let joins = |left: Option<char>, right: Option<char>| match (left, right) {
            (Some(left), Some(right)) => self.grammar.joins(left, right),
            _ => false,
        };

        joins(before.and_then(at), at(range.start())) || joins(at(range.end() - one), at(range.end()))
    }

    /// Re-parses the text under `node` and puts the result in its place.
    fn reparse(&mut self, node: NodeKey, view: View) -> Result<NodeKey, ParseError> {
        let subtree = self.parse_node(node, view)?;
        Ok(self.install(node, subtree, view))
    }

    fn parse_node(&self, node: NodeKey, view: View) -> Result<Subtree, ParseError> {
        let chars = self.text.slice(view, self.tree.range(node));
        self.grammar.parse_all(&chars)
    }

    /// Puts `subtree` in the place of `node`.
    ///
    /// Characters keep their current positions in both views, so the new
    /// subtree needs no coordinate fix-up. A reparse of the original view
    /// keeps the old span as the outer range, since the text it covers has
    /// the same current length.
    fn install(&mut self, node: NodeKey, subtree: Subtree, view: View) -> NodeKey {
        let range = self.tree.range(node);
        let new = self.tree.graft(subtree, self.ids.as_mut());
        self.tree.replace(node, new);
        if view == View::Original {
            self.tree.set_range(new, range);
        }
        trace!(?view, ?range, id = %self.tree.node(new).id(), "reparsed");
        new
    }

    fn swap(&mut self, earlier: NodeKey, later: NodeKey) -> Option<NodeKey> {
        let parent = self.tree.parent(earlier).expect("siblings have a parent");
        let swap = Swap::apply(&mut self.text, self.tree.range(earlier), self.tree.range(later));

        match self.reparse(parent, View::Original) {
            Ok(_) => {
                swap.commit();
                Some(self.tree.root())
            }
            Err(error) => {
                swap.rollback(&mut self.text);
                debug!(%error, "swap rolled back");
                None
            }
        }
    }
}

impl<G: Grammar> fmt::Debug for Document<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.text)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

fn out_of_bounds(position: TextSize, len: TextSize) -> EditError {
    EditError::OutOfBounds { position: position.into(), len: len.into() }
}

fn delta(len: TextSize) -> i32 {
    u32::from(len) as i32
}
