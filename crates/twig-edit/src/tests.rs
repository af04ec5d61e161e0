use expect_test::expect;
use text_size::{TextRange, TextSize};
use twig_sexp::Sexp;
use twig_text::View;
use twig_tree::NodeKind;

use crate::{Document, EditError, EditOutcome};

fn document(text: &str) -> Document<Sexp> {
    Document::parse(Sexp, text).expect("sample parses")
}

fn at(position: u32) -> TextSize {
    TextSize::new(position)
}

fn current(document: &Document<Sexp>) -> String {
    document.render_as_text(document.root(), View::Current)
}

fn original(document: &Document<Sexp>) -> String {
    document.render_as_text(document.root(), View::Original)
}

#[test]
fn typing_into_an_empty_list() {
    let mut document = document("()");
    for (position, ch) in [(1, 'a'), (2, ' '), (3, 'b')] {
        let outcome = document.insert_character(ch, at(position)).unwrap();
        assert!(outcome.is_reparsed());
    }

    assert!(document.is_synchronized());
    assert_eq!(current(&document), "(a b)");
    expect![[r#"
        (0,4): () (list)
          (1,1): a
          (3,3): b
    "#]]
    .assert_eq(&document.render_as_tree());
}

#[test]
fn reparse_starts_at_the_innermost_node() {
    let mut document = document("(f (g x) y)");
    let g = document.node_at_path(&[1, 0]).unwrap();
    let list = document.node_at_path(&[1]).unwrap();

    let outcome = document.insert_character('h', at(4)).unwrap();
    let EditOutcome::Reparsed { node, .. } = outcome else { panic!("edit should reparse") };

    assert_eq!(document.tree().kind(node), &NodeKind::atom("hg"));
    assert!(!document.tree().contains(g));
    assert!(document.tree().contains(list));
    expect![[r#"
        (0,11): () (list)
          (1,1): f
          (3,8): () (list)
            (4,5): hg
            (7,7): x
          (10,10): y
    "#]]
    .assert_eq(&document.render_as_tree());
}

#[test]
fn unbalanced_edit_stays_pending_until_fixed() {
    let mut document = document("(a)");

    let outcome = document.insert_character('(', at(0)).unwrap();
    assert_eq!(outcome, EditOutcome::Pending { root: document.root() });
    assert!(!document.is_synchronized());
    assert_eq!(current(&document), "((a)");
    assert_eq!(original(&document), "(a)");

    let outcome = document.insert_character(')', at(4)).unwrap();
    assert!(outcome.is_reparsed());
    assert!(document.is_synchronized());
    expect![[r#"
        (0,4): () (list)
          (1,3): () (list)
            (2,2): a
    "#]]
    .assert_eq(&document.render_as_tree());
}

#[test]
fn pending_insertion_cancelled_by_deletion() {
    let mut document = document("(a)");
    document.insert_character('(', at(0)).unwrap();

    let outcome = document.delete_character(at(0)).unwrap();

    assert!(outcome.is_reparsed());
    assert!(document.is_synchronized());
    assert_eq!(document.text().render_markers(), "_(_a_)");
}

#[test]
fn deleting_a_whole_atom_climbs_to_the_list() {
    let mut document = document("(a b)");

    let outcome = document.delete_character(at(1)).unwrap();

    let EditOutcome::Reparsed { node, root } = outcome else { panic!("edit should reparse") };
    assert_eq!(node, root);
    assert_eq!(current(&document), "( b)");
    expect![[r#"
        (0,3): () (list)
          (2,2): b
    "#]]
    .assert_eq(&document.render_as_tree());
}

#[test]
fn edits_around_the_root() {
    let mut document = document(" (a) ");

    document.delete_character(at(0)).unwrap();
    assert_eq!(document.tree().range(document.root()), TextRange::new(at(0), at(3)));

    document.insert_character('b', at(4)).unwrap();
    assert!(!document.is_synchronized());
    assert_eq!(document.text().current_text(), "(a) b");

    document.delete_character(at(4)).unwrap();
    assert!(document.is_synchronized());
    assert_eq!(document.text().current_text(), "(a) ");
}

#[test]
fn deletion_in_a_gap_moves_later_children() {
    let mut document = document("(a  bc)");

    document.delete_character(at(3)).unwrap();

    assert_eq!(current(&document), "(a bc)");
    expect![[r#"
        (0,5): () (list)
          (1,1): a
          (3,4): bc
    "#]]
    .assert_eq(&document.render_as_tree());
}

#[test]
fn reparse_leaves_the_parents_deleted_delimiter_pending() {
    let mut document = document("(ab)");

    let outcome = document.delete_character(at(3)).unwrap();
    assert_eq!(outcome, EditOutcome::Pending { root: document.root() });
    assert_eq!(document.text().render_markers(), "_(_a_bD)");

    let outcome = document.insert_character('c', at(1)).unwrap();
    assert!(outcome.is_reparsed());
    assert!(!document.is_synchronized());
    assert_eq!(document.text().render_markers(), "_(_c_a_bD)");
    assert_eq!(document.text().current_text(), "(cab");
    assert_eq!(document.text().original_text(), "(cab)");
}

#[test]
fn leading_deletion_is_not_committed_by_the_node_after_it() {
    let mut document = document("('a)");
    document.insert_character(')', at(1)).unwrap();
    document.delete_character(at(0)).unwrap();
    document.delete_character(at(0)).unwrap();

    assert!(!document.is_synchronized());
    assert_eq!(document.text().current_text(), "'a)");
    assert_eq!(document.text().original_text(), "('a)");
}

#[test]
fn typing_at_a_node_start_lands_past_deletions_before_it() {
    let mut document = document("(x (a))");
    document.delete_character(at(3)).unwrap();
    assert_eq!(document.text().current_text(), "(x a))");

    let outcome = document.insert_character('b', at(3)).unwrap();

    assert!(outcome.is_reparsed());
    assert_eq!(document.text().render_markers(), "_(_x_ D(_b_a_)_)");
    assert!(!document.is_synchronized());
}

#[test]
fn out_of_bounds_edits() {
    let mut document = document("(a)");

    assert_eq!(
        document.insert_character('x', at(4)),
        Err(EditError::OutOfBounds { position: 4, len: 3 })
    );
    assert_eq!(
        document.delete_character(at(3)),
        Err(EditError::OutOfBounds { position: 3, len: 3 })
    );
    assert!(document.is_synchronized());
}

#[test]
fn swap_siblings_back_and_forth() {
    let mut document = document("(a b)");
    let b = document.node_at_path(&[1]).unwrap();

    let root = document.move_up(b).unwrap();
    assert_eq!(root, Some(document.root()));
    assert_eq!(current(&document), "(b a)");

    let b = document.node_at_path(&[0]).unwrap();
    assert_eq!(document.tree().kind(b), &NodeKind::atom("b"));
    document.move_down(b).unwrap();
    assert_eq!(current(&document), "(a b)");
}

#[test]
fn swap_at_the_boundary_does_nothing() {
    let mut document = document("(a b)");
    let before = document.tree().clone();

    let first = document.node_at_path(&[0]).unwrap();
    assert_eq!(document.move_up(first), Ok(None));
    let last = document.node_at_path(&[1]).unwrap();
    assert_eq!(document.move_down(last), Ok(None));
    assert_eq!(document.move_up(document.root()), Ok(None));

    assert_eq!(document.tree(), &before);
}

#[test]
fn duplicate_a_node() {
    let mut document = document("(a b)");
    let a = document.node_at_path(&[0]).unwrap();

    let root = document.duplicate(a).unwrap();

    assert_eq!(root, Some(document.root()));
    assert_eq!(current(&document), "(a a b)");
    expect![[r#"
        (0,6): () (list)
          (1,1): a
          (3,3): a
          (5,5): b
    "#]]
    .assert_eq(&document.render_as_tree());
    assert_eq!(document.duplicate(a), Err(EditError::StaleNode));
    assert_eq!(document.move_up(a), Err(EditError::StaleNode));
}

#[test]
fn duplicate_root_does_nothing() {
    let mut document = document("(a)");
    assert_eq!(document.duplicate(document.root()), Ok(None));
    assert_eq!(current(&document), "(a)");
}

#[test]
fn duplicate_inside_a_quote_rolls_back() {
    let mut document = document("(f '(x))");
    let text = document.text().clone();
    let tree = document.tree().clone();
    let quoted = document.node_at_path(&[1, 0]).unwrap();

    assert_eq!(document.duplicate(quoted), Ok(None));

    assert_eq!(document.text(), &text);
    assert_eq!(document.tree(), &tree);
}

#[test]
fn duplicate_rollback_keeps_trailing_deletions() {
    let mut document = document("(f '(x)  )");
    document.insert_character('(', at(0)).unwrap();
    document.delete_character(at(8)).unwrap();
    assert_eq!(document.text().render_markers(), "A(_(_f_ _'_(_x_)D _ _)");
    let text = document.text().clone();
    let tree = document.tree().clone();

    let quoted = document.node_at_path(&[1, 0]).unwrap();
    assert_eq!(document.duplicate(quoted), Ok(None));

    assert_eq!(document.text(), &text);
    assert_eq!(document.tree(), &tree);
}

#[test]
fn pretty_print_the_document() {
    let document = document("(define (square x)\n  (* x x))");
    assert_eq!(document.pretty_print(80), "(define (square x) (* x x))");
    assert_eq!(document.pretty_print(20), "(define\n (square x)\n (* x x))");
}

#[test]
fn duplicate_lands_after_a_deleted_delimiter() {
    let mut document = document("(f (x) y)");
    document.insert_character('(', at(0)).unwrap();
    document.delete_character(at(6)).unwrap();
    assert_eq!(document.text().render_markers(), "A(_(_f_ _(_xD)_ _y_)");

    let x = document.node_at_path(&[1]).unwrap();
    assert_eq!(document.duplicate(x), Ok(Some(document.root())));

    assert_eq!(original(&document), "(f (x) (x) y)");
    assert_eq!(document.text().current_text(), "((f (x (x y)");
    assert_eq!(document.tree().children(document.root()).len(), 4);
}

#[test]
fn failed_duplicate_restores_the_text_exactly() {
    let mut document = document("''a");
    document.delete_character(at(2)).unwrap();
    assert_eq!(document.text().render_markers(), "_'_'Da");
    let text = document.text().clone();
    let tree = document.tree().clone();

    for _ in 0..2 {
        let quoted = document.node_at_path(&[0, 0]).unwrap();
        assert_eq!(document.duplicate(quoted), Ok(None));
        assert_eq!(document.text(), &text);
        assert_eq!(document.tree(), &tree);
    }
}
