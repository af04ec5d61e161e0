use expect_test::expect;
use text_size::{TextRange, TextSize};
use twig_text::{TrackedText, View};

use crate::{Builder, NodeKind, Path, Sequential, Tree};

const SOURCE: &str = "(a '(b c) d)";

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

/// The tree of [`SOURCE`], built by hand.
fn sample() -> Tree {
    let mut builder = Builder::new();
    builder.start_node(NodeKind::List, 0.into());
    builder.leaf(NodeKind::atom("a"), range(1, 2));
    builder.start_node(NodeKind::Quote, 3.into());
    builder.start_node(NodeKind::List, 4.into());
    builder.leaf(NodeKind::atom("b"), range(5, 6));
    builder.leaf(NodeKind::atom("c"), range(7, 8));
    builder.finish_node(9.into());
    builder.finish_node(9.into());
    builder.leaf(NodeKind::atom("d"), range(10, 11));
    builder.finish_node(12.into());

    Tree::new(builder.finish(), &mut Sequential::default())
}

fn at(tree: &Tree, path: &[usize]) -> crate::NodeKey {
    tree.node_at_path(path).unwrap_or_else(|| panic!("no node at {path:?}"))
}

#[test]
fn render_as_tree() {
    let tree = sample();
    expect![[r#"
        (0,11): () (list)
          (1,1): a
          (3,8): ' (quote)
            (4,8): () (list)
              (5,5): b
              (7,7): c
          (10,10): d
    "#]]
    .assert_eq(&tree.render_as_tree(tree.root()));
}

#[test]
fn render_empty_ranges() {
    let mut tree = sample();
    let d = at(&tree, &[2]);
    tree.set_range(d, range(10, 10));
    let a = at(&tree, &[0]);
    tree.set_range(a, range(0, 0));

    expect![[r#"
        (0,11): () (list)
          (0,-): a
          (3,8): ' (quote)
            (4,8): () (list)
              (5,5): b
              (7,7): c
          (10,-): d
    "#]]
    .assert_eq(&tree.render_as_tree(tree.root()));
}

#[test]
fn ids_follow_build_order() {
    let tree = sample();
    let ids: Vec<u32> = tree.descendants(tree.root()).map(|key| tree.node(key).id().raw()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn paths() {
    let tree = sample();
    let c = at(&tree, &[1, 0, 1]);

    assert_eq!(tree.node(c).label(), "c");
    assert_eq!(tree.path(c), Path::from(vec![1, 0, 1]));
    assert_eq!(tree.path(tree.root()), Path::root());
    assert_eq!(tree.node(at(&tree, &[0])).label(), "a");
    assert_eq!(tree.node_at_path(&[3]), None);
    assert_eq!(tree.node_at_path(&[0, 0]), None);

    for key in tree.descendants(tree.root()) {
        assert_eq!(tree.node_at_path(&tree.path(key)), Some(key));
    }
}

#[test]
fn path_for_position() {
    let tree = sample();
    let labels = |position: u32| {
        tree.path_for_position(TextSize::new(position))
            .into_iter()
            .map(|key| tree.node(key).label().to_owned())
            .collect::<Vec<_>>()
    };

    assert_eq!(labels(7), ["() (list)", "' (quote)", "() (list)", "c"]);
    assert_eq!(labels(6), ["() (list)", "' (quote)", "() (list)"], "gap between b and c");
    assert_eq!(labels(2), ["() (list)"]);
    assert_eq!(labels(3), ["() (list)", "' (quote)"]);
    assert!(labels(12).is_empty());
}

#[test]
fn siblings() {
    let tree = sample();
    let a = at(&tree, &[0]);
    let quote = at(&tree, &[1]);
    let d = at(&tree, &[2]);

    assert_eq!(tree.previous_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(quote));
    assert_eq!(tree.previous_sibling(d), Some(quote));
    assert_eq!(tree.next_sibling(d), None);
    assert_eq!(tree.next_sibling(tree.root()), None);
    assert_eq!(tree.index_in_parent(tree.root()), None);
}

#[test]
fn offset_successors() {
    let mut tree = sample();
    let b = at(&tree, &[1, 0, 0]);
    tree.grow_end(b, 2);
    tree.offset_successors_by(b, 2);

    expect![[r#"
        (0,13): () (list)
          (1,1): a
          (3,10): ' (quote)
            (4,10): () (list)
              (5,7): b
              (9,9): c
          (12,12): d
    "#]]
    .assert_eq(&tree.render_as_tree(tree.root()));
}

#[test]
fn shift_children_in_a_gap() {
    let mut tree = sample();
    let root = tree.root();
    tree.grow_end(root, 1);
    tree.shift_children_from(root, 3.into(), 1);

    let starts: Vec<u32> =
        tree.children(root).iter().map(|&key| tree.range(key).start().into()).collect();
    assert_eq!(starts, vec![1, 4, 11]);
    assert_eq!(tree.range(at(&tree, &[1, 0, 1])), range(8, 9));
}

#[test]
fn replace_frees_the_old_subtree() {
    let mut tree = sample();
    let quote = at(&tree, &[1]);
    let b = at(&tree, &[1, 0, 0]);
    let before = tree.len();

    let mut builder = Builder::new();
    builder.leaf(NodeKind::atom("x"), range(3, 4));
    let x = tree.graft(builder.finish(), &mut Sequential::default());
    tree.replace(quote, x);

    assert!(!tree.contains(quote));
    assert_eq!(tree.get(b), None);
    assert_eq!(tree.len(), before - 4 + 1);
    assert_eq!(at(&tree, &[1]), x);
    assert_eq!(tree.parent(x), Some(tree.root()));
    assert_eq!(tree.path(x), Path::from(vec![1]));
}

#[test]
fn replace_root() {
    let mut tree = sample();
    let old_root = tree.root();

    let mut builder = Builder::new();
    builder.start_node(NodeKind::List, 0.into());
    builder.finish_node(2.into());
    let empty = tree.graft(builder.finish(), &mut Sequential::default());
    tree.replace(old_root, empty);

    assert_eq!(tree.root(), empty);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.render_as_tree(empty), "(0,1): () (list)\n");
}

#[test]
fn render_as_text() {
    let tree = sample();
    let mut text = TrackedText::from(SOURCE);
    text.insert_char('z', 10.into());

    let d = at(&tree, &[2]);
    let quote = at(&tree, &[1]);
    assert_eq!(tree.render_as_text(tree.root(), &TrackedText::from(SOURCE), View::Current), SOURCE);
    assert_eq!(tree.render_as_text(quote, &text, View::Current), "'(b c)");
    assert_eq!(tree.render_as_text(quote, &text, View::Original), "'(b c)");
    assert_eq!(tree.render_as_text(d, &text, View::Current), "z");
    assert_eq!(tree.render_as_text(d, &text, View::Original), "");
}

#[test]
fn pretty_print() {
    let tree = sample();
    assert_eq!(tree.pretty_print(tree.root(), 40), SOURCE);
    assert_eq!(tree.pretty_print(tree.root(), 8), "(a\n '(b c)\n d)");
}

#[test]
fn path_text_form() {
    let path: Path = "1.0.1".parse().unwrap();
    assert_eq!(&*path, &[1, 0, 1]);
    assert_eq!(path.to_string(), "1.0.1");

    let root: Path = "".parse().unwrap();
    assert_eq!(root, Path::root());
    assert_eq!(root.to_string(), "");
    assert!("1.x".parse::<Path>().is_err());
}
