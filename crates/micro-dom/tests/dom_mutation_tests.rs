//! Tests for DOM tree mutation: removal, insertion, fragments and cross-tree import.

use micro_dom::{AttributesMap, DomTree, NodeId, NodeType};

/// Helper to create an element node and return its `NodeId`.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.create_element(tag, AttributesMap::new())
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_of_other_parent_is_noop() {
    let mut tree = DomTree::new();
    let p1 = alloc_element(&mut tree, "div");
    let p2 = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, p1);
    tree.append_child(NodeId::ROOT, p2);
    let child = alloc_element(&mut tree, "span");
    tree.append_child(p1, child);

    tree.remove_child(p2, child);

    assert_eq!(tree.parent(child), Some(p1));
    assert_eq!(tree.children(p1), &[child]);
}

#[test]
fn test_append_moves_node_from_previous_parent() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);
    let child = alloc_element(&mut tree, "p");
    tree.append_child(from, child);

    tree.append_child(to, child);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[child]);
    assert_eq!(tree.parent(child), Some(to));
}

// ========== insert_before / replace_child ==========

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "b");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_replace_child_keeps_position() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(&mut tree, "a");
    let script = alloc_element(&mut tree, "script");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, script);
    tree.append_child(parent, c);

    let marker = tree.create_comment("script replaced");
    tree.replace_child(parent, marker, script);

    assert_eq!(tree.children(parent), &[a, marker, c]);
    assert_eq!(tree.parent(script), None);
    assert_eq!(tree.prev_sibling(c), Some(marker));
}

// ========== move_children / fragments ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);
    let moved = alloc_element(&mut tree, "y");
    tree.append_child(from, moved);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, moved]);
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved), Some(existing));
}

#[test]
fn test_appending_fragment_moves_its_children() {
    let mut tree = DomTree::new();
    let container = alloc_element(&mut tree, "micro-app");
    tree.append_child(NodeId::ROOT, container);

    let fragment = tree.create_fragment();
    let a = alloc_element(&mut tree, "a");
    let b = tree.create_text("hi");
    tree.append_child(fragment, a);
    tree.append_child(fragment, b);

    tree.append_child(container, fragment);

    assert_eq!(tree.children(container), &[a, b]);
    assert!(tree.children(fragment).is_empty());
    assert_eq!(tree.parent(fragment), None);
}

#[test]
fn test_remove_all_children() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    tree.remove_all_children(parent);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.prev_sibling(b), None);
}

// ========== import_node ==========

#[test]
fn test_import_node_is_deep_and_independent() {
    let mut source = DomTree::new_fragment();
    let div = alloc_element(&mut source, "div");
    source.append_child(NodeId::ROOT, div);
    let text = source.create_text("hello");
    source.append_child(div, text);

    let mut host = DomTree::new();
    let copy = host.import_node(&source, NodeId::ROOT);

    assert!(host.is_fragment(copy));
    let copied_div = host.children(copy)[0];
    assert!(host.as_element(copied_div).is_some_and(|e| e.is("div")));
    assert_eq!(host.text_content(copied_div), "hello");

    // Mutating the copy leaves the source untouched.
    host.remove_all_children(copied_div);
    assert_eq!(source.text_content(div), "hello");
}

#[test]
fn test_import_node_keeps_sibling_order() {
    let mut source = DomTree::new_fragment();
    let outer = alloc_element(&mut source, "div");
    source.append_child(NodeId::ROOT, outer);
    for tag in ["a", "b", "c"] {
        let child = alloc_element(&mut source, tag);
        source.append_child(outer, child);
    }
    let tail = alloc_element(&mut source, "p");
    source.append_child(NodeId::ROOT, tail);

    let mut host = DomTree::new();
    let copy = host.import_node(&source, NodeId::ROOT);

    let tags: Vec<String> = host
        .descendants(copy)
        .filter_map(|id| host.as_element(id).map(|e| e.tag_name.clone()))
        .collect();
    assert_eq!(tags, ["div", "a", "b", "c", "p"]);
}

#[test]
fn test_import_node_handles_deep_nesting() {
    const DEPTH: usize = 100_000;
    let mut source = DomTree::new_fragment();
    let mut parent = NodeId::ROOT;
    for _ in 0..DEPTH {
        let div = alloc_element(&mut source, "div");
        source.append_child(parent, div);
        parent = div;
    }
    let leaf = source.create_text("deep");
    source.append_child(parent, leaf);

    let mut host = DomTree::new();
    let copy = host.import_node(&source, NodeId::ROOT);

    assert_eq!(host.descendants(copy).count(), DEPTH + 1);
    assert_eq!(host.text_content(copy), "deep");
}

#[test]
fn test_descendants_are_in_tree_order() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    let d = alloc_element(&mut tree, "d");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(a, b);
    tree.append_child(b, c);
    tree.append_child(NodeId::ROOT, d);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![a, b, c, d]);
    assert!(tree.is_descendant_of(c, a));
    assert!(!tree.is_descendant_of(d, a));
}

#[test]
fn test_elements_by_tag_name_ignores_case() {
    let mut tree = DomTree::new();
    let upper = tree.alloc(NodeType::Element(micro_dom::ElementData {
        tag_name: "SCRIPT".to_string(),
        attrs: AttributesMap::new(),
    }));
    let lower = alloc_element(&mut tree, "script");
    tree.append_child(NodeId::ROOT, upper);
    tree.append_child(NodeId::ROOT, lower);

    assert_eq!(tree.elements_by_tag_name(NodeId::ROOT, "script"), vec![upper, lower]);
    assert_eq!(tree.first_element_by_tag_name(NodeId::ROOT, "Script"), Some(upper));
}
