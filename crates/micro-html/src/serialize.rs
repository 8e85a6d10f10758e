//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use micro_dom::{DomTree, NodeId, NodeType};

use crate::parser::fragment::is_void_element;

/// Elements whose text children are serialized without escaping.
///
/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current node's
/// data literally."
const LITERAL_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// The `innerHTML` getter: serialization of the children of `id`.
#[must_use]
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize(tree, tree.children(id), &mut out);
    out
}

/// The `outerHTML` getter: serialization of `id` itself and its subtree.
#[must_use]
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize(tree, &[id], &mut out);
    out
}

enum Step<'a> {
    Open(NodeId),
    Close(&'a str),
}

/// Serialize `roots` and their subtrees in order, without recursion.
fn serialize(tree: &DomTree, roots: &[NodeId], out: &mut String) {
    let mut stack: Vec<Step<'_>> = roots.iter().rev().map(|&id| Step::Open(id)).collect();
    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Open(id) => id,
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
        };
        let Some(node) = tree.get(id) else {
            continue;
        };
        match &node.node_type {
            NodeType::Document | NodeType::DocumentFragment => {}
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                for (name, value) in &data.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&data.tag_name) {
                    continue;
                }
                stack.push(Step::Close(&data.tag_name));
            }
            NodeType::Text(text) => {
                let literal = node
                    .parent
                    .and_then(|p| tree.as_element(p))
                    .is_some_and(|e| LITERAL_TEXT_PARENTS.iter().any(|t| e.is(t)));
                if literal {
                    out.push_str(text);
                } else {
                    out.push_str(&escape(text, false));
                }
            }
            NodeType::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
        }
        stack.extend(tree.children(id).iter().rev().map(|&child| Step::Open(child)));
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
fn escape(text: &str, attribute_mode: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\u{00A0}' => escaped.push_str("&nbsp;"),
            '"' if attribute_mode => escaped.push_str("&quot;"),
            '<' if !attribute_mode => escaped.push_str("&lt;"),
            '>' if !attribute_mode => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
