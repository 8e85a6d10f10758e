use micro_dom::{AttributesMap, DomTree, NodeId, NodeType};
use tracing::debug;

use crate::tokenizer::{HTMLTokenizer, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements only have a start tag; end tags must not be specified for
/// void elements."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tags the "in body" insertion mode drops when parsing into a fragment.
///
/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody):
/// "A start tag whose tag name is "html" ... A start tag whose tag name is
/// "body" ... Parse error. Ignore the token" (with the fragment case context).
const IGNORED_IN_FRAGMENT: &[&str] = &["html", "head", "body"];

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
#[derive(Debug, Clone)]
pub struct ParseIssue {
    /// Description of the parse error.
    pub message: String,
    /// Index into the token stream where this error was encountered, if it
    /// came from tree construction.
    pub token_index: Option<usize>,
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Builds a fragment tree from a token stream the way assigning `innerHTML`
/// on a `div` does: the context element is the fragment root, every token is
/// processed in the "in body" insertion mode, and document-level tags are
/// dropped. Unknown elements (such as `micro-app-head`) are ordinary elements.
pub struct HTMLParser {
    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// The fragment root sits at the bottom and is never popped.
    stack_of_open_elements: Vec<NodeId>,

    /// Fragment tree. `NodeId::ROOT` is the `DocumentFragment`.
    tree: DomTree,

    /// Parse issues encountered during tree construction.
    issues: Vec<ParseIssue>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            stack_of_open_elements: vec![NodeId::ROOT],
            tree: DomTree::new_fragment(),
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the fragment tree.
    #[must_use]
    pub fn run(self) -> DomTree {
        self.run_with_issues().0
    }

    /// Run the parser and return the fragment tree together with any parse issues.
    #[must_use]
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        let tokens = std::mem::take(&mut self.tokens);
        for (index, token) in tokens.into_iter().enumerate() {
            match token {
                Token::Doctype { .. } => {
                    self.parse_error(index, "unexpected DOCTYPE in fragment");
                }
                Token::Character { data } => self.insert_character(data),
                Token::Comment { data } => self.insert_node(NodeType::Comment(data)),
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => self.handle_start_tag(index, &name, self_closing, attributes),
                Token::EndTag { name } => self.handle_end_tag(index, &name),
                Token::EndOfFile => break,
            }
        }
        (self.tree, self.issues)
    }

    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn handle_start_tag(
        &mut self,
        index: usize,
        name: &str,
        self_closing: bool,
        attributes: Vec<crate::Attribute>,
    ) {
        if IGNORED_IN_FRAGMENT.contains(&name) {
            self.parse_error(index, &format!("ignored <{name}> start tag in fragment"));
            return;
        }

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "A start tag whose tag name is one of: "li" ... "p" ... If the stack
        // of open elements has a p element in button scope, then close a p element."
        // Reduced here to: an open <p>/<li> is closed by a sibling of the same kind.
        if matches!(name, "p" | "li") && self.current_tag_is(name) {
            let _ = self.stack_of_open_elements.pop();
        }

        let attrs: AttributesMap = attributes.into_iter().map(|a| (a.name, a.value)).collect();
        let element = self.tree.create_element(name, attrs);
        let parent = self.current_node();
        self.tree.append_child(parent, element);

        // "Acknowledge the token's self-closing flag" only applies to void
        // elements; on anything else the flag is a parse error and ignored.
        if is_void_element(name) {
            return;
        }
        if self_closing {
            self.parse_error(index, &format!("non-void <{name}/> treated as start tag"));
        }
        self.stack_of_open_elements.push(element);
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    /// "Any other end tag": walk the stack of open elements from the current
    /// node down; on a match, pop up to and including it. Otherwise ignore.
    fn handle_end_tag(&mut self, index: usize, name: &str) {
        if IGNORED_IN_FRAGMENT.contains(&name) {
            return;
        }
        let position = self
            .stack_of_open_elements
            .iter()
            .skip(1)
            .rposition(|&id| self.tree.as_element(id).is_some_and(|e| e.is(name)));
        match position {
            Some(p) => {
                let open_index = p + 1;
                if open_index != self.stack_of_open_elements.len() - 1 {
                    self.parse_error(index, &format!("</{name}> closes unclosed elements"));
                }
                self.stack_of_open_elements.truncate(open_index);
            }
            None => self.parse_error(index, &format!("stray </{name}> end tag ignored")),
        }
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data."
    fn insert_character(&mut self, c: char) {
        let parent = self.current_node();
        if let Some(last) = self.tree.last_child(parent)
            && let Some(node) = self.tree.get_mut(last)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push(c);
            return;
        }
        self.insert_node(NodeType::Text(c.to_string()));
    }

    fn insert_node(&mut self, node_type: NodeType) {
        let parent = self.current_node();
        let id = self.tree.alloc(node_type);
        self.tree.append_child(parent, id);
    }

    fn current_tag_is(&self, tag: &str) -> bool {
        self.tree
            .as_element(self.current_node())
            .is_some_and(|e| e.is(tag))
    }

    fn parse_error(&mut self, index: usize, message: &str) {
        debug!(token_index = index, "{message}");
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: Some(index),
        });
    }
}

/// Returns true for elements that never have children or an end tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Tokenize and parse `html` as a fragment.
///
/// Tokenizer errors are reported alongside tree construction issues.
#[must_use]
pub fn parse_fragment(html: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    let mut issues: Vec<ParseIssue> = tokenizer
        .errors()
        .iter()
        .map(|message| ParseIssue {
            message: message.clone(),
            token_index: None,
        })
        .collect();
    let (tree, tree_issues) = HTMLParser::new(tokenizer.into_tokens()).run_with_issues();
    issues.extend(tree_issues);
    (tree, issues)
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let mut stack = vec![(id, indent)];
    while let Some((id, indent)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let prefix = "  ".repeat(indent);
        match &node.node_type {
            NodeType::Document => println!("{prefix}Document"),
            NodeType::DocumentFragment => println!("{prefix}#document-fragment"),
            NodeType::Element(data) => {
                if data.attrs.is_empty() {
                    println!("{prefix}<{}>", data.tag_name);
                } else {
                    let attrs: Vec<String> = data
                        .attrs
                        .iter()
                        .map(|(k, v)| {
                            if v.is_empty() {
                                k.clone()
                            } else {
                                format!("{k}=\"{v}\"")
                            }
                        })
                        .collect();
                    println!("{prefix}<{} {}>", data.tag_name, attrs.join(" "));
                }
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                println!("{prefix}\"{display}\"");
            }
            NodeType::Comment(data) => println!("{prefix}<!-- {data} -->"),
        }
        stack.extend(tree.children(id).iter().rev().map(|&child| (child, indent + 1)));
    }
}
