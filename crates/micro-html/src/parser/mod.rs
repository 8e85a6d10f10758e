//! HTML parser module for fragment tree construction.

/// Fragment parser implementation.
pub mod fragment;

pub use fragment::{HTMLParser, ParseIssue, is_void_element, parse_fragment, print_tree};
