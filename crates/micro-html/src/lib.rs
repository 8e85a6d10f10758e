//! HTML tokenizer and fragment parser for micro application documents.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RAWTEXT, tag, attribute and comment states
//!   - DOCTYPE skipping and character reference decoding
//!
//! - **Fragment Parser** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!   - The `innerHTML`-on-a-`div` subset: every token is handled as in the
//!     "in body" insertion mode, `html`/`head`/`body` tags are dropped
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Yet Implemented
//!
//! - RCDATA (`title`/`textarea` are tokenized as RAWTEXT)
//! - Script data escape states
//! - Table parsing modes, foster parenting, adoption agency algorithm

/// HTML fragment parser and tree construction.
pub mod parser;
/// Fragment serialization.
pub mod serialize;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, ParseIssue, parse_fragment, print_tree};
pub use serialize::{inner_html, outer_html};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};
