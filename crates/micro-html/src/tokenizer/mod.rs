//! HTML tokenizer module.

mod character_reference;
/// Token types emitted by the tokenizer.
pub mod token;
/// The tokenizer state machine.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use token::{Attribute, Token};
pub use tokenizer::{HTMLTokenizer, TokenizerState};
