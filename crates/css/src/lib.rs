//! # CSS selectors
//!
//! Tokenizer and strict parser for selector lists. Unlike stylesheet
//! parsing, where bad selectors are skipped, every malformed input here is
//! reported as a [`SelectorError`] so query APIs can refuse it.

pub mod error;
pub mod nth;
pub mod selector;
pub mod token;

pub use error::SelectorError;
pub use nth::Nth;
pub use selector::{
    AttrOp, Combinator, ComplexSelector, CompoundSelector, PseudoClass, PseudoElement,
    SelectorList, SimpleSelector, parse_selector_list,
};
pub use token::{CssToken, CssTokenizer, tokenize};
