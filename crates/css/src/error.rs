use thiserror::Error;

/// Reasons a selector string is rejected by [`crate::parse_selector_list`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected `{found}` in selector")]
    UnexpectedToken { found: String },
    #[error("combinator `{0}` has no selector on one side")]
    DanglingCombinator(char),
    #[error("unknown pseudo-class `:{0}`")]
    UnknownPseudoClass(String),
    #[error("unknown pseudo-element `::{0}`")]
    UnknownPseudoElement(String),
    #[error("invalid an+b expression `{0}`")]
    InvalidNth(String),
    #[error("`#{0}` is not a valid id selector")]
    InvalidId(String),
    #[error("unterminated {0}")]
    Unterminated(&'static str),
}

impl SelectorError {
    pub(crate) fn unexpected(found: impl ToString) -> Self {
        Self::UnexpectedToken {
            found: found.to_string(),
        }
    }
}
