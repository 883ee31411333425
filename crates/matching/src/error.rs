use css::SelectorError;
use dom::NodeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid selector `{selector}`: {source}")]
    Syntax {
        selector: String,
        #[source]
        source: SelectorError,
    },
    #[error("node {0:?} is not an element or document")]
    InvalidNode(NodeId),
}

impl QueryError {
    pub fn syntax(selector: &str, source: SelectorError) -> Self {
        Self::Syntax {
            selector: selector.to_string(),
            source,
        }
    }
}
