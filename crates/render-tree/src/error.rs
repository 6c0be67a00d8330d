use thiserror::Error;

/// Errors raised while decoding a tree from its wire form.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    /// The record has none of `componentId`, `tag`, `text`, `comment`, `fragment`.
    #[error("UNCLASSIFIABLE_NODE")]
    Unclassifiable,
    #[error("NOT_AN_OBJECT")]
    NotAnObject,
    #[error("INVALID_FIELD: {0}")]
    InvalidField(String),
}
