//! Wire codecs for render trees.

pub mod json;
