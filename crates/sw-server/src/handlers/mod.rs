//! HTTP request handlers.

pub(crate) mod bootstrap;
pub(crate) mod content;
