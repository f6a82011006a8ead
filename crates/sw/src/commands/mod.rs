//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod directive;
pub(crate) mod serve;

pub(crate) use check::CheckArgs;
pub(crate) use directive::DirectiveArgs;
pub(crate) use serve::ServeArgs;
