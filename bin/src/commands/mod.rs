//! CLI command implementations.

pub(crate) mod aggregate;
pub(crate) mod run;
pub(crate) mod tasks;
