//! CLI command implementations

pub(crate) mod common;
pub(crate) mod history;
pub(crate) mod run;
pub(crate) mod status;
pub(crate) mod unlock;
pub(crate) mod validate;
