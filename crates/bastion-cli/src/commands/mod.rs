//! CLI subcommands.

pub(crate) mod digest;
pub(crate) mod inspect;
