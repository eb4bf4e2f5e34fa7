//! Library surface behind the `patchgraf` binary, split out so integration
//! tests can exercise argument parsing and error formatting directly.

pub mod cli;
pub mod commands;
pub mod error;
pub mod patchfile;
