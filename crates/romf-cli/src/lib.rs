//! Command implementations behind the `romf` binary.
pub mod commands;
