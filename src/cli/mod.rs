//! Command-line host for the resource service

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
