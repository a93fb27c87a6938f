//! Command-line interface components
//!
//! This module contains CLI-specific code for the reqlint application,
//! including argument parsing and command handlers.

pub mod args;
pub mod commands;

pub use args::{
    CheckArgs, Cli, Commands, ConfigAction, ConfigArgs, DiffArgs, GlobalArgs, InfoArgs, ListArgs,
    SatisfiesArgs,
};
pub use commands::{
    handle_check, handle_config, handle_diff, handle_info, handle_list, handle_satisfies,
};
