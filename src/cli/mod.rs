//! CLI module for focusbell.
//!
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting
//! - `session`: The interactive session loop and `precache`

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, DeploymentArgs, RunArgs};
pub use display::Display;
pub use session::{run_interactive, run_precache, LineCommand};
