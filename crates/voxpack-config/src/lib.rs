//! Configuration for voxpack tools.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and are compared on reload to detect edits.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DemoConfig, default_config_dir};
pub use error::ConfigError;
