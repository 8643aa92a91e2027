//! Command-line interface

pub mod args;
mod execute;

pub use args::{Cli, LogFormat};
pub use execute::{build_request, execute, resolve_workdir};
