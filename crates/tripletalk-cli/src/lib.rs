//! Command-line front end for the Triple-Talk speech driver.
//!
//! The `tt` binary lists voices, checks a device, prints the resolved
//! configuration and speaks text with inline markup. `--dry-run` prints the
//! device byte stream instead of writing it.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used only by the binary target.
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod markup;
pub mod parser;

pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;
