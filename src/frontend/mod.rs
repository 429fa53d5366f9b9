//! Frontend components
//!
//! Configuration, the command line front end and the demo bindings it
//! exposes.

pub mod cli;
pub mod config;
pub mod prelude;

pub use cli::main as cli_main;
pub use config::Config;
