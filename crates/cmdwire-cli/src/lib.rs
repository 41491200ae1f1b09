//! cmdwire command line
//!
//! Loads a configuration file, compiles a container with the console
//! extension and runs the resulting application.

pub mod config;
pub mod logging;
pub mod router;

pub use config::CliConfig;
pub use router::{build_application, compile_container, Cli};
