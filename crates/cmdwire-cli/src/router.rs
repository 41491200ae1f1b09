// Argument parsing and dispatch

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cmdwire_console::{Application, ConsoleOutput, Output};
use cmdwire_di::{Compiler, Container};
use cmdwire_extension::ConsoleExtension;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::logging;

/// cmdwire - run console commands wired through a DI container
#[derive(Parser, Debug)]
#[command(name = "cmdwire")]
#[command(bin_name = "cmdwire")]
#[command(about = "Run console commands wired through a DI container")]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to run; lists commands when omitted
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Arguments passed to the command
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Tokens handed to the application
    pub fn application_args(&self) -> Vec<String> {
        self.command
            .iter()
            .chain(self.args.iter())
            .cloned()
            .collect()
    }

    pub fn load_config(&self) -> Result<CliConfig> {
        match &self.config {
            Some(path) => CliConfig::load_from_file(path),
            None => Ok(CliConfig::default()),
        }
    }

    /// Parse arguments, run the requested command and return its exit code
    pub fn route() -> Result<i32> {
        let cli = Cli::parse();
        logging::init_logging(cli.verbose);
        cli.execute(&mut ConsoleOutput::new())
    }

    pub fn execute(&self, output: &mut dyn Output) -> Result<i32> {
        let config = self.load_config()?;
        let application = build_application(config)?;

        let args = self.application_args();
        debug!("Running {:?}", args);
        let code = application.run(args, output)?;
        info!("Command finished with exit code {}", code);
        Ok(code)
    }
}

/// Compile a container holding the console extension's services
pub fn compile_container(config: CliConfig) -> Result<Arc<Container>> {
    let mut compiler = Compiler::new();
    compiler
        .set_parameters(config.parameters)
        .export_parameters(config.export_parameters);
    compiler.with_discovered_services()?;
    compiler.add_extension(ConsoleExtension::new(config.console))?;

    let container = compiler.compile().context("Failed to compile container")?;
    info!("Compiled container with {} services", container.service_count());
    Ok(container)
}

/// Compile a container and fetch its application
pub fn build_application(config: CliConfig) -> Result<Arc<Application>> {
    let container = compile_container(config)?;
    let application = container
        .get_by_type::<Application>()
        .context("Container has no console application")?;
    Ok(application)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_and_args() {
        let cli = Cli::try_parse_from(["cmdwire", "-v", "greet", "world", "--loud"]).unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.command.as_deref(), Some("greet"));
        assert_eq!(cli.application_args(), vec!["greet", "world", "--loud"]);
    }

    #[test]
    fn test_parse_without_command() {
        let cli = Cli::try_parse_from(["cmdwire", "--config", "app.yaml"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("app.yaml")));
        assert!(cli.application_args().is_empty());
    }
}
