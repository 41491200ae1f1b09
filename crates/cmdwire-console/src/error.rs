use thiserror::Error;

/// Errors that can occur while loading or running console commands
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Command \"{name}\" is not defined.")]
    CommandNotFound { name: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Failed to load command '{name}': {source}")]
    Loader {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command execution failed: {0}")]
    Execution(#[from] anyhow::Error),
}

pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
