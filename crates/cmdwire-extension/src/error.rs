use std::fmt;

use cmdwire_di::DIError;
use thiserror::Error;

/// Errors raised while wiring or loading commands
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Command {name} not found.")]
    CommandNotFound { name: String },

    #[error("Service '{service_id}' of type {actual} is not a {expected}.")]
    InvalidServiceType {
        service_id: String,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    MissingCollaborator(Message),

    #[error("{0}")]
    InvalidArgument(Message),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Di(#[from] DIError),
}

pub type Result<T> = std::result::Result<T, ExtensionError>;

impl ExtensionError {
    /// Convert into a container error attributed to `extension`
    pub fn into_di(self, extension: &str) -> DIError {
        match self {
            ExtensionError::Di(error) => error,
            other => DIError::Extension {
                extension: extension.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Structured error text with context, problem and an optional solution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    context: String,
    problem: String,
    solution: Option<String>,
}

impl Message {
    pub fn new(context: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            problem: problem.into(),
            solution: None,
        }
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }

    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context: {}\nProblem: {}", self.context, self.problem)?;
        if let Some(solution) = &self.solution {
            write!(f, "\nSolution: {}", solution)?;
        }
        Ok(())
    }
}
