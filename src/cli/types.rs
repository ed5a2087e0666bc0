use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Wrong number of arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// One argument has an unusable value.
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// Argument name
        arg: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration could not be loaded or rendered.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A PulseAudio operation failed.
    #[error("{service} error: {details}")]
    ServiceError {
        /// Service that failed
        service: String,
        /// Failure details
        details: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CliError {
    /// Wraps a PulseAudio failure.
    pub fn pulse(error: impl std::fmt::Display) -> Self {
        CliError::ServiceError {
            service: "PulseAudio".to_string(),
            details: error.to_string(),
        }
    }
}

/// Result of a command: text to print, or what went wrong.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// Argument name shown in help.
    pub name: String,

    /// What the argument does.
    pub description: String,

    /// Whether the command fails without it.
    pub required: bool,

    /// Expected kind of value.
    pub value_type: ArgType,
}

impl CommandArg {
    /// Required argument.
    pub fn required(name: &str, description: &str, value_type: ArgType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
            value_type,
        }
    }

    /// Optional argument.
    pub fn optional(name: &str, description: &str, value_type: ArgType) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, value_type)
        }
    }
}

/// Kind of value an argument takes, for help text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// Free text, usually a device or source name.
    String,

    /// A number.
    Number,

    /// `on`/`off` style switch.
    Boolean,
}

/// Everything the registry needs to know about a command.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// Command name within its category.
    pub name: String,

    /// One-line description.
    pub description: String,

    /// Accepted arguments, required ones first.
    pub args: Vec<CommandArg>,

    /// Example invocations.
    pub examples: Vec<String>,

    /// Category the command is registered under.
    pub category: String,
}

/// A CLI command.
///
/// Commands receive their dependencies through their constructors. The
/// registry has already checked the argument count against
/// [`Command::metadata`] before `execute` runs.
#[async_trait]
pub trait Command: Send + Sync {
    /// Runs the command.
    ///
    /// # Errors
    /// Returns `CliError` for bad argument values or failed operations
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Name, arguments and help text.
    fn metadata(&self) -> CommandMetadata;
}
