//! Error types for Postiz tools

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PostizError>;

#[derive(Error, Debug)]
pub enum PostizError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl PostizError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PostizError::InvalidInput(_) | PostizError::UnknownTool(_) => 3,
            PostizError::Api(api) if api.is_authentication() => 2,
            PostizError::Api(_) => 1,
            PostizError::Config(_) => 1,
            PostizError::Tool(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failure of a single request against the remote service.
///
/// `operation` is the human phrase prefixed to every message, for example
/// "Failed to create post".
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("{operation}: {message}")]
    Network { operation: String, message: String },

    #[error("{operation}: HTTP status {status}\nResponse Status: {status}\nResponse Body: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("{operation}: response was not valid JSON: {message}")]
    Decode { operation: String, message: String },
}

impl ApiError {
    /// Whether the remote service rejected our credentials
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool file not found at {0}")]
    SourceNotFound(String),

    #[error("Script not found at {0}")]
    ScriptNotFound(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("Process exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Attach failed: {0}")]
    Attach(String),
}
