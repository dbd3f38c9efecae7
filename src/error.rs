//! Error types for ovadeploy
//!
//! Uses `thiserror` for library errors; the binary maps these onto
//! process exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deployment operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Image or configuration path does not exist
    #[error("path not found: {path}")]
    PathNotFound { path: PathBuf },

    /// Malformed appliance configuration document
    #[error("invalid appliance configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The mandatory cloudConnect field is absent or empty
    #[error("appliance configuration must include a non-empty 'cloudConnect' field")]
    MissingCloudConnect,

    /// Recognized key whose value is neither a string nor a list of strings
    #[error("property '{key}' must be a string or a list of strings")]
    InvalidValue { key: String },

    /// ovftool could not be located or did not answer a version query
    #[error("deployment tool '{tool}' not found - install ovftool or set {}", crate::ovftool::OVF_TOOL_ENV)]
    ToolNotFound { tool: String },

    /// ovftool exited with a non-zero status
    #[error("ovftool failed with {}", exit_status(.code))]
    ToolExecution { code: Option<i32> },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
