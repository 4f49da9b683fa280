//! Shared error taxonomy for every core. Cores return `ToolboxError`; only
//! the Dispatcher prints to stderr and maps a variant to an exit code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("provider mismatch: {0}")]
    ProviderMismatch(String),

    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    #[error("decryption failed: {0} (hint: master key may be bound to a different machine)")]
    Decryption(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("external command failed: {0}")]
    External(String),

    #[error("cancelled")]
    Cancelled,

    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl ToolboxError {
    /// Exit code per spec.md §6: 0 success, 1 generic failure, 2 usage error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ToolboxError::Usage(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolboxError>;

impl From<serde_json::Error> for ToolboxError {
    fn from(e: serde_json::Error) -> Self {
        ToolboxError::Parse(e.to_string())
    }
}
