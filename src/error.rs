use miette::Diagnostic;
use thiserror::Error;

/// Main error type for asciidiag operations
#[derive(Error, Diagnostic, Debug)]
pub enum DiagramError {
    #[error("IO error: {0}")]
    #[diagnostic(code(asciidiag::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(asciidiag::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(asciidiag::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(asciidiag::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A shape builder was handed a cell set of the wrong topology.
    #[error("Invalid shape: {message}")]
    #[diagnostic(code(asciidiag::shape))]
    InvalidShape { message: String },
}

pub type Result<T> = std::result::Result<T, DiagramError>;
