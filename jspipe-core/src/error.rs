//! Error types for jspipe-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The invocation named no input file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Please specify a JavaScript file to optimize.")]
pub struct UsageError;

/// Errors raised by an external collaborator (transpiler, minifier, bundler).
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The executable could not be located.
    #[error("{tool} not found (looked in node_modules/.bin and PATH); install it or pass --{tool}-bin")]
    ToolNotFound {
        /// Tool name, e.g. `babel`.
        tool: &'static str,
    },

    /// The executable was found but could not be launched.
    #[error("failed to launch {tool} ({program}): {source}")]
    Spawn {
        tool: &'static str,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing stdin or collecting output failed.
    #[error("I/O error talking to {tool}: {source}")]
    Io {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported failure.
    #[error("{tool} exited with {status}:\n{stderr}")]
    Failed {
        tool: &'static str,
        /// Rendered exit status.
        status: String,
        /// Captured diagnostics from the tool.
        stderr: String,
    },

    /// The tool's stdout was not UTF-8.
    #[error("{tool} produced output that is not valid UTF-8")]
    InvalidOutput { tool: &'static str },
}

/// Errors that abort a pipeline run.
///
/// Display text leads with the error kind so a log line identifies the failing step.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("FileReadError: cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("FileWriteError: cannot write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TranspileError: {0}")]
    Transpile(#[source] CollaboratorError),

    #[error("MinifyError: {0}")]
    Minify(#[source] CollaboratorError),

    #[error("BundleError: {0}")]
    Bundle(#[source] CollaboratorError),
}

impl PipelineError {
    /// The stage that was executing when the error occurred.
    pub fn stage(&self) -> crate::Stage {
        use crate::Stage;
        match self {
            PipelineError::FileRead { .. } => Stage::Read,
            PipelineError::FileWrite { .. } => Stage::Write,
            PipelineError::Transpile(_) => Stage::Transpile,
            PipelineError::Minify(_) => Stage::Minify,
            PipelineError::Bundle(_) => Stage::Bundle,
        }
    }
}
