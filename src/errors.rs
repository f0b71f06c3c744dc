/*!
 * Error types for the scenewriter application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the script annotation engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The replace-from and replace-to lists have different line counts
    #[error("Replacement lists do not line up: {from_lines} 'from' line(s) vs {to_lines} 'to' line(s)")]
    MismatchedPairCount {
        /// Number of lines in the 'from' list
        from_lines: usize,
        /// Number of lines in the 'to' list
        to_lines: usize,
    },

    /// No usable replacement pair was supplied
    #[error("No replacement pairs were supplied")]
    EmptyInput,

    /// A single-scene scope points past the end of the scene list
    #[error("Scene {index} is out of range (project has {count} scene(s))")]
    SceneOutOfRange {
        /// Requested zero-based scene index
        index: usize,
        /// Number of scenes available
        count: usize,
    },
}

impl ScriptError {
    /// Whether this condition is a notice rather than a hard failure
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }
}

/// Errors that can occur while loading or saving a project file
#[derive(Error, Debug)]
pub enum ProjectError {
    /// The project file could not be parsed
    #[error("Failed to parse project file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The project file could not be read or written
    #[error("Project I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input path is neither a project file, a scene file nor a directory
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the annotation engine
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from the project collaborator
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
