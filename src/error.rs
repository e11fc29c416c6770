//! Error handling for the g8gen application.
//! Defines custom error types and results used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for g8gen operations.
///
/// This enum represents all possible errors that can occur while collecting fields,
/// rendering templates and writing the generated project.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors raised while walking a template directory
    #[error("Directory traversal error: {0}.")]
    WalkDirError(#[from] walkdir::Error),

    /// A malformed placeholder was found while parsing template text
    #[error("Syntax error at byte {offset}: {message}.")]
    Syntax { message: String, offset: usize },

    /// A placeholder references a filter the registry does not know
    #[error("Unknown filter '{name}'.")]
    UnknownFilter { name: String },

    /// A placeholder references a field that has no value
    #[error("Field '{field}' is referenced by the template but has no value.")]
    UnresolvedField { field: String },

    /// The `name` field is missing or normalizes to nothing
    #[error("No [name] parameter defined: the target directory name is empty.")]
    TargetNameError,

    /// A rendered destination path escapes the target directory or is empty
    #[error("Invalid destination path: '{path}'.")]
    InvalidPath { path: String },

    /// A verbatim pattern could not be compiled
    #[error("Verbatim pattern error: {0}.")]
    VerbatimPatternError(String),

    /// The parameter defaults file could not be parsed
    #[error("Properties error at line {line}: {message}.")]
    PropertiesError { line: usize, message: String },

    /// Interactive field collection failed
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// Preloaded answers could not be read
    #[error("Answers error: {0}.")]
    AnswersError(String),

    #[error("Template directory '{template_dir}' does not exist or has no code base.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("Scaffold '{scaffold_dir}' is not readable, or not a directory.")]
    ScaffoldNotFoundError { scaffold_dir: String },

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    /// Wraps any failure that happened while processing a single template entry
    #[error("Failed to process '{}': {source}", path.display())]
    ProcessError {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attaches the path of the entry being processed to an error.
    pub fn in_file<P: Into<PathBuf>>(self, path: P) -> Self {
        match self {
            Error::ProcessError { .. } => self,
            other => Error::ProcessError { path: path.into(), source: Box::new(other) },
        }
    }
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
