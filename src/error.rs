//! Error types for certgen library.

use std::io;
use thiserror::Error;

/// Result type alias for certgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating certificates.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The attendee list could not be parsed or contained no names.
    #[error("Failed to load attendee list: {0}")]
    Load(String),

    /// The declared input kind is recognised but not supported.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The template document is unreadable or corrupt.
    #[error("Template error: {0}")]
    Template(String),

    /// No external renderer could be found or none was configured.
    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// The external renderer failed for a specific file.
    #[error("Conversion failed for {file}: {reason}")]
    Conversion {
        /// File handed to the renderer
        file: String,
        /// Exit status, stderr or timeout description
        reason: String,
    },

    /// Assembling the archive or merged document failed.
    #[error("Packaging error: {0}")]
    Packaging(String),

    /// A caller-supplied parameter is invalid.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A failure attributed to one recipient of the batch.
    #[error("Recipient #{index} ({name}): {source}")]
    Recipient {
        /// 1-based recipient index
        index: usize,
        /// Recipient display name
        name: String,
        /// Underlying error
        source: Box<Error>,
    },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Attendee list loading
    Load,
    /// Template reading or writing
    Template,
    /// External rendering
    Conversion,
    /// Archive or PDF assembly
    Packaging,
    /// Invalid parameters
    Input,
    /// Filesystem
    Io,
}

impl Stage {
    /// Process exit code used by the command-line tool.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::Input => 2,
            Stage::Load => 3,
            Stage::Template => 4,
            Stage::Conversion => 5,
            Stage::Packaging => 6,
            Stage::Io => 1,
        }
    }
}

impl Error {
    /// Wrap this error with the recipient it occurred for.
    ///
    /// Errors that already name a recipient are returned unchanged.
    pub fn for_recipient(self, index: usize, name: impl Into<String>) -> Self {
        if matches!(self, Error::Recipient { .. }) {
            return self;
        }
        Error::Recipient {
            index,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// The pipeline stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Io(_) | Error::Other(_) => Stage::Io,
            Error::Load(_) | Error::UnsupportedFormat(_) => Stage::Load,
            Error::Template(_) => Stage::Template,
            Error::RendererUnavailable(_) | Error::Conversion { .. } => Stage::Conversion,
            Error::Packaging(_) => Stage::Packaging,
            Error::InvalidInput(_) => Stage::Input,
            Error::Recipient { source, .. } => source.stage(),
        }
    }

    /// Whether retrying the same operation might succeed.
    ///
    /// Only renderer failures for a specific file qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Conversion { .. } => true,
            Error::Recipient { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Packaging(err.to_string()),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Load(err.to_string())
    }
}
