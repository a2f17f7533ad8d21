//! Error type shared by every stage of the prefetch pipeline.
//!
//! Each variant is a terminal condition for the whole run: nothing is
//! retried, and the first error aborts processing of the remaining sources.
//! The CLI maps variants to process exit codes via [`PrefetchError::exit_code`].

use std::io;

/// Exit status used for every failure that has no OS error number.
pub const EXIT_FAILURE: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum PrefetchError {
    /// A directory scan matched no files.
    #[error("No matching files found in '{root}'.")]
    EnumerationEmpty { root: String },

    /// A remote source could not be retrieved.
    #[error("Error processing '{artifact}': {reason}")]
    Fetch { artifact: String, reason: String },

    /// A local path could not be opened or read.
    #[error("Error processing '{artifact}': {source}")]
    LocalIo {
        artifact: String,
        #[source]
        source: io::Error,
    },

    /// The requested algorithm cannot be expressed in the output mode.
    #[error("Algorithm {algorithm} is not supported in {mode} output")]
    UnsupportedAlgorithm {
        algorithm: &'static str,
        mode: &'static str,
    },

    /// The output mode prints one digest, so `all` is ambiguous.
    #[error("You must specify a hash algorithm (sha1 or sha256) to use with {mode} output")]
    AlgorithmRequired { mode: &'static str },

    /// Metadata reached the renderer without a digest the format needs.
    #[error("artifact metadata has no {algorithm} digest")]
    MissingDigest { algorithm: &'static str },

    /// Writing a rendered record to the output sink failed.
    #[error("failed to write output: {0}")]
    Sink(#[source] io::Error),
}

pub type PrefetchResult<T> = Result<T, PrefetchError>;

impl PrefetchError {
    pub fn fetch(artifact: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }

    pub fn local_io(artifact: impl Into<String>, source: io::Error) -> Self {
        Self::LocalIo {
            artifact: artifact.into(),
            source,
        }
    }

    /// Process exit status for this error.
    ///
    /// Local I/O failures mirror the OS error number when one is known.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::LocalIo { source, .. } => source
                .raw_os_error()
                .filter(|code| *code > 0)
                .unwrap_or(EXIT_FAILURE),
            _ => EXIT_FAILURE,
        }
    }
}
