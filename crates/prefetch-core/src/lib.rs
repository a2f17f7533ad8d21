//! prefetch-core
//!
//! Core primitives for make-prefetch:
//! - source enumeration (single file, URL, or filtered directory walk)
//! - single-pass SHA-1 / SHA-256 streaming with size measurement
//! - artifact resolution (display name, download URL, overrides)
//! - BigFix declaration rendering (prefetch, manifest, value, davis block)
//!
//! The crate performs file and network I/O but never writes output itself;
//! rendered records are handed to a caller-provided [`pipeline::RecordSink`].

pub mod config;
pub mod digest;
pub mod enumerate;
pub mod errors;
pub mod fetch;
pub mod pipeline;
pub mod render;
pub mod resolve;

pub use crate::errors::{PrefetchError, PrefetchResult};

/// Fixed values shared across stages.
pub mod defaults {
    /// Read size for the digest pass.
    pub const CHUNK_SIZE: usize = 4096;
    /// Directory scan pattern when none is given.
    pub const PATTERN: &str = "*.*";
    /// Marks a source reference as remote.
    pub const SCHEME_SEPARATOR: &str = "://";
    /// Stands in for an empty name override.
    pub const PLACEHOLDER_NAME: &str = "REPLACEME";
    /// Download URL for local sources, and stands in for an empty URL override.
    pub const PLACEHOLDER_URL: &str = "http://REPLACEME";
}

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{
        validate_config, AlgorithmSelection, EnumerateOptions, FetchOptions, OutputMode, ResolveOptions,
        RunConfig,
    };
    pub use crate::digest::{hash_bytes_hex, HashAlg, StreamDigest};
    pub use crate::enumerate::{enumerate_sources, NamePattern};
    pub use crate::fetch::Fetcher;
    pub use crate::pipeline::{run, run_with_fetcher, RecordSink, RunReport};
    pub use crate::render::{render_record, select_format, Position, RecordFormat};
    pub use crate::resolve::{ArtifactMetadata, ArtifactSource, Resolver};
    pub use crate::{PrefetchError, PrefetchResult};
}
