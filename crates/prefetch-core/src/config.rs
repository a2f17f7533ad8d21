//! Configuration structures for prefetch-core.
//!
//! Every stage receives its configuration explicitly from the caller; the
//! core crate never reads process-wide state. The CLI builds a [`RunConfig`]
//! from its arguments and hands it to [`crate::pipeline::run`].

use std::time::Duration;

use crate::defaults;
use crate::digest::HashAlg;
use crate::errors::{PrefetchError, PrefetchResult};

/// Full configuration for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// File path, URL, or directory to describe.
    pub source: String,
    pub algorithm: AlgorithmSelection,
    pub mode: OutputMode,
    pub resolve: ResolveOptions,
    pub enumerate: EnumerateOptions,
    pub fetch: FetchOptions,
}

impl RunConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            algorithm: AlgorithmSelection::default(),
            mode: OutputMode::default(),
            resolve: ResolveOptions::default(),
            enumerate: EnumerateOptions::default(),
            fetch: FetchOptions::default(),
        }
    }
}

/// Name and URL overrides applied to every resolved artifact.
///
/// `None` means "derive from the source"; `Some("")` is replaced by the
/// placeholder values at resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Directory scan options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerateOptions {
    /// fnmatch-style pattern applied to file names.
    pub pattern: String,
    pub recursive: bool,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            pattern: defaults::PATTERN.to_string(),
            recursive: false,
        }
    }
}

/// Remote fetch options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Which digests to compute and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmSelection {
    Sha1,
    Sha256,
    #[default]
    Both,
}

impl AlgorithmSelection {
    /// Name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Both => "all",
        }
    }

    /// Concrete algorithms covered by this selection.
    pub fn algorithms(&self) -> &'static [HashAlg] {
        match self {
            Self::Sha1 => &[HashAlg::Sha1],
            Self::Sha256 => &[HashAlg::Sha256],
            Self::Both => &[HashAlg::Sha1, HashAlg::Sha256],
        }
    }

    pub fn includes(&self, alg: HashAlg) -> bool {
        self.algorithms().contains(&alg)
    }
}

/// Output format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Single-line ActionScript `prefetch` statement.
    #[default]
    Prefetch,
    /// `name=... size=... url=...` manifest line for dynamic downloads.
    Manifest,
    /// Bare hash value.
    Value,
    /// Legacy prefetch block (`begin prefetch block` ... `end prefetch block`).
    Davis,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefetch => "prefetch",
            Self::Manifest => "manifest",
            Self::Value => "value",
            Self::Davis => "davis",
        }
    }
}

/// Reject algorithm/mode combinations that have no rendering.
///
/// Runs before any source is touched.
pub fn validate_config(cfg: &RunConfig) -> PrefetchResult<()> {
    match (cfg.mode, cfg.algorithm) {
        (OutputMode::Davis, AlgorithmSelection::Sha256) => Err(PrefetchError::UnsupportedAlgorithm {
            algorithm: cfg.algorithm.as_str(),
            mode: cfg.mode.as_str(),
        }),
        (OutputMode::Value, AlgorithmSelection::Both) => Err(PrefetchError::AlgorithmRequired {
            mode: cfg.mode.as_str(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RunConfig::new("hello.txt");
        validate_config(&cfg).unwrap();
        assert_eq!(cfg.enumerate.pattern, "*.*");
        assert!(!cfg.enumerate.recursive);
        assert_eq!(cfg.algorithm, AlgorithmSelection::Both);
        assert_eq!(cfg.mode, OutputMode::Prefetch);
    }

    #[test]
    fn davis_rejects_sha256_only() {
        let mut cfg = RunConfig::new("hello.txt");
        cfg.mode = OutputMode::Davis;
        cfg.algorithm = AlgorithmSelection::Sha256;
        assert!(matches!(
            validate_config(&cfg),
            Err(PrefetchError::UnsupportedAlgorithm { algorithm: "sha256", mode: "davis" })
        ));

        cfg.algorithm = AlgorithmSelection::Both;
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn value_requires_a_concrete_algorithm() {
        let mut cfg = RunConfig::new("hello.txt");
        cfg.mode = OutputMode::Value;
        assert!(matches!(
            validate_config(&cfg),
            Err(PrefetchError::AlgorithmRequired { mode: "value" })
        ));

        cfg.algorithm = AlgorithmSelection::Sha1;
        validate_config(&cfg).unwrap();
    }

    #[test]
    fn selection_covers_expected_algorithms() {
        assert!(AlgorithmSelection::Both.includes(HashAlg::Sha1));
        assert!(AlgorithmSelection::Both.includes(HashAlg::Sha256));
        assert!(!AlgorithmSelection::Sha1.includes(HashAlg::Sha256));
    }
}
