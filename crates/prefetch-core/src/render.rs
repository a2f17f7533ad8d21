//! Declaration rendering.
//!
//! A [`RecordFormat`] is chosen once per run from the (mode, algorithm) pair
//! and then applied to every artifact. Selection is where unsupported
//! combinations are rejected, so no source is read for a run that could never
//! render.
//!
//! A record may span several lines (davis framing); lines are joined with
//! `\n` and the record carries no trailing newline.

use std::fmt;

use crate::config::{AlgorithmSelection, OutputMode};
use crate::digest::HashAlg;
use crate::errors::{PrefetchError, PrefetchResult};
use crate::resolve::ArtifactMetadata;

pub const BLOCK_BEGIN: &str = "begin prefetch block";
pub const BLOCK_COLLECT: &str = "collect prefetch items";
pub const BLOCK_END: &str = "end prefetch block";

/// Where an artifact sits in the run. Only davis output looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    First,
    Middle,
    Last,
    Only,
}

impl Position {
    /// Position of the artifact at `index` in a run of `total` artifacts.
    pub fn for_index(index: usize, total: usize) -> Self {
        if total <= 1 {
            Self::Only
        } else if index == 0 {
            Self::First
        } else if index + 1 == total {
            Self::Last
        } else {
            Self::Middle
        }
    }
}

/// Output strategy for one (mode, algorithm) combination.
pub trait RecordFormat: fmt::Debug + Send + Sync {
    fn render(&self, meta: &ArtifactMetadata, position: Position) -> PrefetchResult<String>;
}

/// Pick the strategy for `mode` and `algorithm`.
pub fn select_format(mode: OutputMode, algorithm: AlgorithmSelection) -> PrefetchResult<Box<dyn RecordFormat>> {
    let unsupported = || PrefetchError::UnsupportedAlgorithm {
        algorithm: algorithm.as_str(),
        mode: mode.as_str(),
    };

    let format: Box<dyn RecordFormat> = match mode {
        OutputMode::Prefetch => Box::new(PrefetchStatement(algorithm)),
        OutputMode::Manifest => Box::new(ManifestLine(algorithm)),
        OutputMode::Value => match algorithm {
            AlgorithmSelection::Sha1 => Box::new(HashValue(HashAlg::Sha1)),
            AlgorithmSelection::Sha256 => Box::new(HashValue(HashAlg::Sha256)),
            AlgorithmSelection::Both => return Err(PrefetchError::AlgorithmRequired { mode: mode.as_str() }),
        },
        OutputMode::Davis => match algorithm {
            AlgorithmSelection::Sha1 | AlgorithmSelection::Both => Box::new(DavisBlock),
            AlgorithmSelection::Sha256 => return Err(unsupported()),
        },
    };
    Ok(format)
}

/// One-shot helper: select and render in a single call.
pub fn render_record(
    mode: OutputMode,
    algorithm: AlgorithmSelection,
    meta: &ArtifactMetadata,
    position: Position,
) -> PrefetchResult<String> {
    select_format(mode, algorithm)?.render(meta, position)
}

/// `prefetch <name> sha1:<h> size:<n> <url> sha256:<h>`
#[derive(Debug)]
struct PrefetchStatement(AlgorithmSelection);

impl RecordFormat for PrefetchStatement {
    fn render(&self, meta: &ArtifactMetadata, _position: Position) -> PrefetchResult<String> {
        let ArtifactMetadata { name, url, size, .. } = meta;
        Ok(match self.0 {
            AlgorithmSelection::Sha1 => {
                let sha1 = meta.digest(HashAlg::Sha1)?;
                format!("prefetch {name} sha1:{sha1} size:{size} {url}")
            }
            AlgorithmSelection::Sha256 => {
                let sha256 = meta.digest(HashAlg::Sha256)?;
                format!("prefetch {name} size:{size} {url} sha256:{sha256}")
            }
            AlgorithmSelection::Both => {
                let sha1 = meta.digest(HashAlg::Sha1)?;
                let sha256 = meta.digest(HashAlg::Sha256)?;
                format!("prefetch {name} sha1:{sha1} size:{size} {url} sha256:{sha256}")
            }
        })
    }
}

/// `name=<name> sha1=<h> sha256=<h> size=<n> url=<base>/<name>`
///
/// The URL is treated as a base and the artifact name is appended.
#[derive(Debug)]
struct ManifestLine(AlgorithmSelection);

impl RecordFormat for ManifestLine {
    fn render(&self, meta: &ArtifactMetadata, _position: Position) -> PrefetchResult<String> {
        let ArtifactMetadata { name, url, size, .. } = meta;
        Ok(match self.0 {
            AlgorithmSelection::Sha1 => {
                let sha1 = meta.digest(HashAlg::Sha1)?;
                format!("name={name} sha1={sha1} size={size} url={url}/{name}")
            }
            AlgorithmSelection::Sha256 => {
                let sha256 = meta.digest(HashAlg::Sha256)?;
                format!("name={name} sha256={sha256} size={size} url={url}/{name}")
            }
            AlgorithmSelection::Both => {
                let sha1 = meta.digest(HashAlg::Sha1)?;
                let sha256 = meta.digest(HashAlg::Sha256)?;
                format!("name={name} sha1={sha1} sha256={sha256} size={size} url={url}/{name}")
            }
        })
    }
}

#[derive(Debug)]
struct HashValue(HashAlg);

impl RecordFormat for HashValue {
    fn render(&self, meta: &ArtifactMetadata, _position: Position) -> PrefetchResult<String> {
        Ok(meta.digest(self.0)?.to_string())
    }
}

/// Legacy `add prefetch item` lines inside a prefetch block.
#[derive(Debug)]
struct DavisBlock;

impl RecordFormat for DavisBlock {
    fn render(&self, meta: &ArtifactMetadata, position: Position) -> PrefetchResult<String> {
        let ArtifactMetadata { name, url, size, .. } = meta;
        let sha1 = meta.digest(HashAlg::Sha1)?;
        let item = format!("add prefetch item name={name} sha1={sha1} size={size} url={url}");
        let item = item.as_str();

        let lines: Vec<&str> = match position {
            Position::Only => vec![BLOCK_BEGIN, item, BLOCK_COLLECT, BLOCK_END],
            Position::First => vec![BLOCK_BEGIN, item],
            Position::Middle => vec![item],
            Position::Last => vec![item, BLOCK_COLLECT, BLOCK_END],
        };
        Ok(lines.join("\n"))
    }
}
