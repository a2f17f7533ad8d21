//! Artifact resolution: source reference in, [`ArtifactMetadata`] out.
//!
//! A reference containing `://` is remote and fetched over HTTP(S); anything
//! else is a local path. Name and URL are derived from the reference unless
//! the caller overrides them.
//!
//! Size rules differ by source kind:
//! - remote: bytes actually received during the digest pass
//! - local: length reported by filesystem metadata after the pass
//!
//! The local rule means a file modified while it is being hashed can report a
//! size that does not match its digests. That mismatch is logged, not fixed.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use url::Url;

use crate::config::{AlgorithmSelection, ResolveOptions};
use crate::defaults::{PLACEHOLDER_NAME, PLACEHOLDER_URL, SCHEME_SEPARATOR};
use crate::digest::{stream_digests, HashAlg, StreamDigest};
use crate::errors::{PrefetchError, PrefetchResult};
use crate::fetch::Fetcher;

/// One input to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    Local(PathBuf),
    Remote(String),
}

impl ArtifactSource {
    /// Classify a reference by the presence of a scheme separator.
    pub fn parse(reference: &str) -> Self {
        if reference.contains(SCHEME_SEPARATOR) {
            Self::Remote(reference.to_string())
        } else {
            Self::Local(PathBuf::from(reference))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Everything a declaration needs to know about one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMetadata {
    pub name: String,
    pub url: String,
    pub size: u64,
    /// Lowercase hex digests, keyed by exactly the selected algorithms.
    pub digests: BTreeMap<HashAlg, String>,
}

impl ArtifactMetadata {
    pub fn digest(&self, alg: HashAlg) -> PrefetchResult<&str> {
        self.digests
            .get(&alg)
            .map(String::as_str)
            .ok_or(PrefetchError::MissingDigest {
                algorithm: alg.as_str(),
            })
    }
}

/// Resolves sources into metadata using fixed overrides and algorithm choice.
#[derive(Debug, Clone)]
pub struct Resolver {
    fetcher: Fetcher,
    name: Option<String>,
    url: Option<String>,
    algorithm: AlgorithmSelection,
}

impl Resolver {
    pub fn new(fetcher: Fetcher, options: &ResolveOptions, algorithm: AlgorithmSelection) -> Self {
        Self {
            fetcher,
            name: non_empty_or(options.name.as_deref(), PLACEHOLDER_NAME, "name"),
            url: non_empty_or(options.url.as_deref(), PLACEHOLDER_URL, "url"),
            algorithm,
        }
    }

    /// Read `source` once and describe it.
    pub async fn resolve(&self, source: &ArtifactSource) -> PrefetchResult<ArtifactMetadata> {
        let (default_name, default_url, size, streamed) = match source {
            ArtifactSource::Remote(reference) => {
                info!("File source is a url.");
                let name = remote_basename(reference)?;
                let streamed = self.fetcher.digest_url(reference).await?;
                (name, reference.clone(), streamed.bytes_read, streamed)
            }
            ArtifactSource::Local(path) => {
                info!("File source is the filesystem.");
                let (size, streamed) = digest_local(path).await?;
                (local_basename(path), PLACEHOLDER_URL.to_string(), size, streamed)
            }
        };

        let digests = self
            .algorithm
            .algorithms()
            .iter()
            .map(|alg| (*alg, streamed.hex(*alg).to_string()))
            .collect();

        Ok(ArtifactMetadata {
            name: self.name.clone().unwrap_or(default_name),
            url: self.url.clone().unwrap_or(default_url),
            size,
            digests,
        })
    }
}

/// Hash a local file, then take its size from filesystem metadata.
async fn digest_local(path: &Path) -> PrefetchResult<(u64, StreamDigest)> {
    let artifact = || path.display().to_string();

    let streamed = {
        let mut file = tokio::fs::File::open(path)
            .await
            .map_err(|e| PrefetchError::local_io(artifact(), e))?;
        stream_digests(&mut file)
            .await
            .map_err(|e| PrefetchError::local_io(artifact(), e))?
    };

    let size = tokio::fs::metadata(path)
        .await
        .map_err(|e| PrefetchError::local_io(artifact(), e))?
        .len();
    if size != streamed.bytes_read {
        warn!(
            path = %path.display(),
            size,
            hashed = streamed.bytes_read,
            "file size changed while hashing; reporting filesystem size"
        );
    }

    Ok((size, streamed))
}

/// Last path segment of a URL; empty when the path ends in `/`.
fn remote_basename(reference: &str) -> PrefetchResult<String> {
    let url = Url::parse(reference).map_err(|e| PrefetchError::fetch(reference, e))?;
    Ok(url.path().rsplit('/').next().unwrap_or_default().to_string())
}

fn local_basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// An explicit empty override becomes the placeholder instead of an empty field.
fn non_empty_or(value: Option<&str>, placeholder: &str, field: &str) -> Option<String> {
    match value {
        Some("") => {
            info!(
                field,
                placeholder, "empty override replaced by placeholder; omit the argument to derive it"
            );
            Some(placeholder.to_string())
        }
        other => other.map(str::to_string),
    }
}
