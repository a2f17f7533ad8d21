//! Streaming digest computation.
//!
//! Every artifact is read exactly once. Each chunk is fed to a SHA-1 and a
//! SHA-256 accumulator plus a byte counter, whichever algorithm the caller
//! eventually renders. Output hex is always lowercase.
//!
//! Supported algorithms:
//! - sha1
//! - sha256

use std::io;

use sha1::Sha1;
use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::defaults::CHUNK_SIZE;

/// Hash algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HashAlg {
    Sha1,
    Sha256,
}

impl HashAlg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

/// Result of one full pass over a byte source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDigest {
    /// Bytes observed during the pass.
    pub bytes_read: u64,
    pub sha1: String,
    pub sha256: String,
}

impl StreamDigest {
    pub fn hex(&self, alg: HashAlg) -> &str {
        match alg {
            HashAlg::Sha1 => &self.sha1,
            HashAlg::Sha256 => &self.sha256,
        }
    }
}

/// Running SHA-1 + SHA-256 state with a byte counter.
///
/// Sources that are not `AsyncRead` (HTTP bodies) feed chunks through
/// [`DigestAccumulator::update`] directly.
#[derive(Debug, Clone, Default)]
pub struct DigestAccumulator {
    sha1: Sha1,
    sha256: Sha256,
    bytes_read: u64,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.sha1.update(chunk);
        self.sha256.update(chunk);
        self.bytes_read += chunk.len() as u64;
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn finish(self) -> StreamDigest {
        StreamDigest {
            bytes_read: self.bytes_read,
            sha1: hex::encode(self.sha1.finalize()),
            sha256: hex::encode(self.sha256.finalize()),
        }
    }
}

/// Read `reader` to exhaustion in `CHUNK_SIZE` chunks and digest it.
///
/// Read errors are returned unchanged; the caller attaches source context.
pub async fn stream_digests<R>(reader: &mut R) -> io::Result<StreamDigest>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut acc = DigestAccumulator::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        acc.update(&buf[..n]);
    }
    Ok(acc.finish())
}

/// Hash an in-memory buffer and return lowercase hex.
pub fn hash_bytes_hex(alg: HashAlg, bytes: &[u8]) -> String {
    match alg {
        HashAlg::Sha1 => hex::encode(Sha1::digest(bytes)),
        HashAlg::Sha256 => hex::encode(Sha256::digest(bytes)),
    }
}
