//! Local-source runs through the full pipeline.

use std::fs;

use anyhow::Result;
use prefetch_core::digest::hash_bytes_hex;
use prefetch_core::prelude::*;

fn write(dir: &std::path::Path, name: &str, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = dir.join(name).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dir.join(name), bytes)?;
    Ok(())
}

#[tokio::test]
async fn local_digests_match_reference() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let bytes: Vec<u8> = (0..=255u8).cycle().take(9_000).collect();
    write(dir.path(), "blob.bin", &bytes)?;

    let mut cfg = RunConfig::new(dir.path().join("blob.bin").to_string_lossy());
    cfg.mode = OutputMode::Manifest;

    let mut out: Vec<String> = Vec::new();
    run(&cfg, &mut out).await?;

    let expected = format!(
        "name=blob.bin sha1={} sha256={} size=9000 url=http://REPLACEME/blob.bin",
        hash_bytes_hex(HashAlg::Sha1, &bytes),
        hash_bytes_hex(HashAlg::Sha256, &bytes)
    );
    assert_eq!(out, vec![expected]);
    Ok(())
}

#[tokio::test]
async fn davis_over_directory_frames_once() -> Result<()> {
    let dir = tempfile::tempdir()?;
    for name in ["one.txt", "two.txt", "three.txt"] {
        write(dir.path(), name, name.as_bytes())?;
    }

    let mut cfg = RunConfig::new(dir.path().to_string_lossy());
    cfg.mode = OutputMode::Davis;

    let mut out: Vec<String> = Vec::new();
    run(&cfg, &mut out).await?;
    let text = out.join("\n");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.iter().filter(|l| **l == "begin prefetch block").count(), 1);
    assert_eq!(lines.iter().filter(|l| **l == "collect prefetch items").count(), 1);
    assert_eq!(lines.iter().filter(|l| **l == "end prefetch block").count(), 1);
    assert_eq!(lines.iter().filter(|l| l.starts_with("add prefetch item ")).count(), 3);
    assert_eq!(lines.first(), Some(&"begin prefetch block"));
    assert_eq!(lines[lines.len() - 2], "collect prefetch items");
    assert_eq!(lines.last(), Some(&"end prefetch block"));
    Ok(())
}

#[tokio::test]
async fn directory_with_one_match_is_a_complete_block() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "only.txt", b"x")?;

    let mut cfg = RunConfig::new(dir.path().to_string_lossy());
    cfg.mode = OutputMode::Davis;
    cfg.algorithm = AlgorithmSelection::Sha1;

    let mut out: Vec<String> = Vec::new();
    run(&cfg, &mut out).await?;
    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("begin prefetch block\n"));
    assert!(out[0].ends_with("\nend prefetch block"));
    Ok(())
}

#[tokio::test]
async fn recursion_flag_controls_depth() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "top.bfa", b"t")?;
    write(dir.path(), "nested/inner.bfa", b"i")?;
    write(dir.path(), "nested/deep/deepest.bfa", b"d")?;
    write(dir.path(), "nested/skip.txt", b"s")?;

    let mut cfg = RunConfig::new(dir.path().to_string_lossy());
    cfg.mode = OutputMode::Value;
    cfg.algorithm = AlgorithmSelection::Sha1;
    cfg.enumerate.pattern = "*.bfa".to_string();

    let mut shallow: Vec<String> = Vec::new();
    run(&cfg, &mut shallow).await?;
    assert_eq!(shallow, vec![hash_bytes_hex(HashAlg::Sha1, b"t")]);

    cfg.enumerate.recursive = true;
    let mut deep: Vec<String> = Vec::new();
    run(&cfg, &mut deep).await?;
    assert_eq!(
        deep,
        vec![
            hash_bytes_hex(HashAlg::Sha1, b"t"),
            hash_bytes_hex(HashAlg::Sha1, b"i"),
            hash_bytes_hex(HashAlg::Sha1, b"d"),
        ]
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failure_mid_run_keeps_earlier_records() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "a.txt", b"a")?;
    std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("b.txt"))?;
    write(dir.path(), "c.txt", b"c")?;

    let mut cfg = RunConfig::new(dir.path().to_string_lossy());
    cfg.algorithm = AlgorithmSelection::Sha1;

    let mut out: Vec<String> = Vec::new();
    let err = run(&cfg, &mut out).await.unwrap_err();

    assert_eq!(out.len(), 1);
    assert!(out[0].starts_with("prefetch a.txt sha1:"));
    match &err {
        PrefetchError::LocalIo { artifact, .. } => assert!(artifact.ends_with("b.txt")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.exit_code(), 2); // ENOENT
    Ok(())
}

/// Local size comes from filesystem metadata, not from the hashed bytes.
/// procfs files report a length of zero while yielding content, which makes
/// the two disagree; that disagreement is the expected, preserved behavior.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn local_size_is_metadata_not_bytes_hashed() -> Result<()> {
    let fetcher = Fetcher::new(&FetchOptions::default())?;
    let resolver = Resolver::new(fetcher, &ResolveOptions::default(), AlgorithmSelection::Sha256);

    let meta = resolver
        .resolve(&ArtifactSource::parse("/proc/self/status"))
        .await?;

    assert_eq!(meta.size, 0);
    assert_ne!(meta.digest(HashAlg::Sha256)?, hash_bytes_hex(HashAlg::Sha256, b""));
    Ok(())
}
