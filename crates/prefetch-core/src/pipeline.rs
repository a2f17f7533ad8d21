//! End-to-end run: validate, enumerate, resolve, render, emit.
//!
//! Sources are processed strictly one after another. The first failure
//! aborts the run; records already handed to the sink stay written.

use std::io;

use tracing::info;

use crate::config::{validate_config, RunConfig};
use crate::enumerate::enumerate_sources;
use crate::errors::{PrefetchError, PrefetchResult};
use crate::fetch::Fetcher;
use crate::render::{select_format, Position};
use crate::resolve::Resolver;

/// Destination for rendered records.
///
/// Records carry no trailing newline; the sink terminates each one.
pub trait RecordSink {
    fn write_record(&mut self, record: &str) -> io::Result<()>;
}

impl RecordSink for Vec<String> {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        self.push(record.to_string());
        Ok(())
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub records: usize,
}

/// Run with an HTTP client built from `cfg.fetch`.
pub async fn run<S>(cfg: &RunConfig, sink: &mut S) -> PrefetchResult<RunReport>
where
    S: RecordSink + ?Sized,
{
    validate_config(cfg)?;
    let fetcher = Fetcher::new(&cfg.fetch)?;
    run_with_fetcher(cfg, fetcher, sink).await
}

/// Run with a caller-supplied fetcher.
pub async fn run_with_fetcher<S>(cfg: &RunConfig, fetcher: Fetcher, sink: &mut S) -> PrefetchResult<RunReport>
where
    S: RecordSink + ?Sized,
{
    validate_config(cfg)?;
    let format = select_format(cfg.mode, cfg.algorithm)?;
    let sources = enumerate_sources(&cfg.source, &cfg.enumerate)?;
    let resolver = Resolver::new(fetcher, &cfg.resolve, cfg.algorithm);

    let total = sources.len();
    for (index, source) in sources.iter().enumerate() {
        info!("Processing {source}...({} of {total})", index + 1);

        let meta = resolver.resolve(source).await?;
        let record = format.render(&meta, Position::for_index(index, total))?;
        sink.write_record(&record).map_err(PrefetchError::Sink)?;
    }

    Ok(RunReport { records: total })
}
