use prefetch_core::pipeline::{self, RunReport};
use prefetch_core::PrefetchResult;
use tracing::debug;

use crate::args::Cli;
use crate::output::OutputSink;

pub async fn dispatch(cli: Cli) -> PrefetchResult<RunReport> {
    let cfg = cli.to_config();
    debug!(?cfg, "resolved configuration");

    let mut sink = OutputSink::new(cli.file_output);
    pipeline::run(&cfg, &mut sink).await
}
