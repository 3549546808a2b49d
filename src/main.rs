use anyhow::{Context, Result};
use config::MergeConfig;
use pkimerge::MergeStats;
use tokio_util::sync::CancellationToken;

mod certgraph;
mod config;
mod file_utils;
mod logging;
mod pki_merge;
mod pkimerge;
mod raw_data;
mod runtime;

fn main() -> Result<()> {
    let config = MergeConfig::new().context("parsing configuration")?;

    logging::init(config.log_level).context("initializing logging")?;

    let runtime = runtime::prepare_tokio_runtime(config.threads).context("preparing tokio runtime")?;

    let cancel = CancellationToken::new();
    let mut merge_stats = MergeStats::default();

    let run_result = runtime.block_on(async {
        tokio::spawn(pkimerge::cancel_on_ctrl_c(cancel.clone()));
        pkimerge::run(&config, &cancel, &mut merge_stats).await
    });

    logging::generate_summary(&config, Some(merge_stats), run_result.as_ref().ok().cloned()).context("generating summary")?;

    run_result.map(|_| ())
}
