use crate::{
    certgraph::PkiList,
    config::{path::ConfigPath, MergeConfig, OutputFormat},
    file_utils,
    pki_merge::merge_raw_pki_lists,
    raw_data,
};
use anyhow::{ensure, Context, Result};
use fn_error_context::context;
use tokio_util::sync::CancellationToken;

mod timing;

pub(crate) use timing::{RunTime, RunTimes};

/// What went into the merge and what came out of it, for the run summary
#[derive(serde::Serialize, Default, Debug)]
pub(crate) struct MergeStats {
    pub(crate) raw_pki_lists: Vec<String>,
    pub(crate) cert_key_pairs: usize,
    pub(crate) certificate_authority_bundles: usize,
    pub(crate) errors: Vec<String>,
}

pub(crate) async fn run(config: &MergeConfig, cancel: &CancellationToken, merge_stats: &mut MergeStats) -> Result<RunTimes> {
    let start = std::time::Instant::now();
    let pki_lists = load(config, merge_stats).await.context("loading raw data")?;
    let load_run_time = RunTime::since_start(start);

    ensure_not_cancelled(cancel)?;

    let start = std::time::Instant::now();
    let merged = merge(cancel, &pki_lists, merge_stats)?;
    let merge_run_time = RunTime::since_start(start);

    ensure_not_cancelled(cancel)?;

    let start = std::time::Instant::now();
    match &config.output {
        Some(output) => write_pki_list(&merged, output, config.output_format).await?,
        None => log::info!("no output requested, not writing the merged PKI list"),
    }
    let write_run_time = RunTime::since_start(start);

    Ok(RunTimes {
        load_run_time,
        merge_run_time,
        write_run_time,
    })
}

async fn load(config: &MergeConfig, merge_stats: &mut MergeStats) -> Result<Vec<PkiList>> {
    let paths = raw_data::collect_raw_data_paths(&config.raw_data_dirs, &config.raw_data_files).context("collecting raw data files")?;

    if paths.is_empty() {
        log::warn!("no raw PKI lists found, the merged PKI list will be empty");
    }

    let raw_pki_lists = raw_data::load_raw_pki_lists(paths).await?;

    merge_stats.raw_pki_lists = raw_pki_lists
        .iter()
        .map(|raw_pki_list| raw_pki_list.path.display().to_string())
        .collect();

    Ok(raw_pki_lists.into_iter().map(|raw_pki_list| raw_pki_list.pki_list).collect())
}

fn merge(cancel: &CancellationToken, pki_lists: &[PkiList], merge_stats: &mut MergeStats) -> Result<PkiList> {
    let merged = match merge_raw_pki_lists(cancel, pki_lists) {
        Ok(merged) => merged,
        Err(merge_errors) => {
            for merge_error in merge_errors.errors() {
                log::error!("{}", merge_error);
                merge_stats.errors.push(merge_error.to_string());
            }

            return Err(merge_errors).context("merging raw PKI lists");
        }
    };

    merge_stats.cert_key_pairs = merged.cert_key_pairs.items.len();
    merge_stats.certificate_authority_bundles = merged.certificate_authority_bundles.items.len();

    log::info!(
        "merged {} PKI list(s) into {} cert/key pair(s) and {} CA bundle(s)",
        pki_lists.len(),
        merge_stats.cert_key_pairs,
        merge_stats.certificate_authority_bundles
    );

    Ok(merged)
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    ensure!(!cancel.is_cancelled(), "cancelled, aborting");
    Ok(())
}

pub(crate) fn serialize_pki_list(pki_list: &PkiList, output_format: OutputFormat) -> Result<String> {
    match output_format {
        OutputFormat::Json => serde_json::to_string_pretty(pki_list).context("serializing json"),
        OutputFormat::Yaml => serde_yaml::to_string(pki_list).context("serializing yaml"),
    }
}

#[context("writing merged PKI list to {}", output)]
async fn write_pki_list(pki_list: &PkiList, output: &ConfigPath, output_format: OutputFormat) -> Result<()> {
    file_utils::write_string_to_file(output, &serialize_pki_list(pki_list, output_format)?).await?;
    log::info!("wrote merged PKI list to {}", output);
    Ok(())
}

pub(crate) async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            log::warn!("received Ctrl-C, cancelling");
            cancel.cancel();
        }
        Err(err) => log::warn!("unable to listen for Ctrl-C: {}", err),
    }
}
