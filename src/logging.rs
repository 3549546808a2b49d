use crate::{
    config::MergeConfig,
    pkimerge::{MergeStats, RunTimes},
};
use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use log::{LevelFilter, Metadata, Record};
use std::sync::{Arc, Mutex};

struct PkiMergeLogger;

static LOGGER: PkiMergeLogger = PkiMergeLogger;

pub fn init(level: LevelFilter) -> Result<()> {
    match log::set_logger(&LOGGER) {
        Ok(_) => log::set_max_level(level),
        Err(_) => bail!("Logger initalization failed"),
    };

    Ok(())
}

lazy_static! {
    pub(crate) static ref LOG_RECORDS: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
}

impl log::Log for PkiMergeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_string = format!(
                "{} - {} - {}:{}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            );

            {
                let mut log_records = match LOG_RECORDS.lock() {
                    Ok(log_records) => log_records,
                    Err(err) => {
                        println!("Failed to lock log records: {}", err);
                        return;
                    }
                };
                log_records.push(log_string.clone());
            }

            println!("{}", log_string);
        }
    }

    fn flush(&self) {}
}

#[derive(serde::Serialize)]
struct Summary<'a> {
    merge_config: &'a MergeConfig,
    merge_stats: Option<MergeStats>,
    run_times: Option<RunTimes>,
    logs: Vec<String>,
}

/// Writes the run summary to the configured summary file, if any
pub(crate) fn generate_summary(merge_config: &MergeConfig, merge_stats: Option<MergeStats>, run_times: Option<RunTimes>) -> Result<()> {
    let Some(summary_file) = &merge_config.summary_file else {
        return Ok(());
    };

    let logs = match LOG_RECORDS.lock() {
        Ok(logs) => logs.clone(),
        Err(err) => {
            vec![format!("Failed to lock log records: {}", err)]
        }
    };

    let summary = Summary {
        merge_config,
        merge_stats,
        run_times,
        logs,
    };

    let summary_file = summary_file.0.clone().create().context("opening summary file for writing")?;
    serde_yaml::to_writer(summary_file, &summary).context("serializing summary into summary file")?;

    Ok(())
}
