use self::{cli::Cli, path::ConfigPath};
use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde_json::Value;
use std::{env, str::FromStr};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

mod cli;
pub(crate) mod path;

const CONFIG_ENV_VAR: &str = "PKIMERGE_CONFIG";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter, serde::Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    pub(crate) fn parse(value: &str) -> Result<Self> {
        OutputFormat::from_str(value).context(format!(
            "unknown output format {:?}, expected one of {}",
            value,
            OutputFormat::iter().map(|format| format.to_string()).collect::<Vec<_>>().join(", ")
        ))
    }
}

pub(crate) fn parse_log_level(value: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(value).ok().context(format!("unknown log level {:?}", value))
}

fn serialize_level_filter<S: serde::Serializer>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(level.as_str())
}

/// All parsed CLI arguments (or config file keys), coalesced into a single struct for convenience
#[derive(serde::Serialize)]
pub(crate) struct MergeConfig {
    pub(crate) raw_data_dirs: Vec<ConfigPath>,
    pub(crate) raw_data_files: Vec<ConfigPath>,
    pub(crate) output: Option<ConfigPath>,
    pub(crate) output_format: OutputFormat,
    pub(crate) summary_file: Option<ConfigPath>,
    #[serde(serialize_with = "serialize_level_filter")]
    pub(crate) log_level: LevelFilter,
    pub(crate) threads: Option<usize>,

    pub(crate) config_file_raw: Option<String>,
    pub(crate) cli_raw: Option<String>,
}

fn string_array(value: Value, key: &str) -> Result<Vec<String>> {
    value
        .as_array()
        .context(format!("{} must be an array", key))?
        .iter()
        .map(|value| {
            Ok(value
                .as_str()
                .context(format!("{} must be an array of strings", key))?
                .to_string())
        })
        .collect()
}

fn string(value: Value, key: &str) -> Result<String> {
    Ok(value.as_str().context(format!("{} must be a string", key))?.to_string())
}

impl MergeConfig {
    pub(crate) fn parse_from_config_file(config_bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_yaml::from_slice(config_bytes)?;

        let mut value = value.as_object().context("config file must be a YAML object")?.clone();

        let raw_data_dirs = match value.remove("raw_data_dirs") {
            Some(value) => string_array(value, "raw_data_dirs")?
                .iter()
                .map(|path| ConfigPath::existing_dir(path).context(format!("raw_data_dir {}", path)))
                .collect::<Result<Vec<ConfigPath>>>()?,
            None => vec![],
        };

        let raw_data_files = match value.remove("raw_data_files") {
            Some(value) => string_array(value, "raw_data_files")?
                .iter()
                .map(|path| ConfigPath::existing_file(path).context(format!("raw_data_file {}", path)))
                .collect::<Result<Vec<ConfigPath>>>()?,
            None => vec![],
        };

        let output = match value.remove("output") {
            Some(value) => Some(ConfigPath::new(&string(value, "output")?)?),
            None => None,
        };

        let output_format = match value.remove("output_format") {
            Some(value) => OutputFormat::parse(&string(value, "output_format")?)?,
            None => OutputFormat::Json,
        };

        let summary_file = match value.remove("summary_file") {
            Some(value) => Some(ConfigPath::new(&string(value, "summary_file")?)?),
            None => None,
        };

        let log_level = match value.remove("log_level") {
            Some(value) => parse_log_level(&string(value, "log_level")?)?,
            None => LevelFilter::Info,
        };

        let threads = match value.remove("threads") {
            Some(value) => Some(
                value
                    .as_u64()
                    .context("threads must be an integer")?
                    .try_into()
                    .context("threads must be an integer")?,
            ),
            None => None,
        };

        ensure!(
            value.is_empty(),
            "unknown keys {:?} in config file",
            value.keys().map(|key| key.to_string()).collect::<Vec<String>>().join(", ")
        );

        Self {
            raw_data_dirs,
            raw_data_files,
            output,
            output_format,
            summary_file,
            log_level,
            threads,

            config_file_raw: Some(String::from_utf8_lossy(config_bytes).to_string()),
            cli_raw: None,
        }
        .validated()
    }

    pub(crate) fn parse_from_cli(cli: Cli) -> Result<Self> {
        Self {
            raw_data_dirs: cli.raw_data_dir.into_iter().map(ConfigPath::from).collect(),
            raw_data_files: cli.raw_data_file.into_iter().map(ConfigPath::from).collect(),
            output: cli.output.map(ConfigPath::from),
            output_format: cli.output_format,
            summary_file: cli.summary_file.map(ConfigPath::from),
            log_level: cli.log_level,
            threads: cli.threads,

            config_file_raw: None,
            cli_raw: Some(serde_json::to_string(&env::args().collect::<Vec<String>>())?),
        }
        .validated()
    }

    fn validated(self) -> Result<Self> {
        if self.raw_data_dirs.is_empty() && self.raw_data_files.is_empty() {
            bail!("at least one raw data directory or raw data file must be given");
        }

        if let Some(threads) = self.threads {
            ensure!(threads > 0, "threads must be greater than 0");
        }

        Ok(self)
    }

    pub(crate) fn new() -> Result<MergeConfig> {
        Ok(match env::var(CONFIG_ENV_VAR) {
            Ok(var) => {
                let num_args = env::args().len();

                ensure!(
                    num_args == 1,
                    "{CONFIG_ENV_VAR} is set, but there are {num_args} CLI arguments. {CONFIG_ENV_VAR} is meant to be used with no arguments."
                );

                MergeConfig::parse_from_config_file(&std::fs::read(&var).context(format!("reading {} file {}", CONFIG_ENV_VAR, var))?)
                    .context(format!("parsing {} file {}", CONFIG_ENV_VAR, var))?
            }
            Err(_) => MergeConfig::parse_from_cli(Cli::parse()).context("CLI parsing")?,
        })
    }
}
