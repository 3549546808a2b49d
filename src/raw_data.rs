use crate::{certgraph::PkiList, config::path::ConfigPath, file_utils};
use anyhow::{Context, Result};
use fn_error_context::context;
use futures_util::future::join_all;
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// A PKI list as reported by a single probe, along with the file it was read from
pub(crate) struct RawPkiList {
    pub(crate) path: PathBuf,
    pub(crate) pki_list: PkiList,
}

/// The raw data files to merge, in merge order. Directories contribute every `*.json` file they
/// directly contain. The same file is only ever listed once.
pub(crate) fn collect_raw_data_paths(raw_data_dirs: &[ConfigPath], raw_data_files: &[ConfigPath]) -> Result<Vec<PathBuf>> {
    let mut paths = raw_data_files.iter().map(|file| file.to_path_buf()).collect::<Vec<_>>();

    for dir in raw_data_dirs {
        paths.extend(file_utils::globvec(dir, "*.json").context(format!("listing raw data dir {}", dir))?);
    }

    Ok(paths
        .iter()
        .map(|path| path.canonicalize().context(format!("canonicalizing {}", path.display())))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .sorted()
        .dedup()
        .collect())
}

#[context("loading raw PKI list {}", path.display())]
async fn load_raw_pki_list(path: &Path) -> Result<PkiList> {
    let contents = file_utils::read_file_to_string(path).await.context("reading file")?;
    serde_json::from_str(&contents).context("parsing PKI list JSON")
}

/// Reads and parses all raw PKI lists concurrently. The returned lists are in the same order as
/// `paths`, loading fails as a whole if any single file can't be loaded.
pub(crate) async fn load_raw_pki_lists(paths: Vec<PathBuf>) -> Result<Vec<RawPkiList>> {
    let pki_lists = join_all(paths.iter().map(|path| load_raw_pki_list(path)))
        .await
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    let raw_pki_lists = paths
        .into_iter()
        .zip(pki_lists)
        .map(|(path, pki_list)| RawPkiList { path, pki_list })
        .collect::<Vec<_>>();

    for raw_pki_list in &raw_pki_lists {
        log::info!(
            "loaded {} cert/key pair(s) and {} CA bundle(s) from {}",
            raw_pki_list.pki_list.cert_key_pairs.items.len(),
            raw_pki_list.pki_list.certificate_authority_bundles.items.len(),
            raw_pki_list.path.display()
        );
    }

    Ok(raw_pki_lists)
}
