use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// All regular files in `location` matching `globstr`. Hidden files, directories and symlinks
/// are skipped.
pub(crate) fn globvec(location: &Path, globstr: &str) -> Result<Vec<PathBuf>> {
    let mut globoptions = glob::MatchOptions::new();
    globoptions.require_literal_leading_dot = true;

    Ok(glob::glob_with(
        location
            .join(globstr)
            .to_str()
            .with_context(|| format!("non-unicode path {} while globbing {:?}", globstr, location))?,
        globoptions,
    )?
    .collect::<Result<Vec<_>, _>>()?
    .into_iter()
    .filter(|path| !path.is_symlink())
    .filter(|path| !path.is_dir())
    .collect::<Vec<_>>())
}

pub(crate) async fn read_file_to_string(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path).await?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).await.context("failed to read file")?;
    Ok(contents)
}

pub(crate) async fn write_string_to_file(file_path: &Path, contents: &str) -> Result<()> {
    let mut file = tokio::fs::File::create(file_path).await.context("creating file")?;
    file.write_all(contents.as_bytes()).await.context("writing file")?;
    file.flush().await.context("flushing file")?;
    Ok(())
}
