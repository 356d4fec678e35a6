use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use pv_core::poem::PoemExport;
use pv_core::ports::ExportSinkPort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Writes exported poems into a directory the way a browser download does:
/// an existing `name.txt` makes the next one `name (1).txt`, then
/// `name (2).txt`, and so on. Existing files are never overwritten.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn candidate_name(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{stem} ({attempt}).{}", ext.to_string_lossy()),
        None => format!("{stem} ({attempt})"),
    }
}

#[async_trait]
impl ExportSinkPort for FileExportSink {
    async fn deliver(&self, export: &PoemExport) -> Result<PathBuf> {
        // Only the final component is honored.
        let Some(file_name) = Path::new(&export.file_name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            bail!("invalid export file name: {:?}", export.file_name);
        };

        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create export dir failed: {}", self.dir.display()))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(candidate_name(&file_name, attempt));
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("create export failed: {}", path.display()))
                }
            };

            file.write_all(export.content.as_bytes())
                .await
                .with_context(|| format!("write export failed: {}", path.display()))?;
            file.flush().await?;
            debug!(path = %path.display(), "Export written");
            return Ok(path);
        }

        bail!(
            "no free file name for {} in {}",
            file_name,
            self.dir.display()
        )
    }
}
