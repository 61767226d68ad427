use crate::StoreError;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

const MAX_EXTENSION_LEN: usize = 16;

/// Directory of uploaded document images.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

/// Where an upload ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated file name, unique within the store.
    pub file_name: String,
    /// `root` joined with `file_name`; this is what gets recorded in the row.
    pub path: PathBuf,
}

impl FileStore {
    /// Open the store at `root`, creating the directory if needed.
    pub async fn open<P: Into<PathBuf>>(root: P) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under a fresh name derived from the form field and the
    /// client's original file name.
    ///
    /// Names look like `image-1718000000000-<32 hex chars>.png`. The random
    /// suffix keeps two uploads in the same millisecond apart, and the file is
    /// opened with `create_new` so nothing is ever overwritten.
    pub async fn store(
        &self,
        field: &str,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredFile, StoreError> {
        let file_name = generate_file_name(field, original_name);
        let path = self.root.join(&file_name);

        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        write_or_discard(file, &path, bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "upload stored");
        Ok(StoredFile { file_name, path })
    }
}

/// Write `bytes` to `out`, removing `path` if the write does not complete so a
/// failed upload never leaves a truncated file behind.
async fn write_or_discard<W>(mut out: W, path: &Path, bytes: &[u8]) -> Result<(), StoreError>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        out.write_all(bytes).await?;
        out.flush().await
    }
    .await;

    if let Err(err) = written {
        drop(out);
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %cleanup, "could not remove partial upload");
        }
        return Err(err.into());
    }
    Ok(())
}

fn generate_file_name(field: &str, original_name: Option<&str>) -> String {
    let prefix = sanitize(field);
    let prefix = if prefix.is_empty() { "file".to_string() } else { prefix };
    let millis = chrono::Utc::now().timestamp_millis();
    let token = uuid::Uuid::new_v4().simple();

    match original_name.and_then(extension_of) {
        Some(ext) => format!("{prefix}-{millis}-{token}.{ext}"),
        None => format!("{prefix}-{millis}-{token}"),
    }
}

fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    let ext: String = sanitize(ext).chars().take(MAX_EXTENSION_LEN).collect();
    (!ext.is_empty()).then_some(ext)
}

// Keeps ASCII alphanumerics, '_' and '-'.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
