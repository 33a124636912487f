use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum StagingError<E: std::error::Error + 'static> {
    /// The incoming body could not be read.
    #[error("failed to read upload: {0}")]
    Source(#[source] E),
    #[error("failed to write staged file: {0}")]
    Io(#[from] io::Error),
}

/// An uploaded file copied to a local temp file for the duration of one
/// request. The temp file is removed when this value is dropped.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    file_name: String,
    content_type: Option<String>,
    len: u64,
}

impl StagedFile {
    /// Drain `chunks` into a new temp file inside `dir`.
    pub async fn write_from<S, E>(
        chunks: S,
        dir: &Path,
        file_name: String,
        content_type: Option<String>,
    ) -> Result<Self, StagingError<E>>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::error::Error + 'static,
    {
        let mut chunks = std::pin::pin!(chunks);
        let dir = dir.to_path_buf();
        let temp = run_blocking(move || {
            tempfile::Builder::new()
                .prefix("upload-")
                .tempfile_in(dir)
        })
        .await?;
        let mut out = tokio::fs::File::from_std(temp.as_file().try_clone()?);

        let mut len = 0u64;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(StagingError::Source)?;
            out.write_all(&chunk).await?;
            len += chunk.len() as u64;
        }
        out.flush().await?;

        tracing::debug!("Staged {} ({} bytes) at {:?}", file_name, len, temp.path());

        Ok(Self {
            temp,
            file_name,
            content_type,
            len,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Open a fresh read handle positioned at the start of the file.
    pub async fn open(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::open(self.temp.path()).await
    }

    /// Remove the temp file now, reporting failures instead of swallowing
    /// them as `Drop` would.
    pub async fn close(self) -> io::Result<()> {
        let temp = self.temp;
        run_blocking(move || temp.close()).await
    }
}

/// `tempfile` only has blocking calls; keep them off the runtime workers.
async fn run_blocking<T, F>(f: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(io::Error::other)?
}
