use std::path::PathBuf;

use tracing::debug;

use crate::job;

/// Writes documents into a local directory instead of the printer.
pub struct Client {
    dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Client {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::CreateDir {
                path: dir.clone(),
                source,
            })?;
        Ok(Self { dir })
    }
}

impl job::storage::file::Client for Client {
    type Error = Error;

    async fn put(&self, name: &str, content: &[u8]) -> Result<(), Self::Error> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|source| Error::Write {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote document");
        Ok(())
    }
}
