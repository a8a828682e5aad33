use tracing::info;

use super::{Documents, storage::file::Client};
use crate::progress::ProgressReporter;

#[derive(Debug, thiserror::Error)]
pub enum JobError<E> {
    #[error("Failed to upload {name}: {source}")]
    Upload { name: &'static str, source: E },
}

/// Write every document through the client, stopping at the first failure.
pub async fn upload<C: Client>(
    client: &C,
    documents: &Documents,
    reporter: &dyn ProgressReporter,
) -> Result<(), JobError<C::Error>>
where
    C::Error: std::error::Error + 'static,
{
    let files = documents.files();
    let total = files.len();
    for (index, (name, content)) in files.into_iter().enumerate() {
        client
            .put(name, content)
            .await
            .map_err(|source| JobError::Upload { name, source })?;
        info!(name, bytes = content.len(), "Uploaded document");
        reporter.set_upload_progress(index + 1, total);
    }
    Ok(())
}
