use std::path::Path;

use tracing::{info, warn};

use super::{JobError, Pipeline, upload};
use crate::{
    config::{Destination, ProfileSource, SyncConfig},
    deploy::{local::dir, printer},
    discovery,
    material::{self, LoadError, MaterialDatabase, MaterialOptions},
    progress::{BatchPhase, ProgressReporter},
};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to load baseline documents: {0}")]
    Baseline(#[from] LoadError),
    #[error("Failed to locate profiles: {0}")]
    Discovery(#[from] discovery::Error),
    #[error("Failed to serialize printer documents: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to prepare output directory: {0}")]
    OutputDir(#[from] dir::Error),
    #[error(transparent)]
    WriteLocal(#[from] JobError<dir::Error>),
    #[error("Failed to connect to printer at {host}: {source}")]
    Connect {
        host: String,
        source: printer::Error,
    },
    #[error(transparent)]
    Upload(#[from] JobError<printer::Error>),
}

async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })
}

async fn load_baseline(
    config: &SyncConfig,
) -> Result<(MaterialDatabase, MaterialOptions), LoadError> {
    let database = match &config.baseline_database {
        Some(path) => MaterialDatabase::from_slice(&read_file(path).await?)?,
        None => MaterialDatabase::baseline()?,
    };
    let options = match &config.baseline_options {
        Some(path) => material::options_from_slice(&read_file(path).await?)?,
        None => material::baseline_options()?,
    };
    Ok((database, options))
}

/// Run one sync, reporting the failure reason to `reporter` before returning it.
pub async fn run(config: SyncConfig, reporter: &dyn ProgressReporter) -> Result<(), RunError> {
    let result = sync(config, reporter).await;
    if let Err(error) = &result {
        reporter.set_phase(BatchPhase::Failed(error.to_string()));
        reporter.finish();
    }
    result
}

async fn sync(config: SyncConfig, reporter: &dyn ProgressReporter) -> Result<(), RunError> {
    reporter.set_phase(BatchPhase::LoadingBaseline);
    let (database, options) = load_baseline(&config).await?;
    info!(
        entries = database.result.list.len(),
        vendors = options.len(),
        "Material database loaded"
    );

    reporter.set_phase(BatchPhase::ScanningProfiles);
    let source_dir = match &config.source {
        ProfileSource::Dir(dir) => dir.clone(),
        ProfileSource::Slicer {
            slicer,
            user_id,
            flatpak,
        } => discovery::profile_dir(*slicer, user_id, *flatpak)?,
    };
    info!(dir = %source_dir.display(), "Scanning for profiles");
    let paths = discovery::find_profiles(&source_dir).await?;
    if paths.is_empty() {
        warn!("No filament profiles with an id in `filament_notes` found; nothing to sync");
        reporter.log_warn("No filament profiles with an id in `filament_notes` found");
        reporter.finish();
        return Ok(());
    }

    reporter.set_phase(BatchPhase::ConvertingProfiles);
    let version = chrono::Utc::now().timestamp().to_string();
    let mut pipeline = Pipeline::new(database, options, version);
    let summary = pipeline.process_files(&paths, reporter).await;
    info!(
        converted = summary.converted.len(),
        skipped = summary.failed.len(),
        "Profiles processed"
    );
    reporter.log_info(&format!(
        "{} profile(s) converted, {} skipped",
        summary.converted.len(),
        summary.failed.len()
    ));
    let documents = pipeline.into_documents()?;

    reporter.set_phase(BatchPhase::Uploading);
    match config.destination {
        Destination::LocalDir(out) => {
            let client = dir::Client::open(out).await?;
            upload(&client, &documents, reporter).await?;
        }
        Destination::Printer(target) => {
            let host = target.host.clone();
            let client = printer::Client::connect(target)
                .await
                .map_err(|source| RunError::Connect { host, source })?;
            upload(&client, &documents, reporter).await?;
        }
    }

    reporter.set_phase(BatchPhase::Completed);
    reporter.finish();
    info!("Filament profiles synchronized");
    Ok(())
}
