//! Per-profile conversion pipeline
//!
//! Profiles go through read → normalize → convert → merge one at a time. A
//! profile that fails at any step leaves both documents untouched.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    Error, ErrorContext, ErrorDetail,
    material::{
        DATABASE_FILE_NAME, MaterialDatabase, MaterialOptions, OPTIONS_FILE_NAME, TargetDevice,
        convert, merge_entry, merge_option, to_tab_indented_json,
    },
    profile::{SlicerProfile, normalize},
    progress::{EntryStatus, ProgressReporter},
};

/// Outcome of a successfully merged profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub id: String,
    pub name: String,
    pub replaced: bool,
}

/// Counts for one run over a set of profile files.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub converted: Vec<Converted>,
    pub failed: Vec<Error>,
}

/// Serialized printer documents, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Documents {
    pub database: Vec<u8>,
    pub options: Vec<u8>,
}

impl Documents {
    /// Remote file name and content of every document.
    pub fn files(&self) -> [(&'static str, &[u8]); 2] {
        [
            (DATABASE_FILE_NAME, self.database.as_slice()),
            (OPTIONS_FILE_NAME, self.options.as_slice()),
        ]
    }
}

pub struct Pipeline {
    database: MaterialDatabase,
    options: MaterialOptions,
    device: TargetDevice,
    version: String,
}

impl Pipeline {
    pub fn new(
        database: MaterialDatabase,
        options: MaterialOptions,
        version: impl Into<String>,
    ) -> Self {
        Self {
            database,
            options,
            device: TargetDevice::default(),
            version: version.into(),
        }
    }

    pub fn with_device(self, device: TargetDevice) -> Self {
        Self { device, ..self }
    }

    pub fn database(&self) -> &MaterialDatabase {
        &self.database
    }

    pub fn options(&self) -> &MaterialOptions {
        &self.options
    }

    /// Convert one profile document and merge it into both documents.
    pub fn process(&mut self, source: &Path, document: &[u8]) -> Result<Converted, Error> {
        let ctx = ErrorContext::new(source.to_owned());
        let profile = SlicerProfile::from_slice(document)
            .map_err(|error| ctx.error(ErrorDetail::Parse(error)))?;
        let (fields, notes) =
            normalize(&profile).map_err(|error| ctx.error(ErrorDetail::MissingMetadata(error)))?;
        let ctx = ctx.with_id(&notes.id);
        let entry = convert(&fields, &notes, &self.device)
            .map_err(|error| ctx.error(ErrorDetail::Conversion(error)))?;
        debug!(id = %notes.id, params = entry.kv_param.len(), "Converted profile");

        let replaced = self.database.find(&notes.id).is_some();
        merge_entry(&mut self.database, entry, &self.version);
        merge_option(&mut self.options, &notes);
        Ok(Converted {
            id: notes.id,
            name: notes.name,
            replaced,
        })
    }

    pub async fn process_file(&mut self, path: &Path) -> Result<Converted, Error> {
        let document = tokio::fs::read(path).await.map_err(|error| {
            ErrorContext::new(path.to_owned()).error(ErrorDetail::ReadDocument(error))
        })?;
        self.process(path, &document)
    }

    /// Process files in order, logging and skipping the ones that fail.
    pub async fn process_files(
        &mut self,
        paths: &[PathBuf],
        reporter: &dyn ProgressReporter,
    ) -> RunSummary {
        reporter.register_entries(paths.iter().map(|path| entry_label(path)).collect());
        let mut summary = RunSummary::default();
        for path in paths {
            let label = entry_label(path);
            reporter.update_entry(&label, EntryStatus::Converting);
            info!(path = %path.display(), "Processing profile");
            match self.process_file(path).await {
                Ok(converted) => {
                    info!(
                        id = %converted.id,
                        name = %converted.name,
                        replaced = converted.replaced,
                        "Merged profile"
                    );
                    reporter.update_entry(&label, EntryStatus::Done);
                    summary.converted.push(converted);
                }
                Err(error) => {
                    warn!(%error, "Skipping profile");
                    reporter.update_entry(&label, EntryStatus::Failed(error.detail.to_string()));
                    summary.failed.push(error);
                }
            }
        }
        summary
    }

    pub fn into_documents(self) -> Result<Documents, serde_json::Error> {
        Ok(Documents {
            database: to_tab_indented_json(&self.database)?,
            options: to_tab_indented_json(&self.options)?,
        })
    }
}

fn entry_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
