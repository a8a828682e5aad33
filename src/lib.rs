use std::path::PathBuf;

pub mod config;
pub mod deploy;
pub mod discovery;
pub mod job;
pub mod material;
pub mod profile;
pub mod progress;

#[cfg(test)]
mod tests;

/// A failure while turning one profile document into a printer entry.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {detail}")]
pub struct Error {
    pub context: Box<ErrorContext>,
    pub detail: Box<ErrorDetail>,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub path: PathBuf,
    pub id: Option<String>,
}

impl ErrorContext {
    pub fn new(path: PathBuf) -> Self {
        Self { path, id: None }
    }

    fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            id: Some(id.into()),
        }
    }

    fn error(&self, detail: ErrorDetail) -> Error {
        Error {
            context: Box::new(self.clone()),
            detail: Box::new(detail),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{id}({})", self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorDetail {
    #[error("Failed to read document: {0}")]
    ReadDocument(std::io::Error),
    #[error("Failed to parse profile: {0}")]
    Parse(serde_json::Error),
    #[error("Missing metadata: {0}")]
    MissingMetadata(profile::MetadataError),
    #[error("Failed to encode filament notes: {0}")]
    Conversion(serde_json::Error),
}
