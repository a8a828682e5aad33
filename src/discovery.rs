//! Locating slicer profile files
//!
//! Profiles are looked up under the slicer's per-user configuration
//! directory. Only files whose `filament_notes` carry an identity block are
//! picked up.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{config::SlicerKind, profile::notes};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to determine the home directory")]
    NoHomeDirectory,
    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(&'static str),
    #[error("Flatpak installs are only supported on Linux")]
    FlatpakOutsideLinux,
    #[error("Slicer profile directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where a slicer keeps its user filament profiles, relative to its config root.
fn relative_profile_dir(slicer: SlicerKind, user_id: &str) -> PathBuf {
    match slicer {
        SlicerKind::Orca => ["OrcaSlicer", "user", user_id, "filament", "base"]
            .iter()
            .collect(),
        SlicerKind::Creality => [
            "Creality",
            "Creality Print",
            "6.0",
            "user",
            user_id,
            "filament",
            "base",
        ]
        .iter()
        .collect(),
    }
}

fn flatpak_app_id(slicer: SlicerKind) -> &'static str {
    match slicer {
        SlicerKind::Orca => "io.github.softfever.OrcaSlicer",
        SlicerKind::Creality => "io.github.crealityofficial.CrealityPrint",
    }
}

/// Build the profile directory path for an OS without touching the filesystem.
pub fn profile_dir_for(
    os: &'static str,
    home: &Path,
    slicer: SlicerKind,
    user_id: &str,
    flatpak: bool,
) -> Result<PathBuf, Error> {
    let relative = relative_profile_dir(slicer, user_id);
    match os {
        "linux" if flatpak => {
            let config = home
                .join(".var")
                .join("app")
                .join(flatpak_app_id(slicer))
                .join("config");
            Ok(match slicer {
                SlicerKind::Orca => config.join(relative),
                SlicerKind::Creality => config.join("Creality").join(relative),
            })
        }
        _ if flatpak => Err(Error::FlatpakOutsideLinux),
        "linux" => Ok(home.join(".config").join(relative)),
        "macos" => Ok(home
            .join("Library")
            .join("Application Support")
            .join(relative)),
        "windows" => Ok(home.join("AppData").join("Roaming").join(relative)),
        other => Err(Error::UnsupportedOs(other)),
    }
}

/// Resolve the profile directory for the running OS and check that it exists.
pub fn profile_dir(slicer: SlicerKind, user_id: &str, flatpak: bool) -> Result<PathBuf, Error> {
    let dirs = directories::BaseDirs::new().ok_or(Error::NoHomeDirectory)?;
    let path = profile_dir_for(
        std::env::consts::OS,
        dirs.home_dir(),
        slicer,
        user_id,
        flatpak,
    )?;
    if !path.is_dir() {
        return Err(Error::MissingDirectory(path));
    }
    Ok(path)
}

/// List the `.json` files in `dir` that look like identified filament profiles.
///
/// Files that cannot be read or fail the identity pre-check are logged and skipped.
pub async fn find_profiles(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let read_error = |source: std::io::Error| Error::ReadDirectory {
        path: dir.to_owned(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let file_type = entry.file_type().await.map_err(read_error)?;
        let path = entry.path();
        if !file_type.is_dir() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut profiles = Vec::new();
    for path in paths {
        let document = match tokio::fs::read(&path).await {
            Ok(document) => document,
            Err(error) => {
                info!(path = %path.display(), %error, "Skipping profile: failed to read file");
                continue;
            }
        };
        let document =
            match serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&document) {
                Ok(document) => document,
                Err(error) => {
                    info!(path = %path.display(), %error, "Skipping profile: not a JSON object");
                    continue;
                }
            };
        match notes::precheck(&document) {
            Ok(notes) => {
                debug!(path = %path.display(), id = %notes.id, "Found identified profile");
                profiles.push(path);
            }
            Err(error) => {
                info!(path = %path.display(), %error, "Ignoring profile");
            }
        }
    }
    Ok(profiles)
}
