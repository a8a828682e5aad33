use std::path::PathBuf;

pub const DEFAULT_REMOTE_DIR: &str = "/mnt/UDISK/creality/userdata/box";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SlicerKind {
    Orca,
    Creality,
}

impl std::fmt::Display for SlicerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Orca => f.write_str("orca"),
            Self::Creality => f.write_str("creality"),
        }
    }
}

#[derive(Clone)]
pub struct PrinterConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub remote_dir: String,
}

impl std::fmt::Debug for PrinterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("remote_dir", &self.remote_dir)
            .finish_non_exhaustive()
    }
}

/// Where the generated documents go.
#[derive(Debug, Clone)]
pub enum Destination {
    Printer(PrinterConfig),
    LocalDir(PathBuf),
}

/// Where profiles are read from.
#[derive(Debug, Clone)]
pub enum ProfileSource {
    Slicer {
        slicer: SlicerKind,
        user_id: String,
        flatpak: bool,
    },
    Dir(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub source: ProfileSource,
    pub destination: Destination,
    pub baseline_database: Option<PathBuf>,
    pub baseline_options: Option<PathBuf>,
    pub progress: bool,
}
