use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use filament_sync::{
    config::{
        DEFAULT_REMOTE_DIR, Destination, PrinterConfig, ProfileSource, SlicerKind, SyncConfig,
    },
    job, progress,
};
use tracing::error;

/// Convert slicer filament profiles and push them to a Creality printer.
#[derive(Parser)]
#[clap(version)]
struct Opts {
    /// IP address or host name of the printer
    #[clap(long, env = "FILAMENT_SYNC_PRINTER_IP", required_unless_present = "output_dir")]
    printer_ip: Option<String>,
    #[clap(long, env = "FILAMENT_SYNC_USER", default_value = "root")]
    user: String,
    #[clap(
        long,
        env = "FILAMENT_SYNC_PASSWORD",
        default_value = "creality_2024",
        hide_env_values = true,
        hide_default_value = true
    )]
    password: String,
    #[clap(long, value_enum, default_value_t = SlicerKind::Orca)]
    slicer: SlicerKind,
    /// User id of the slicer profile folder
    #[clap(long = "userid", default_value = "default")]
    user_id: String,
    /// Look for a Flatpak install of the slicer (Linux only)
    #[clap(long)]
    flatpak: bool,
    /// Read profiles from this directory instead of the slicer's
    #[clap(long)]
    profile_dir: Option<PathBuf>,
    #[clap(long, default_value = DEFAULT_REMOTE_DIR)]
    remote_dir: String,
    #[clap(long)]
    baseline_database: Option<PathBuf>,
    #[clap(long)]
    baseline_options: Option<PathBuf>,
    /// Write the documents here instead of uploading them
    #[clap(long)]
    output_dir: Option<PathBuf>,
    #[clap(long)]
    no_progress: bool,
}

impl Opts {
    fn into_config(self) -> anyhow::Result<SyncConfig> {
        let source = match self.profile_dir {
            Some(dir) => ProfileSource::Dir(dir),
            None => ProfileSource::Slicer {
                slicer: self.slicer,
                user_id: self.user_id,
                flatpak: self.flatpak,
            },
        };
        let destination = match (self.output_dir, self.printer_ip) {
            (Some(dir), _) => Destination::LocalDir(dir),
            (None, Some(host)) => Destination::Printer(PrinterConfig {
                host,
                user: self.user,
                password: self.password,
                remote_dir: self.remote_dir,
            }),
            (None, None) => anyhow::bail!("--printer-ip is required"),
        };
        Ok(SyncConfig {
            source,
            destination,
            baseline_database: self.baseline_database,
            baseline_options: self.baseline_options,
            progress: !self.no_progress,
        })
    }
}

fn main() -> std::process::ExitCode {
    let opts = Opts::parse();
    let default_level = if opts.no_progress { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = opts.into_config().and_then(|config| {
        let reporter = progress::create_reporter(config.progress);
        tokio::runtime::Runtime::new()
            .context("start async runtime")?
            .block_on(job::run(config, reporter.as_ref()))
            .context("sync filament profiles")
    });
    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!(?e, "critical error");
            std::process::ExitCode::FAILURE
        }
    }
}
