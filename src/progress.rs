//! Progress reporting and display
//!
//! The sync job reports through [`ProgressReporter`] so that terminal output
//! stays out of the conversion code.

use std::sync::{Arc, RwLock};

/// Status of a single profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    /// Waiting to be processed
    Pending,
    /// Being read and converted
    Converting,
    /// Merged into the printer documents
    Done,
    /// Skipped because of an error
    Failed(String),
}

/// Phase of the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPhase {
    LoadingBaseline,
    ScanningProfiles,
    ConvertingProfiles,
    Uploading,
    Completed,
    Failed(String),
}

impl BatchPhase {
    fn message(&self) -> String {
        match self {
            Self::LoadingBaseline => "📋 Loading baseline material database...".into(),
            Self::ScanningProfiles => "🔍 Scanning slicer profiles...".into(),
            Self::ConvertingProfiles => "🧵 Converting profiles...".into(),
            Self::Uploading => "📡 Uploading to printer...".into(),
            Self::Completed => "✅ Completed!".into(),
            Self::Failed(e) => format!("❌ Failed: {e}"),
        }
    }
}

pub trait ProgressReporter: Send + Sync {
    fn set_phase(&self, phase: BatchPhase);

    /// Register profiles to track (call before processing starts).
    fn register_entries(&self, entries: Vec<String>);

    fn update_entry(&self, entry: &str, status: EntryStatus);

    fn set_upload_progress(&self, current: usize, total: usize);

    fn log_info(&self, message: &str);

    fn log_warn(&self, message: &str);

    /// Finish and print the summary.
    fn finish(&self);
}

pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn set_phase(&self, _phase: BatchPhase) {}
    fn register_entries(&self, _entries: Vec<String>) {}
    fn update_entry(&self, _entry: &str, _status: EntryStatus) {}
    fn set_upload_progress(&self, _current: usize, _total: usize) {}
    fn log_info(&self, _message: &str) {}
    fn log_warn(&self, _message: &str) {}
    fn finish(&self) {}
}

#[derive(Debug)]
struct Stats {
    total: usize,
    converted: usize,
    failed: usize,
    uploaded: usize,
    start_time: std::time::Instant,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total: 0,
            converted: 0,
            failed: 0,
            uploaded: 0,
            start_time: std::time::Instant::now(),
        }
    }
}

impl Stats {
    fn record(&mut self, status: &EntryStatus) {
        match status {
            EntryStatus::Done => self.converted += 1,
            EntryStatus::Failed(_) => self.failed += 1,
            EntryStatus::Pending | EntryStatus::Converting => {}
        }
    }

    fn print_summary(&self) {
        eprintln!();
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("📊 Summary");
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        eprintln!("   🧵 Profiles:   {} found", self.total);
        eprintln!("   ✅ Converted:  {}", self.converted);
        if self.failed > 0 {
            eprintln!("   ❌ Skipped:    {}", self.failed);
        }
        if self.uploaded > 0 {
            eprintln!("   📡 Uploaded:   {} documents", self.uploaded);
        }
        eprintln!(
            "   ⏱️  Duration:   {:.2}s",
            self.start_time.elapsed().as_secs_f64()
        );
        eprintln!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

/// Plain line-per-event output (for non-TTY).
#[derive(Default)]
pub struct SimpleReporter {
    stats: RwLock<Stats>,
}

impl ProgressReporter for SimpleReporter {
    fn set_phase(&self, phase: BatchPhase) {
        eprintln!("{}", phase.message());
    }

    fn register_entries(&self, entries: Vec<String>) {
        if let Ok(mut stats) = self.stats.write() {
            stats.total = entries.len();
        }
        eprintln!("   Found {} profiles", entries.len());
    }

    fn update_entry(&self, entry: &str, status: EntryStatus) {
        if let Ok(mut stats) = self.stats.write() {
            stats.record(&status);
        }
        match status {
            EntryStatus::Done => eprintln!("   ✓ {entry}"),
            EntryStatus::Failed(e) => eprintln!("   ✗ {entry}: {e}"),
            EntryStatus::Pending | EntryStatus::Converting => {}
        }
    }

    fn set_upload_progress(&self, current: usize, total: usize) {
        if let Ok(mut stats) = self.stats.write() {
            stats.uploaded = current;
        }
        eprintln!("   Uploaded {current}/{total}");
    }

    fn log_info(&self, message: &str) {
        eprintln!("ℹ️  {message}");
    }

    fn log_warn(&self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn finish(&self) {
        if let Ok(stats) = self.stats.read() {
            stats.print_summary();
        }
    }
}

/// Spinner and progress bar output (for TTY).
pub struct FancyReporter {
    multi: indicatif::MultiProgress,
    phase_bar: indicatif::ProgressBar,
    profiles_bar: RwLock<Option<indicatif::ProgressBar>>,
    stats: RwLock<Stats>,
}

impl FancyReporter {
    pub fn new() -> Self {
        let reporter = Self::with_draw_target(indicatif::ProgressDrawTarget::stderr());
        reporter
            .phase_bar
            .enable_steady_tick(std::time::Duration::from_millis(100));
        reporter
    }

    pub fn with_draw_target(target: indicatif::ProgressDrawTarget) -> Self {
        let multi = indicatif::MultiProgress::with_draw_target(target);
        let phase_bar = multi.add(indicatif::ProgressBar::new_spinner());
        let style = indicatif::ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}");
        if let Ok(style) = style {
            phase_bar.set_style(style);
        }
        Self {
            multi,
            phase_bar,
            profiles_bar: RwLock::new(None),
            stats: RwLock::new(Stats::default()),
        }
    }
}

impl Default for FancyReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for FancyReporter {
    fn set_phase(&self, phase: BatchPhase) {
        let message = phase.message();
        match phase {
            BatchPhase::Completed => self.phase_bar.finish_with_message(message),
            BatchPhase::Failed(_) => self.phase_bar.abandon_with_message(message),
            _ => self.phase_bar.set_message(message),
        }
    }

    fn register_entries(&self, entries: Vec<String>) {
        if let Ok(mut stats) = self.stats.write() {
            stats.total = entries.len();
        }
        let bar = self
            .multi
            .add(indicatif::ProgressBar::new(entries.len() as u64));
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("   {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        if let Ok(mut slot) = self.profiles_bar.write() {
            *slot = Some(bar);
        }
    }

    fn update_entry(&self, entry: &str, status: EntryStatus) {
        if let Ok(mut stats) = self.stats.write() {
            stats.record(&status);
        }
        let Ok(slot) = self.profiles_bar.read() else {
            return;
        };
        let Some(bar) = slot.as_ref() else {
            return;
        };
        match status {
            EntryStatus::Converting => bar.set_message(entry.to_owned()),
            EntryStatus::Done => bar.inc(1),
            EntryStatus::Failed(e) => {
                bar.inc(1);
                self.multi.println(format!("   ✗ {entry}: {e}")).ok();
            }
            EntryStatus::Pending => {}
        }
    }

    fn set_upload_progress(&self, current: usize, total: usize) {
        if let Ok(mut stats) = self.stats.write() {
            stats.uploaded = current;
        }
        self.phase_bar
            .set_message(format!("📡 Uploading to printer... ({current}/{total})"));
    }

    fn log_info(&self, message: &str) {
        self.multi.println(format!("ℹ️  {message}")).ok();
    }

    fn log_warn(&self, message: &str) {
        self.multi.println(format!("⚠️  {message}")).ok();
    }

    fn finish(&self) {
        if let Ok(slot) = self.profiles_bar.read() {
            if let Some(bar) = slot.as_ref() {
                bar.finish_and_clear();
            }
        }
        // A final phase message stays on screen.
        if !self.phase_bar.is_finished() {
            self.phase_bar.finish_and_clear();
        }
        if let Ok(stats) = self.stats.read() {
            stats.print_summary();
        }
    }
}

/// Pick a reporter for the current stderr.
pub fn create_reporter(enabled: bool) -> Arc<dyn ProgressReporter> {
    if !enabled {
        Arc::new(NullReporter)
    } else if console::Term::stderr().is_term() {
        Arc::new(FancyReporter::new())
    } else {
        Arc::new(SimpleReporter::default())
    }
}
