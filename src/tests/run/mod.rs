use std::{path::PathBuf, sync::Mutex};

use crate::{
    config::{Destination, ProfileSource, SyncConfig},
    discovery,
    job::{self, RunError},
    material::{self, LoadError, MaterialDatabase},
    progress::{BatchPhase, EntryStatus, ProgressReporter},
};

use super::PROFILE_DIR;

#[derive(Default)]
struct RecordingReporter {
    phases: Mutex<Vec<BatchPhase>>,
    finished: Mutex<usize>,
}

impl RecordingReporter {
    fn phases(&self) -> Vec<BatchPhase> {
        self.phases.lock().unwrap().clone()
    }

    fn finished(&self) -> usize {
        *self.finished.lock().unwrap()
    }
}

impl ProgressReporter for RecordingReporter {
    fn set_phase(&self, phase: BatchPhase) {
        self.phases.lock().unwrap().push(phase);
    }
    fn register_entries(&self, _entries: Vec<String>) {}
    fn update_entry(&self, _entry: &str, _status: EntryStatus) {}
    fn set_upload_progress(&self, _current: usize, _total: usize) {}
    fn log_info(&self, _message: &str) {}
    fn log_warn(&self, _message: &str) {}
    fn finish(&self) {
        *self.finished.lock().unwrap() += 1;
    }
}

fn config(source: impl Into<PathBuf>, out: impl Into<PathBuf>) -> SyncConfig {
    SyncConfig {
        source: ProfileSource::Dir(source.into()),
        destination: Destination::LocalDir(out.into()),
        baseline_database: None,
        baseline_options: None,
        progress: false,
    }
}

#[tokio::test]
async fn writes_documents_to_output_dir() {
    let out = tempfile::tempdir().unwrap();
    let reporter = RecordingReporter::default();
    job::run(config(PROFILE_DIR, out.path()), &reporter)
        .await
        .unwrap();

    assert_eq!(
        reporter.phases(),
        vec![
            BatchPhase::LoadingBaseline,
            BatchPhase::ScanningProfiles,
            BatchPhase::ConvertingProfiles,
            BatchPhase::Uploading,
            BatchPhase::Completed,
        ]
    );
    assert_eq!(reporter.finished(), 1);

    let database = MaterialDatabase::from_slice(
        &std::fs::read(out.path().join(material::DATABASE_FILE_NAME)).unwrap(),
    )
    .unwrap();
    assert_eq!(database.result.count, 3);
    assert!(database.result.version.parse::<i64>().unwrap() > 0);
    let options = material::options_from_slice(
        &std::fs::read(out.path().join(material::OPTIONS_FILE_NAME)).unwrap(),
    )
    .unwrap();
    assert_eq!(options["Acme"]["PLA"], "Silk Red");
}

#[tokio::test]
async fn failure_reason_reaches_reporter() {
    let root = tempfile::tempdir().unwrap();
    let reporter = RecordingReporter::default();
    let error = job::run(
        config(root.path().join("absent"), root.path().join("out")),
        &reporter,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        error,
        RunError::Discovery(discovery::Error::ReadDirectory { .. })
    ));

    let phases = reporter.phases();
    assert_eq!(phases.last(), Some(&BatchPhase::Failed(error.to_string())));
    let Some(BatchPhase::Failed(reason)) = phases.last() else {
        unreachable!()
    };
    assert!(reason.contains("absent"), "{reason}");
    assert_eq!(reporter.finished(), 1);
    assert!(!root.path().join("out").exists());
}

#[tokio::test]
async fn nothing_is_written_without_identified_profiles() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("profiles");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("plain.json"), r#"{"name": "no notes"}"#).unwrap();
    let out = root.path().join("out");

    let reporter = RecordingReporter::default();
    job::run(config(&source, &out), &reporter).await.unwrap();
    assert_eq!(
        reporter.phases(),
        vec![BatchPhase::LoadingBaseline, BatchPhase::ScanningProfiles]
    );
    assert!(!out.exists());
}

#[tokio::test]
async fn unreadable_baseline_is_fatal() {
    let root = tempfile::tempdir().unwrap();
    let mut config = config(PROFILE_DIR, root.path().join("out"));
    config.baseline_database = Some(root.path().join("missing.json"));

    let reporter = RecordingReporter::default();
    let error = job::run(config, &reporter).await.unwrap_err();
    assert!(matches!(error, RunError::Baseline(LoadError::Read { .. })));
    assert!(matches!(
        reporter.phases().as_slice(),
        [BatchPhase::LoadingBaseline, BatchPhase::Failed(_)]
    ));
}
