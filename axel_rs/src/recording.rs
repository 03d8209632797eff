use crate::config::{RecordingConfig, ShareConfig};
use crate::error::{AxelError, AxelResult};
use crate::sensors::GyroSample;
use crate::storage::{format_row, ShareRequest, CSV_HEADER};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Recorder state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingState {
    /// Samples are charted but not written
    Idle,
    /// Samples are appended to the temp file
    Recording,
}

/// Append-only CSV recorder for one click-to-click session
pub struct Recorder {
    dir: PathBuf,
    config: RecordingConfig,
    state: RecordingState,
    started_at: Option<DateTime<Local>>,
    temp_path: Option<PathBuf>,
    writer: Option<BufWriter<File>>,
    rows_written: u64,
}

impl Recorder {
    /// Recorder writing temp files into `dir` (the app cache directory)
    pub fn new(dir: impl Into<PathBuf>, config: RecordingConfig) -> Self {
        Recorder {
            dir: dir.into(),
            config,
            state: RecordingState::Idle,
            started_at: None,
            temp_path: None,
            writer: None,
            rows_written: 0,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// False when the temp file could not be opened; rows are then dropped
    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn temp_path(&self) -> Option<&Path> {
        self.temp_path.as_deref()
    }

    /// Transition Idle → Recording and open `<dir>/<timestamp>.csv`.
    ///
    /// A file that cannot be created is logged and the session still starts
    /// without a writer.
    pub fn start(&mut self, now: DateTime<Local>) -> AxelResult<()> {
        if self.state == RecordingState::Recording {
            return Err(AxelError::AlreadyRecording);
        }

        let file_name = format!(
            "{}.{}",
            timestamp_name(now, &self.config),
            self.config.file_extension
        );
        let path = self.dir.join(file_name);

        self.writer = match open_with_header(&path) {
            Ok(writer) => Some(writer),
            Err(e) => {
                log::error!("Failed to open recording file: {}", e);
                None
            }
        };
        log::info!("Recording started: {}", path.display());

        self.state = RecordingState::Recording;
        self.started_at = Some(now);
        self.temp_path = Some(path);
        self.rows_written = 0;
        Ok(())
    }

    /// Append one row if recording. Write failures are logged only.
    pub fn append(&mut self, sample: &GyroSample, now: DateTime<Local>) {
        if self.state != RecordingState::Recording {
            return;
        }
        let (Some(writer), Some(started_at)) = (self.writer.as_mut(), self.started_at) else {
            return;
        };

        let elapsed = (now - started_at).num_milliseconds() as f64 / 1000.0;
        match writer.write_all(format_row(elapsed, sample).as_bytes()) {
            Ok(()) => self.rows_written += 1,
            Err(e) => log::warn!("Failed to write recording row: {}", e),
        }
    }

    /// Transition Recording → Idle, flush and close the file.
    /// `now` fixes the name offered in the save dialog.
    pub fn stop(&mut self, now: DateTime<Local>) -> AxelResult<PendingRecording> {
        if self.state != RecordingState::Recording {
            return Err(AxelError::NotRecording);
        }

        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                log::error!("Failed to flush recording: {}", e);
            }
            // Dropping the writer closes the file
        }
        self.state = RecordingState::Idle;

        let temp_path = self.temp_path.take().unwrap_or_default();
        let started_at = self.started_at.take().unwrap_or_else(Local::now);
        log::info!(
            "Recording stopped after {} rows: {}",
            self.rows_written,
            temp_path.display()
        );

        Ok(PendingRecording {
            dir: self.dir.clone(),
            temp_path,
            started_at,
            default_name: timestamp_name(now, &self.config),
            config: self.config.clone(),
        })
    }
}

fn open_with_header(path: &Path) -> AxelResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| AxelError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", CSV_HEADER).map_err(|e| AxelError::io(path, e))?;
    Ok(writer)
}

fn timestamp_name(now: DateTime<Local>, config: &RecordingConfig) -> String {
    now.format(&config.timestamp_format).to_string()
}

/// A stopped recording waiting for the user to name it
#[derive(Debug, Clone)]
pub struct PendingRecording {
    dir: PathBuf,
    temp_path: PathBuf,
    started_at: DateTime<Local>,
    default_name: String,
    config: RecordingConfig,
}

impl PendingRecording {
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Name pre-filled in the save dialog, fixed at stop time
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Rename the temp file to `<dir>/<name>.<ext>` and build the share request.
    /// A blank name falls back to the current timestamp.
    pub fn save(
        &self,
        name: &str,
        now: DateTime<Local>,
        share: &ShareConfig,
    ) -> AxelResult<ShareRequest> {
        let name = name.trim();
        let name = if name.is_empty() {
            timestamp_name(now, &self.config)
        } else {
            validate_file_name(name)?.to_string()
        };

        let final_path = self
            .dir
            .join(format!("{}.{}", name, self.config.file_extension));

        if final_path == self.temp_path {
            // No rename, but the file must have been created at start
            if !self.temp_path.exists() {
                return Err(AxelError::io(
                    &self.temp_path,
                    io::Error::from(io::ErrorKind::NotFound),
                ));
            }
        } else {
            if final_path.exists() {
                return Err(AxelError::FileExists(final_path));
            }
            fs::rename(&self.temp_path, &final_path)
                .map_err(|e| AxelError::io(&self.temp_path, e))?;
        }

        log::info!("Recording saved as {}", final_path.display());
        Ok(ShareRequest {
            path: final_path,
            mime_type: share.mime_type.clone(),
            authority: share.authority.clone(),
            chooser_title: share.chooser_title.clone(),
        })
    }

    /// Dialog cancelled. The temp file stays in the cache directory.
    pub fn discard(self) {
        log::info!("Save cancelled, leaving {}", self.temp_path.display());
    }
}

fn validate_file_name(name: &str) -> AxelResult<&str> {
    let invalid = name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(AxelError::InvalidFileName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path(), RecordingConfig::default());

        assert_eq!(recorder.state(), RecordingState::Idle);
        assert!(recorder.stop(at(12, 0, 0)).is_err());

        recorder.start(at(12, 0, 0)).unwrap();
        assert!(recorder.is_recording());
        assert!(matches!(
            recorder.start(at(12, 0, 1)),
            Err(AxelError::AlreadyRecording)
        ));

        recorder.stop(at(12, 0, 2)).unwrap();
        assert_eq!(recorder.state(), RecordingState::Idle);
    }

    #[test]
    fn test_temp_file_named_after_start_time() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path(), RecordingConfig::default());
        recorder.start(at(9, 5, 7)).unwrap();
        assert_eq!(
            recorder.temp_path().unwrap(),
            dir.path().join("2024-05-01_09-05-07.csv")
        );
    }

    #[test]
    fn test_append_ignored_when_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path(), RecordingConfig::default());
        recorder.append(&GyroSample::new(1.0, 2.0, 3.0, 0), at(12, 0, 0));
        assert_eq!(recorder.rows_written(), 0);
    }

    #[test]
    fn test_unwritable_dir_still_records() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut recorder = Recorder::new(&missing, RecordingConfig::default());

        recorder.start(at(12, 0, 0)).unwrap();
        assert!(recorder.is_recording());
        assert!(!recorder.has_writer());
        recorder.append(&GyroSample::new(1.0, 2.0, 3.0, 0), at(12, 0, 1));
        assert_eq!(recorder.rows_written(), 0);

        let pending = recorder.stop(at(12, 0, 2)).unwrap();
        assert!(pending
            .save("x", at(12, 0, 2), &ShareConfig::default())
            .is_err());
    }

    #[test]
    fn test_unwritable_dir_save_under_temp_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let mut recorder = Recorder::new(&missing, RecordingConfig::default());

        recorder.start(at(12, 0, 0)).unwrap();
        let pending = recorder.stop(at(12, 0, 0)).unwrap();
        assert_eq!(pending.default_name(), "2024-05-01_12-00-00");

        let share = ShareConfig::default();
        assert!(matches!(
            pending.save("", at(12, 0, 0), &share),
            Err(AxelError::Io { .. })
        ));
        assert!(matches!(
            pending.save(pending.default_name(), at(12, 0, 0), &share),
            Err(AxelError::Io { .. })
        ));
        assert!(!pending.temp_path().exists());
    }

    #[test]
    fn test_default_name_fixed_at_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path(), RecordingConfig::default());
        recorder.start(at(12, 0, 0)).unwrap();
        let pending = recorder.stop(at(12, 0, 9)).unwrap();
        assert_eq!(pending.default_name(), "2024-05-01_12-00-09");
    }

    #[test]
    fn test_invalid_names() {
        for name in ["..", ".", "a/b", "a\\b", "nul\0"] {
            assert!(matches!(
                validate_file_name(name),
                Err(AxelError::InvalidFileName(_))
            ));
        }
        assert!(validate_file_name("ride 1").is_ok());
    }

    #[test]
    fn test_blank_name_uses_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path(), RecordingConfig::default());
        recorder.start(at(12, 0, 0)).unwrap();
        let pending = recorder.stop(at(12, 0, 5)).unwrap();

        let share = pending
            .save("   ", at(12, 30, 0), &ShareConfig::default())
            .unwrap();
        assert_eq!(share.path, dir.path().join("2024-05-01_12-30-00.csv"));
        assert!(share.path.exists());
        assert!(!dir.path().join("2024-05-01_12-00-00.csv").exists());
    }

    #[test]
    fn test_saving_under_temp_name_is_noop_rename() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::new(dir.path(), RecordingConfig::default());
        recorder.start(at(12, 0, 0)).unwrap();
        let pending = recorder.stop(at(12, 0, 0)).unwrap();

        let share = pending
            .save("2024-05-01_12-00-00", at(12, 0, 0), &ShareConfig::default())
            .unwrap();
        assert_eq!(share.path, pending.temp_path());
        assert!(share.path.exists());
    }
}
