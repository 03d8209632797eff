//! Main screen: sensor callbacks, the record button and the save dialog.

use crate::chart::{Chart, ChartFrame, Label};
use crate::config::AppConfig;
use crate::error::{AxelError, AxelResult};
use crate::preferences::PreferenceStore;
use crate::recording::{PendingRecording, Recorder, RecordingState};
use crate::sensors::{GyroSample, SensorLabels};
use crate::settings::{SettingsScreen, WindowFlags};
use crate::storage::ShareRequest;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const BUTTON_START: &str = "▶";
pub const BUTTON_STOP: &str = "■";

/// Short transient message shown as a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    RecordingStarted,
    SaveFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::RecordingStarted => "Recording started",
            Notice::SaveFailed => "Save failed",
        }
    }
}

/// Result of a record-button click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    Started {
        button_label: &'static str,
        notice: Notice,
    },
    /// Show the save dialog pre-filled with `default_name`
    Stopped {
        button_label: &'static str,
        default_name: String,
    },
}

impl RecordAction {
    pub fn button_label(&self) -> &'static str {
        match self {
            RecordAction::Started { button_label, .. } => *button_label,
            RecordAction::Stopped { button_label, .. } => *button_label,
        }
    }
}

pub struct MainController {
    config: AppConfig,
    chart: Chart,
    recorder: Recorder,
    pending: Option<PendingRecording>,
    prefs: Box<dyn PreferenceStore + Send>,
    listening: bool,
    last_labels: Option<SensorLabels>,
}

impl MainController {
    /// `cache_dir` receives recordings; `prefs` backs the settings screen
    pub fn new(
        config: AppConfig,
        cache_dir: impl Into<PathBuf>,
        prefs: Box<dyn PreferenceStore + Send>,
    ) -> Self {
        let chart = Chart::new(config.chart.clone());
        let recorder = Recorder::new(cache_dir, config.recording.clone());
        MainController {
            config,
            chart,
            recorder,
            pending: None,
            prefs,
            listening: false,
            last_labels: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recorder.state()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn last_labels(&self) -> Option<&SensorLabels> {
        self.last_labels.as_ref()
    }

    /// Screen visible: sensor listener registered
    pub fn on_resume(&mut self) {
        self.listening = true;
        log::debug!("Gyroscope listener registered");
    }

    /// Screen hidden: sensor listener unregistered
    pub fn on_pause(&mut self) {
        self.listening = false;
        log::debug!("Gyroscope listener unregistered");
    }

    /// One gyroscope callback. Returns `None` while paused.
    pub fn on_sensor_changed(
        &mut self,
        sample: GyroSample,
        now: DateTime<Local>,
    ) -> Option<SensorLabels> {
        if !self.listening {
            return None;
        }

        log::debug!(
            target: "GyroscopeData",
            "Raw: x={:.6}, y={:.6}, z={:.6}",
            sample.x,
            sample.y,
            sample.z
        );

        self.chart.add_sample(&sample);
        let labels = SensorLabels::from_sample(&sample);
        self.recorder.append(&sample, now);
        self.last_labels = Some(labels.clone());
        Some(labels)
    }

    pub fn chart_frame(&self, width: f32, height: f32) -> ChartFrame {
        self.chart.frame(width, height)
    }

    pub fn chart_labels(&self, width: f32, height: f32) -> Vec<Label> {
        self.chart.labels(width, height)
    }

    /// Toggle between idle and recording
    pub fn on_record_clicked(&mut self, now: DateTime<Local>) -> AxelResult<RecordAction> {
        if self.recorder.is_recording() {
            let pending = self.recorder.stop(now)?;
            let default_name = pending.default_name().to_string();
            if let Some(previous) = self.pending.replace(pending) {
                previous.discard();
            }
            Ok(RecordAction::Stopped {
                button_label: BUTTON_START,
                default_name,
            })
        } else {
            self.recorder.start(now)?;
            Ok(RecordAction::Started {
                button_label: BUTTON_STOP,
                notice: Notice::RecordingStarted,
            })
        }
    }

    /// Name pre-filled in the open save dialog, if any
    pub fn pending_default_name(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.default_name())
    }

    /// Save dialog confirmed. Any failure becomes [`Notice::SaveFailed`].
    pub fn on_save_confirmed(
        &mut self,
        name: &str,
        now: DateTime<Local>,
    ) -> Result<ShareRequest, Notice> {
        self.try_save(name, now).map_err(|e| {
            log::warn!("Saving recording failed: {}", e);
            Notice::SaveFailed
        })
    }

    fn try_save(&mut self, name: &str, now: DateTime<Local>) -> AxelResult<ShareRequest> {
        let pending = self.pending.take().ok_or(AxelError::NotRecording)?;
        pending.save(name, now, &self.config.share)
    }

    pub fn on_save_cancelled(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.discard();
        }
    }

    /// Settings button: flags for the main window, read from the store
    pub fn on_settings_opened(&self) -> WindowFlags {
        WindowFlags::from_store(&*self.prefs)
    }

    /// Back from settings: re-read, the user may have toggled the flag
    pub fn on_settings_closed(&self) -> WindowFlags {
        WindowFlags::from_store(&*self.prefs)
    }

    pub fn settings(&mut self) -> SettingsScreen<'_> {
        SettingsScreen::open(&mut *self.prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;
    use chrono::TimeZone;

    fn at(s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, s).unwrap()
    }

    fn controller(dir: &std::path::Path) -> MainController {
        let mut c = MainController::new(
            AppConfig::default(),
            dir,
            Box::new(MemoryPreferences::new()),
        );
        c.on_resume();
        c
    }

    #[test]
    fn test_samples_ignored_while_paused() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        c.on_pause();
        assert!(c
            .on_sensor_changed(GyroSample::new(0.1, 0.2, 0.3, 0), at(0))
            .is_none());
        assert!(c.chart().buffer().is_empty());

        c.on_resume();
        let labels = c
            .on_sensor_changed(GyroSample::new(0.1, 0.2, 0.3, 0), at(0))
            .unwrap();
        assert_eq!(labels.x, "x=0.100000");
        assert_eq!(c.chart().buffer().len(), 1);
    }

    #[test]
    fn test_record_button_labels() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());

        let started = c.on_record_clicked(at(0)).unwrap();
        assert_eq!(started.button_label(), BUTTON_STOP);
        assert!(matches!(
            started,
            RecordAction::Started {
                notice: Notice::RecordingStarted,
                ..
            }
        ));

        let stopped = c.on_record_clicked(at(5)).unwrap();
        assert_eq!(stopped.button_label(), BUTTON_START);
        match stopped {
            RecordAction::Stopped { default_name, .. } => {
                assert_eq!(default_name, "2024-05-01_12-00-05")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_save_without_pending_fails_softly() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        assert_eq!(c.on_save_confirmed("x", at(0)), Err(Notice::SaveFailed));
    }

    #[test]
    fn test_cancel_clears_pending() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        c.on_record_clicked(at(0)).unwrap();
        c.on_record_clicked(at(1)).unwrap();
        assert_eq!(c.pending_default_name(), Some("2024-05-01_12-00-01"));
        c.on_save_cancelled();
        assert!(c.pending_default_name().is_none());
        // Temp file left behind
        assert!(dir.path().join("2024-05-01_12-00-00.csv").exists());
    }

    #[test]
    fn test_pending_name_matches_stop_action() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        c.on_record_clicked(at(0)).unwrap();
        match c.on_record_clicked(at(3)).unwrap() {
            RecordAction::Stopped { default_name, .. } => {
                assert_eq!(c.pending_default_name(), Some(default_name.as_str()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_settings_flags_follow_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(dir.path());
        assert!(!c.on_settings_opened().keep_screen_on);
        c.settings().toggle(true);
        assert!(c.on_settings_closed().keep_screen_on);
        assert!(c.settings().is_checked());
    }
}
