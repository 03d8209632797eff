// Axel gyroscope logger core
// Platform-independent chart, recording and settings logic driven by the Android shell

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod preferences;
pub mod recording;
pub mod sensors;
pub mod settings;
pub mod storage;

pub use chart::{Axis, Chart, ChartFrame, ChartGeometry, RollingBuffer};
pub use config::AppConfig;
pub use controller::{MainController, Notice, RecordAction};
pub use error::{AxelError, AxelResult};
pub use preferences::{JsonPreferences, MemoryPreferences, PreferenceStore};
pub use recording::{PendingRecording, Recorder, RecordingState};
pub use sensors::{GyroSample, SensorLabels};
pub use settings::{SettingsScreen, WindowFlags};
pub use storage::ShareRequest;
