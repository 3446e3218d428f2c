use crate::error::Error;
use chrono::{Offset, Utc};
use clap::ValueEnum;
use std::time::Duration;

/// Rule deciding when a camera's windowed average raises an alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertConfig {
    pub sample_size: usize,
    pub probability_threshold: f32,
}

impl AlertConfig {
    pub fn new(sample_size: usize, probability_threshold: f32) -> Result<Self, Error> {
        if sample_size == 0 {
            return Err(Error::InvalidConfig(
                "sample size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&probability_threshold) {
            return Err(Error::InvalidConfig(format!(
                "probability threshold {} is outside [0, 1]",
                probability_threshold
            )));
        }
        Ok(Self {
            sample_size,
            probability_threshold,
        })
    }

    /// The edit form takes the threshold as a percentage.
    pub fn from_percent(sample_size: usize, threshold_percent: f32) -> Result<Self, Error> {
        Self::new(sample_size, threshold_percent / 100.0)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            probability_threshold: 0.5,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneConfig {
    pub frequency_hz: f32,
    pub volume_db: f32,
    pub waveform: Waveform,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            volume_db: -16.0,
            waveform: Waveform::Square,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Class labels in model output order. The probability reported for a
    /// frame is the first label's.
    pub labels: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            labels: vec!["possible drowning".to_string(), "normal".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeCameraConfig {
    pub id: String,
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub permission_denied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub alert: AlertConfig,
    pub test_mode: bool,
    pub detect_on_start: bool,
    pub refresh_rate_hz: u32,
    pub logger_timezone: chrono::FixedOffset,
    pub tone: ToneConfig,
    pub classifier: ClassifierConfig,
    pub cameras: Vec<FakeCameraConfig>,
    /// Camera ids selected at launch; `None` selects every connected camera.
    pub selected_cameras: Option<Vec<String>>,
    pub display: DisplayKind,
}

impl Config {
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.refresh_rate_hz.max(1) as f64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alert: AlertConfig::default(),
            test_mode: false,
            detect_on_start: true,
            refresh_rate_hz: 60,
            logger_timezone: Utc.fix(),
            tone: ToneConfig::default(),
            classifier: ClassifierConfig::default(),
            cameras: vec![
                FakeCameraConfig {
                    id: "pool-north".to_string(),
                    label: "Pool North".to_string(),
                    width: 64,
                    height: 48,
                    permission_denied: false,
                },
                FakeCameraConfig {
                    id: "pool-south".to_string(),
                    label: "Pool South".to_string(),
                    width: 64,
                    height: 48,
                    permission_denied: false,
                },
            ],
            selected_cameras: None,
            display: DisplayKind::Console,
        }
    }
}
