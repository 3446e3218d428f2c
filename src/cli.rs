use crate::config::{AlertConfig, Config, DisplayKind, Waveform};
use crate::error::Error;
use clap::Parser;

/// Command line overrides for the detector.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about)]
pub struct Args {
    /// Open the dashboard window instead of printing to the console.
    /// Detection waits for the start button.
    #[arg(long, default_value_t = false)]
    pub gui: bool,
    /// Play a continuous tone on alert instead of raising the interrupt.
    #[arg(long, default_value_t = false)]
    pub test_mode: bool,
    /// Number of recent classifications averaged per camera.
    #[arg(long)]
    pub sample_size: Option<usize>,
    /// Alert threshold as a percentage of the windowed average.
    #[arg(long)]
    pub threshold_percent: Option<f32>,
    /// Tone waveform.
    #[arg(long, value_enum)]
    pub waveform: Option<Waveform>,
    /// Camera ids to select at launch. Repeat for several; all when omitted.
    #[arg(long = "camera")]
    pub cameras: Vec<String>,
}

impl Args {
    pub fn into_config(self, mut config: Config) -> Result<Config, Error> {
        if self.gui {
            config.display = DisplayKind::Gui;
            config.detect_on_start = false;
        }
        config.test_mode |= self.test_mode;

        if self.sample_size.is_some() || self.threshold_percent.is_some() {
            let sample_size = self.sample_size.unwrap_or(config.alert.sample_size);
            config.alert = match self.threshold_percent {
                Some(percent) => AlertConfig::from_percent(sample_size, percent)?,
                None => AlertConfig::new(sample_size, config.alert.probability_threshold)?,
            };
        }
        if let Some(waveform) = self.waveform {
            config.tone.waveform = waveform;
        }
        if !self.cameras.is_empty() {
            config.selected_cameras = Some(self.cameras);
        }

        Ok(config)
    }
}
