use app::App;
use clap::Parser;
use cli::Args;
use config::{Config, DisplayKind};
use device_alarm::impl_console::DeviceAlarmConsole;
use device_camera::impl_fake::DeviceCameraFake;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use frame_clock::impl_interval::FrameClockInterval;
use image_classifier::impl_fake::ImageClassifierFake;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};

mod alert;
mod app;
mod camera_session;
mod cli;
mod config;
mod detection;
mod device_alarm;
mod device_camera;
mod device_display;
mod error;
mod frame_clock;
mod image_classifier;
mod library;
mod probability_window;
mod session_registry;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Args::parse().into_config(Config::default())?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let image_classifier = Arc::new(ImageClassifierFake::load(
        &config.classifier,
        logger.clone(),
    )?);

    let device_camera = Arc::new(
        DeviceCameraFake::new(config.cameras.clone(), logger.clone()).with_warmup_frames(3),
    );

    let device_alarm = Arc::new(DeviceAlarmConsole::new(config.tone, logger.clone()));

    let (command_sender, command_receiver) = channel();

    let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> = match config.display {
        DisplayKind::Console => Arc::new(Mutex::new(DeviceDisplayConsole::new(logger.clone()))),
        DisplayKind::Gui => Arc::new(Mutex::new(DeviceDisplayGui::new(
            command_sender.clone(),
            config.alert,
            config.test_mode,
        ))),
    };

    let mut frame_clock = FrameClockInterval::new(config.frame_period());

    let mut app = App::new(
        config,
        logger,
        device_camera,
        device_alarm,
        device_display,
        image_classifier,
    );

    app.run(&mut frame_clock, command_receiver)?;

    Ok(())
}
