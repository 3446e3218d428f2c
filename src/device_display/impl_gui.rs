use crate::config::AlertConfig;
use crate::detection::command::Command;
use crate::device_camera::interface::{CameraId, DeviceInfo};
use crate::device_display::interface::{format_rate, CameraStatus, DeviceDisplay};
use eframe::egui;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct DashboardState {
    cameras: Vec<CameraStatus>,
    rate: Option<f64>,
    running: bool,
    auto_stopped: bool,
    visual_alert: Option<Vec<String>>,
    devices: Vec<(DeviceInfo, bool)>,
}

struct DashboardWindow {
    state: Arc<Mutex<DashboardState>>,
    commands: Sender<Command>,
    test_mode: bool,
    sample_size_input: String,
    threshold_input: String,
    rule_error: Option<String>,
}

impl DashboardWindow {
    fn save_alert_rule(&mut self) {
        let sample_size = self.sample_size_input.trim().parse::<usize>();
        let threshold = self.threshold_input.trim().parse::<f32>();

        match (sample_size, threshold) {
            (Ok(sample_size), Ok(threshold_percent)) => {
                match AlertConfig::from_percent(sample_size, threshold_percent) {
                    Ok(_) => {
                        self.rule_error = None;
                        let _ = self.commands.send(Command::UpdateAlertRule {
                            sample_size,
                            threshold_percent,
                        });
                    }
                    Err(e) => self.rule_error = Some(e.to_string()),
                }
            }
            _ => self.rule_error = Some("Enter a whole sample size and a percentage".to_string()),
        }
    }
}

impl eframe::App for DashboardWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = self.state.clone();
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut running = state.running;
                if ui.checkbox(&mut running, "Detection").changed() {
                    state.auto_stopped = false;
                    let command = if running {
                        Command::StartDetection
                    } else {
                        Command::StopDetection
                    };
                    let _ = self.commands.send(command);
                }
                if ui.checkbox(&mut self.test_mode, "Test mode").changed() {
                    let _ = self.commands.send(Command::SetTestMode(self.test_mode));
                }
                ui.label(format!("{} fps", format_rate(state.rate)));
                if state.auto_stopped {
                    ui.label("No cameras selected");
                }
            });

            ui.horizontal(|ui| {
                ui.label("Sample size");
                ui.add(egui::TextEdit::singleline(&mut self.sample_size_input).desired_width(60.0));
                ui.label("Threshold %");
                ui.add(egui::TextEdit::singleline(&mut self.threshold_input).desired_width(60.0));
                if ui.button("Save").clicked() {
                    self.save_alert_rule();
                }
                if let Some(error) = &self.rule_error {
                    ui.colored_label(egui::Color32::RED, error.as_str());
                }
            });
        });

        egui::SidePanel::left("devices").show(ctx, |ui| {
            ui.heading("Cameras");
            for (device, selected) in state.devices.iter_mut() {
                ui.checkbox(selected, device.label.as_str());
            }
            if ui.button("Apply").clicked() {
                let ids: Vec<CameraId> = state
                    .devices
                    .iter()
                    .filter(|(_, selected)| *selected)
                    .map(|(device, _)| device.id.clone())
                    .collect();
                let _ = self.commands.send(Command::SelectCameras(ids));
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("readouts").striped(true).show(ui, |ui| {
                for camera in &state.cameras {
                    let color = if camera.alerting {
                        egui::Color32::RED
                    } else {
                        ui.visuals().text_color()
                    };
                    ui.colored_label(color, camera.label.as_str());
                    ui.colored_label(
                        color,
                        egui::RichText::new(camera.readout.to_display_string()).monospace(),
                    );
                    ui.end_row();
                }
            });
        });

        if let Some(cameras) = state.visual_alert.clone() {
            egui::Window::new("Possible drowning")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    for label in &cameras {
                        ui.colored_label(egui::Color32::RED, label.as_str());
                    }
                    if ui.button("Dismiss").clicked() {
                        let _ = self.commands.send(Command::DismissAlert);
                    }
                });
        }

        ctx.request_repaint_after(Duration::from_millis(50));
    }
}

pub struct DeviceDisplayGui {
    state: Arc<Mutex<DashboardState>>,
    commands: Sender<Command>,
    alert: AlertConfig,
    test_mode: bool,
}

impl DeviceDisplayGui {
    pub fn new(commands: Sender<Command>, alert: AlertConfig, test_mode: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(DashboardState::default())),
            commands,
            alert,
            test_mode,
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let window = DashboardWindow {
            state: self.state.clone(),
            commands: self.commands.clone(),
            test_mode: self.test_mode,
            sample_size_input: self.alert.sample_size.to_string(),
            threshold_input: format!("{}", self.alert.probability_threshold * 100.0),
            rule_error: None,
        };
        let commands = self.commands.clone();

        thread::spawn(move || {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default().with_inner_size([640.0, 360.0]),
                ..Default::default()
            };

            // Blocks this thread until the window is closed.
            let _ = eframe::run_native(
                "Drowning Detector",
                options,
                Box::new(|_cc| Box::new(window)),
            );
            let _ = commands.send(Command::Quit);
        });

        Ok(())
    }

    fn on_cycle_result(
        &mut self,
        statuses: &[CameraStatus],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut state = self.state();
        for status in statuses {
            match state.cameras.iter_mut().find(|c| c.id == status.id) {
                Some(existing) => *existing = status.clone(),
                None => state.cameras.push(status.clone()),
            }
        }
        Ok(())
    }

    fn on_auto_stop(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.state().auto_stopped = true;
        Ok(())
    }

    fn on_rate_update(&mut self, rate: Option<f64>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.state().rate = rate;
        Ok(())
    }

    fn on_detection_changed(&mut self, running: bool) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.state().running = running;
        Ok(())
    }

    fn on_visual_alert(
        &mut self,
        cameras: Option<&[String]>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.state().visual_alert = cameras.map(|c| c.to_vec());
        Ok(())
    }

    fn on_devices(
        &mut self,
        devices: &[DeviceInfo],
        active: &[CameraId],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut state = self.state();
        state.devices = devices
            .iter()
            .map(|d| (d.clone(), active.contains(&d.id)))
            .collect();
        state.cameras.retain(|c| active.contains(&c.id));
        Ok(())
    }
}
