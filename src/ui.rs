use eframe::egui;
use std::time::Instant;
use tracing::info;

use crate::command;
use crate::modes::{OptionModel, MODES};
use crate::resolver;
use crate::settings::Settings;
use crate::supervisor::{Notice, Severity, State, Supervisor};

pub fn run() {
    tracing_subscriber::fmt::init();

    let settings = Settings::default();
    let options = eframe::NativeOptions {
        initial_window_size: Some(settings.window_size),
        resizable: false,
        ..Default::default()
    };
    eframe::run_native(
        settings.title,
        options,
        Box::new(|_cc| Box::new(Frontend::new(settings))),
    );
}

struct Frontend {
    options: OptionModel,
    supervisor: Supervisor,
}

impl Frontend {
    fn new(settings: Settings) -> Self {
        let detected = resolver::autodetect(settings.candidates);
        if detected.is_empty() {
            info!("No dump1090 binary found on PATH");
        } else {
            info!("Detected {detected} on PATH");
        }

        Self {
            options: OptionModel::new(detected),
            supervisor: Supervisor::new(&settings),
        }
    }

    fn main_ui(&mut self, ctx: &egui::Context) {
        self.supervisor.tick(Instant::now());

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("options")
                .num_columns(2)
                .spacing([6.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Binary Path:");
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.options.binary)
                                .desired_width(200.0),
                        );
                        if ui.button("Browse...").clicked() {
                            self.browse();
                        }
                    });
                    ui.end_row();

                    ui.label("Mode:");
                    ui.group(|ui| {
                        ui.vertical(|ui| {
                            for (index, mode) in MODES.iter().enumerate() {
                                if ui.radio(self.options.mode == index, mode.name).clicked() {
                                    self.options.select(index);
                                }
                            }
                        });
                    });
                    ui.end_row();

                    ui.label("Extra args:");
                    ui.text_edit_singleline(&mut self.options.extra_args);
                    ui.end_row();
                });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Command:");
                let preview = command::preview(&self.options);
                ui.add(egui::Label::new(egui::RichText::new(preview).monospace()).wrap(true));
            });

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let running = self.supervisor.is_running();

                    if ui.add_enabled(running, egui::Button::new("Stop")).clicked() {
                        self.supervisor.stop();
                    }
                    if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
                        let command = command::build(&self.options);
                        // Failures come back through the notice queue
                        let _ = self.supervisor.launch(&command, Instant::now());
                    }
                });
            });

            ui.separator();
            let status = egui::RichText::new(self.supervisor.status()).small();
            match self.supervisor.state() {
                State::Exited { code } if code != 0 => {
                    let color = ui.visuals().warn_fg_color;
                    ui.colored_label(color, status);
                }
                _ => {
                    ui.label(status);
                }
            }
        });

        self.show_notices();

        if let Some(wait) = self.supervisor.time_until_poll(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }

    fn browse(&mut self) {
        let file_path = tinyfiledialogs::open_file_dialog(
            "Select dump1090 binary",
            &self.options.binary,
            None,
        );

        if let Some(path) = file_path {
            self.options.binary = path;
        }
    }

    fn show_notices(&mut self) {
        // Message boxes are modal; polling and reaping pause until they close
        for notice in self.supervisor.take_notices() {
            show_notice(&notice);
        }
    }
}

fn show_notice(notice: &Notice) {
    let icon = match notice.severity {
        Severity::Info => tinyfiledialogs::MessageBoxIcon::Info,
        Severity::Warning => tinyfiledialogs::MessageBoxIcon::Warning,
        Severity::Error => tinyfiledialogs::MessageBoxIcon::Error,
    };

    tinyfiledialogs::message_box_ok(
        &dialog_text(&notice.title),
        &dialog_text(&notice.body),
        icon,
    );
}

// tinyfiledialogs refuses to show text containing quotes
fn dialog_text(text: &str) -> String {
    text.replace(['\'', '"'], "`")
}

impl eframe::App for Frontend {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.main_ui(ctx);
    }

    fn on_close_event(&mut self) -> bool {
        if let Some(pid) = self.supervisor.pid() {
            info!("Window closing, stopping pid {pid}");
        }
        self.supervisor.stop();
        true
    }
}
