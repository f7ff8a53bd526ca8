//! GUI module for the application.
//!
//! Provides a graphical interface using egui/eframe for user interaction.

pub mod render;
pub mod state;

use std::sync::mpsc::{Receiver, Sender};

use eframe::egui::{self, Vec2};

use crate::config::get_config;
use crate::scan::{create_event_channel, is_scan_running, start_manual_lookup, start_scan, ScanEvent};

use state::{GuiState, ManualLookup, ScanStatus};

/// Main GUI application struct.
pub struct GuiApp {
    /// Application state.
    state: GuiState,
    /// Sender handed to worker threads.
    event_sender: Sender<ScanEvent>,
    /// Events from worker threads, drained every frame.
    event_receiver: Receiver<ScanEvent>,
}

impl GuiApp {
    /// Create a new GUI application instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Player names may be Korean, Japanese or Chinese
        Self::setup_fonts(&cc.egui_ctx);

        let (event_sender, event_receiver) = create_event_channel();
        Self {
            state: GuiState::default(),
            event_sender,
            event_receiver,
        }
    }

    /// Setup fonts with CJK support.
    fn setup_fonts(ctx: &egui::Context) {
        let mut fonts = egui::FontDefinitions::default();

        let font_paths = [
            "C:\\Windows\\Fonts\\malgun.ttf",  // Malgun Gothic (Korean)
            "C:\\Windows\\Fonts\\YuGothM.ttc", // Yu Gothic Medium
            "C:\\Windows\\Fonts\\msyh.ttc",    // Microsoft YaHei
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ];

        let mut font_loaded = false;
        for font_path in &font_paths {
            if let Ok(font_data) = std::fs::read(font_path) {
                fonts.font_data.insert(
                    "cjk_font".to_owned(),
                    egui::FontData::from_owned(font_data),
                );

                // Fallback after the default fonts so Latin text keeps its look
                fonts
                    .families
                    .entry(egui::FontFamily::Proportional)
                    .or_default()
                    .push("cjk_font".to_owned());
                fonts
                    .families
                    .entry(egui::FontFamily::Monospace)
                    .or_default()
                    .push("cjk_font".to_owned());

                crate::log(&format!("Loaded CJK font from: {}", font_path));
                font_loaded = true;
                break;
            }
        }

        if !font_loaded {
            crate::log("Warning: Could not load a CJK font. Some names may not display correctly.");
        }

        ctx.set_fonts(fonts);
    }

    /// Drain worker events into the state.
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply_event(event);
        }

        // Worker is gone but never reported how it ended
        if self.state.status.is_running() && !is_scan_running() {
            if let Ok(event) = self.event_receiver.try_recv() {
                self.state.apply_event(event);
            } else if self.state.status.is_running() {
                self.state.status = ScanStatus::Error("Scan stopped unexpectedly".to_string());
            }
        }
    }

    /// Handle scan button click.
    fn handle_scan(&mut self) {
        match start_scan(get_config().clone(), self.event_sender.clone()) {
            Ok(()) => {
                self.state.begin_scan();
                crate::log("GUI: Started scan");
            }
            Err(e) => {
                self.state.status = ScanStatus::Error(e.to_string());
                crate::log(&format!("GUI: Failed to start scan: {}", e));
            }
        }
    }

    /// Handle search button click.
    fn handle_search(&mut self) {
        let username = self.state.username.trim().to_string();
        if username.is_empty() {
            self.state.manual = ManualLookup::EmptyInput;
            return;
        }

        self.state.manual = ManualLookup::Pending(username.clone());
        start_manual_lookup(get_config(), username, self.event_sender.clone());
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        // Keep repainting while workers report progress
        if self.state.status.is_running() || matches!(self.state.manual, ManualLookup::Pending(_)) {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Rivals Lobby Tracker");
            ui.add_space(16.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                if render::render_scan_controls(ui, &self.state) {
                    self.handle_scan();
                }

                render::render_progress(ui, &self.state);

                render::render_report(ui, &self.state, get_config().top_heroes);

                if render::render_manual_lookup(ui, &mut self.state) {
                    self.handle_search();
                }
            });
        });
    }
}

/// Run the GUI application.
/// This function blocks until the window is closed.
pub fn run_gui() -> eframe::Result<()> {
    crate::log("GUI: Creating native options...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(Vec2::new(720.0, 800.0))
            .with_min_inner_size(Vec2::new(480.0, 400.0))
            .with_title("Rivals Lobby Tracker"),
        ..Default::default()
    };

    eframe::run_native(
        "Rivals Lobby Tracker",
        options,
        Box::new(|cc| {
            crate::log("GUI: Creating GuiApp instance...");
            Ok(Box::new(GuiApp::new(cc)))
        }),
    )
}
