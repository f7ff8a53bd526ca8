//! GUI rendering functions.
//!
//! Contains UI layout and component rendering logic.

use eframe::egui::{self, Color32, RichText};

use super::state::{GuiState, ManualLookup, ScanStatus};
use crate::scan::split_teams;
use crate::stats::{PlayerLookup, StatRow, COLUMNS};

const WARNING_COLOR: Color32 = Color32::from_rgb(200, 150, 0);
const ERROR_COLOR: Color32 = Color32::from_rgb(200, 0, 0);

/// Render the scan button.
/// Returns true if scan was clicked.
pub fn render_scan_controls(ui: &mut egui::Ui, state: &GuiState) -> bool {
    let mut scan_clicked = false;

    ui.horizontal(|ui| {
        // Disabled while a scan is running
        ui.add_enabled_ui(!state.status.is_running(), |ui| {
            if ui.button(RichText::new("Scan Players").size(16.0)).clicked() {
                scan_clicked = true;
            }
        });
    });

    scan_clicked
}

/// Render the status line and, while polling, the progress bar.
pub fn render_progress(ui: &mut egui::Ui, state: &GuiState) {
    ui.add_space(8.0);

    let status_color = match &state.status {
        ScanStatus::Idle => Color32::GRAY,
        ScanStatus::Polling { .. } | ScanStatus::Capturing { .. } => {
            Color32::from_rgb(0, 120, 200)
        }
        ScanStatus::Reporting { .. } | ScanStatus::Completed { .. } => {
            Color32::from_rgb(0, 150, 0)
        }
        ScanStatus::Error(_) => ERROR_COLOR,
    };
    ui.label(RichText::new(state.status.status_text()).color(status_color));

    if let Some(progress) = state.status.progress() {
        ui.add_space(4.0);
        let progress_bar = egui::ProgressBar::new(progress)
            .show_percentage()
            .animate(true);
        ui.add_sized([ui.available_width(), 20.0], progress_bar);
    }
}

/// Render the detected teams and per-player hero tables.
pub fn render_report(ui: &mut egui::Ui, state: &GuiState, top_heroes: usize) {
    let Some(report) = &state.report else {
        return;
    };

    ui.add_space(8.0);
    ui.separator();

    if report.names.is_empty() {
        ui.label(RichText::new("No player names were detected.").color(WARNING_COLOR));
        return;
    }

    let (own_team, enemy_team) = split_teams(&report.names);

    ui.heading("Your Team");
    for (i, name) in own_team.iter().enumerate() {
        render_player_line(ui, i + 1, name);
    }

    ui.add_space(8.0);
    ui.heading("Enemy Team");
    for (i, name) in enemy_team.iter().enumerate() {
        render_player_line(ui, own_team.len() + i + 1, name);
    }

    ui.add_space(8.0);
    ui.heading(format!("Player Stats (Top {} Heroes Each)", top_heroes));

    for (idx, (name, lookup)) in state.report_rows().into_iter().enumerate() {
        ui.add_space(8.0);
        ui.label(RichText::new(name).strong().size(16.0));
        match lookup {
            Some(PlayerLookup::Found(rows)) => render_stat_table(ui, &format!("scan_{}", idx), rows),
            Some(PlayerLookup::Private) => {
                ui.label(
                    RichText::new(format!("{} profile is private", name)).color(WARNING_COLOR),
                );
            }
            None => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading...");
                });
            }
        }
    }
}

fn render_player_line(ui: &mut egui::Ui, number: usize, name: &str) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("Player {}:", number)).strong());
        ui.label(name);
    });
}

/// Render one hero table.
pub fn render_stat_table(ui: &mut egui::Ui, id: &str, rows: &[StatRow]) {
    egui::Grid::new(id)
        .striped(true)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for column in COLUMNS {
                ui.label(RichText::new(column).strong());
            }
            ui.end_row();

            for row in rows {
                for cell in row.cells() {
                    ui.label(cell);
                }
                ui.end_row();
            }
        });
}

/// Render the manual lookup field and its result.
/// Returns true if search was clicked.
pub fn render_manual_lookup(ui: &mut egui::Ui, state: &mut GuiState) -> bool {
    let mut search_clicked = false;

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label("Enter player username manually:");
    ui.horizontal(|ui| {
        let response = ui.text_edit_singleline(&mut state.username);
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let pending = matches!(state.manual, ManualLookup::Pending(_));
        ui.add_enabled_ui(!pending, |ui| {
            if ui.button("Search Player").clicked() || (submitted && !pending) {
                search_clicked = true;
            }
        });
    });

    match &state.manual {
        ManualLookup::Idle => {}
        ManualLookup::EmptyInput => {
            ui.label(RichText::new("Please enter a username.").color(WARNING_COLOR));
        }
        ManualLookup::Pending(username) => {
            ui.heading(format!("Stats for {}", username));
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading...");
            });
        }
        ManualLookup::Done { username, result } => {
            ui.heading(format!("Stats for {}", username));
            match result {
                Ok(PlayerLookup::Found(rows)) => render_stat_table(ui, "manual_lookup", rows),
                Ok(PlayerLookup::Private) => {
                    ui.label(
                        RichText::new(format!("Error: Could not find player '{}'", username))
                            .color(ERROR_COLOR),
                    );
                }
                Err(e) => {
                    ui.label(
                        RichText::new(format!(
                            "Error: Could not find player '{}' ({})",
                            username, e
                        ))
                        .color(ERROR_COLOR),
                    );
                }
            }
        }
    }

    search_clicked
}
