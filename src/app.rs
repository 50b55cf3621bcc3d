use eframe::egui;

use crate::data::loader;
use crate::state::AppState;
use crate::ui::{panels, plot, table_view};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SignalScopeApp {
    pub state: AppState,
}

impl Default for SignalScopeApp {
    fn default() -> Self {
        // Start on the built-in demo set so the pipeline is visible before
        // any file is opened.
        let mut state = AppState::default();
        state.set_dataset(loader::demo_table());
        Self { state }
    }
}

impl eframe::App for SignalScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter builder ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables and trend chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Some(dataset) = self.state.dataset.clone() {
                        egui::CollapsingHeader::new(format!("Signals ({})", dataset.len()))
                            .default_open(true)
                            .show(ui, |ui| {
                                table_view::table_grid(ui, "signals", &dataset);
                            });
                    }
                    if let Some(filtered) = self.state.filtered.clone() {
                        egui::CollapsingHeader::new(format!("Filtered ({})", filtered.len()))
                            .default_open(true)
                            .show(ui, |ui| {
                                table_view::table_grid(ui, "filtered", &filtered);
                            });
                    }
                    if let Some(blacklist) = self.state.blacklist.clone() {
                        egui::CollapsingHeader::new(format!(
                            "Blacklist ({})",
                            blacklist.len()
                        ))
                        .default_open(false)
                        .show(ui, |ui| {
                            table_view::table_grid(ui, "blacklist", &blacklist);
                        });
                    }
                    egui::CollapsingHeader::new("Trend insights")
                        .default_open(true)
                        .show(ui, |ui| {
                            plot::trend_plot(ui, &self.state);
                        });
                });
        });
    }
}
