use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{CmpOp, Predicate};
use crate::data::model::Table;
use crate::data::{export, loader, report};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter builder, blacklist controls, summary
// ---------------------------------------------------------------------------

/// Render the left panel: the dynamic filter form plus the knobs and
/// read-outs around it.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut apply = filter_form(ui, state);

            ui.separator();
            apply |= blacklist_controls(ui, state);
            ui.separator();
            apply |= sort_controls(ui, state);

            ui.separator();
            summary_section(ui, state);
            ui.separator();
            legend_section(ui, state);

            if apply {
                state.apply_filters();
            }
        });
}

/// The dynamic predicate rows. Returns true when the filters should be
/// re-applied.
fn filter_form(ui: &mut Ui, state: &mut AppState) -> bool {
    let columns: Vec<String> = state
        .dataset
        .as_ref()
        .map(|ds| ds.columns().to_vec())
        .unwrap_or_default();

    let mut apply = false;
    let mut remove: Option<usize> = None;

    for (i, pred) in state.predicates.iter_mut().enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            egui::ComboBox::from_id_salt(("filter_col", i))
                .width(130.0)
                .selected_text(&pred.column)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui
                            .selectable_label(pred.column == *col, col)
                            .clicked()
                        {
                            pred.column = col.clone();
                        }
                    }
                });

            egui::ComboBox::from_id_salt(("filter_op", i))
                .width(50.0)
                .selected_text(pred.op.symbol())
                .show_ui(ui, |ui: &mut Ui| {
                    for op in CmpOp::ALL {
                        if ui
                            .selectable_label(pred.op == op, op.symbol())
                            .clicked()
                        {
                            pred.op = op;
                        }
                    }
                });

            ui.add(
                egui::TextEdit::singleline(&mut pred.value)
                    .desired_width(60.0)
                    .hint_text("value"),
            );

            if ui.small_button("✕").clicked() {
                remove = Some(i);
            }
        });
    }

    if let Some(i) = remove {
        state.remove_predicate(i);
        apply = true;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("+ Add filter").clicked() {
            state.add_predicate();
        }
        if ui
            .button(RichText::new("Apply Filters").strong())
            .clicked()
        {
            apply = true;
        }
    });

    for error in &state.filter_errors {
        ui.colored_label(Color32::ORANGE, format!("⚠ {error}"));
    }

    apply
}

fn blacklist_controls(ui: &mut Ui, state: &mut AppState) -> bool {
    ui.strong("Blacklist");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Minimum size");
        ui.add(egui::DragValue::new(&mut state.min_blacklist_size).range(0..=10_000))
            .changed()
    })
    .inner
}

fn sort_controls(ui: &mut Ui, state: &mut AppState) -> bool {
    let columns: Vec<String> = state
        .dataset
        .as_ref()
        .map(|ds| ds.columns().to_vec())
        .unwrap_or_default();

    let mut changed = false;
    ui.strong("Sort filtered by");
    ui.horizontal(|ui: &mut Ui| {
        let label = state.sort_column.clone().unwrap_or_else(|| "(none)".to_string());
        egui::ComboBox::from_id_salt("sort_col")
            .width(140.0)
            .selected_text(label)
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(state.sort_column.is_none(), "(none)")
                    .clicked()
                {
                    state.sort_column = None;
                    changed = true;
                }
                for col in &columns {
                    let selected = state.sort_column.as_deref() == Some(col.as_str());
                    if ui.selectable_label(selected, col).clicked() {
                        state.sort_column = Some(col.clone());
                        changed = true;
                    }
                }
            });
        if ui
            .checkbox(&mut state.sort_ascending, "ascending")
            .changed()
        {
            changed = true;
        }
    });
    changed
}

fn summary_section(ui: &mut Ui, state: &AppState) {
    ui.strong("Filtered summary");
    let Some(summary) = &state.summary else {
        ui.weak("Apply filters to see statistics.");
        return;
    };

    let fmt = |v: Option<f64>| match v {
        Some(v) => format!("{v:.2}"),
        None => "–".to_string(),
    };

    ui.label(format!("Rows: {}", summary.rows));
    if summary.missing_cells > 0 {
        ui.colored_label(
            Color32::ORANGE,
            format!("Missing values: {}", summary.missing_cells),
        );
    }
    ui.label(format!(
        "ROI  max {}  mean {}",
        fmt(summary.max_roi),
        fmt(summary.mean_roi)
    ));
    ui.label(format!(
        "X's  max {}  mean {}",
        fmt(summary.max_x_multiple),
        fmt(summary.mean_x_multiple)
    ));

    if let Some(filtered) = &state.filtered {
        if let Some(i) = report::top_row(filtered, crate::data::ROI) {
            ui.label(format!("Top ROI: row {}", i + 1));
        }
        if let Some(i) = report::top_row(filtered, crate::data::X_MULTIPLE) {
            ui.label(format!("Top X's: row {}", i + 1));
        }
    }
}

fn legend_section(ui: &mut Ui, state: &AppState) {
    ui.strong("Trend legend");
    for (symbol, description, color) in state.trend_colors.legend_entries() {
        ui.colored_label(color, format!("{symbol}  {description}"));
    }
    ui.weak("Rows are read in order as the time axis; the first row's trend is always \"-\".");
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load demo data").clicked() {
                state.set_dataset(loader::demo_table());
                ui.close_menu();
            }
            ui.separator();
            let filtered = state.filtered.clone();
            if ui
                .add_enabled(filtered.is_some(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                if let Some(table) = filtered {
                    export_csv_dialog(state, &table, "filtered_signals.csv");
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(
                    state.filtered.is_some(),
                    egui::Button::new("Export key columns CSV…"),
                )
                .clicked()
            {
                export_key_columns(state);
                ui.close_menu();
            }
            let blacklist = state.blacklist.clone();
            if ui
                .add_enabled(blacklist.is_some(), egui::Button::new("Export blacklist CSV…"))
                .clicked()
            {
                if let Some(table) = blacklist {
                    export_csv_dialog(state, &table, "blacklist.csv");
                }
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(
                    !state.predicates.is_empty(),
                    egui::Button::new("Save filter preset…"),
                )
                .clicked()
            {
                save_preset_dialog(state);
                ui.close_menu();
            }
            if ui.button("Load filter preset…").clicked() {
                load_preset_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let filtered = state.filtered.as_ref().map(Table::len).unwrap_or(0);
            let blacklisted = state.blacklist.as_ref().map(Table::len).unwrap_or(0);
            ui.label(format!(
                "{} signals loaded, {} after filters, {} blacklisted",
                ds.len(),
                filtered,
                blacklisted
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open signal data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} signals with columns {:?}",
                    table.len(),
                    table.columns()
                );
                state.set_dataset(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

fn export_csv_dialog(state: &mut AppState, table: &Table, default_name: &str) {
    let file = rfd::FileDialog::new()
        .set_title("Export CSV")
        .add_filter("CSV", &["csv"])
        .set_file_name(default_name)
        .save_file();

    if let Some(path) = file {
        match export::save_csv(table, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", table.len(), path.display());
            }
            Err(e) => {
                log::error!("CSV export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Export only the launch-time and outcome columns of the filtered view.
fn export_key_columns(state: &mut AppState) {
    let Some(filtered) = state.filtered.clone() else {
        return;
    };
    match filtered.select(&[crate::data::TIME_CREATED, crate::data::ROI, crate::data::X_MULTIPLE]) {
        Ok(projected) => export_csv_dialog(state, &projected, "key_columns.csv"),
        Err(e) => {
            log::error!("key column projection failed: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}

fn read_preset(path: &Path) -> Result<Vec<Predicate>> {
    let text = std::fs::read_to_string(path).context("reading preset file")?;
    serde_json::from_str(&text).context("parsing preset JSON")
}

fn save_preset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filter preset")
        .add_filter("JSON", &["json"])
        .set_file_name("filters.json")
        .save_file();

    if let Some(path) = file {
        let result = serde_json::to_string_pretty(&state.predicates)
            .context("serializing preset")
            .and_then(|json| {
                std::fs::write(&path, json).context("writing preset file")
            });
        match result {
            Ok(()) => log::info!("Saved {} filters to {}", state.predicates.len(), path.display()),
            Err(e) => {
                log::error!("Preset save failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

fn load_preset_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load filter preset")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match read_preset(&path) {
            Ok(predicates) => {
                log::info!("Loaded {} filters from {}", predicates.len(), path.display());
                state.predicates = predicates;
                state.apply_filters();
            }
            Err(e) => {
                log::error!("Preset load failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
