use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Table grid (shared by the signals / filtered / blacklist views)
// ---------------------------------------------------------------------------

fn cell_text(value: &CellValue) -> String {
    match value {
        CellValue::Null => "–".to_string(),
        other => other.to_string(),
    }
}

/// Render a table as a striped grid. `id_salt` keeps multiple grids in the
/// same panel from sharing egui state.
pub fn table_grid(ui: &mut Ui, id_salt: &str, table: &Table) {
    if table.is_empty() {
        ui.weak("No rows.");
        return;
    }

    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().resizable(true).at_least(60.0), table.columns().len())
            .header(20.0, |mut header| {
                for col in table.columns() {
                    header.col(|ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let idx = row.index();
                    for col in table.columns() {
                        row.col(|ui| {
                            ui.label(cell_text(table.get(idx, col)));
                        });
                    }
                });
            });
    });
}
