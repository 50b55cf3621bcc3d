use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::model::CellValue;
use crate::data::trend::Trend;
use crate::data::{SHORT_TERM_CHANGE, TREND_ALIGNMENT};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trend insight plot (central panel)
// ---------------------------------------------------------------------------

/// Bar chart of `short_term_change` per signal, one coloured series per
/// trend bucket. Rows with an undefined change are left out.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.weak("Load a dataset to see trend insights.");
            return;
        }
    };

    // Group bars by trend label so each bucket becomes one legend entry.
    let mut buckets: BTreeMap<&str, Vec<Bar>> = BTreeMap::new();
    for (i, row) in dataset.rows().iter().enumerate() {
        let Some(change) = row.get(SHORT_TERM_CHANGE).and_then(CellValue::as_f64) else {
            continue;
        };
        let symbol = match row.get(TREND_ALIGNMENT) {
            Some(CellValue::String(s)) => {
                Trend::ALL
                    .iter()
                    .map(|t| t.symbol())
                    .find(|sym| *sym == s.as_str())
                    .unwrap_or("?")
            }
            _ => "?",
        };
        buckets
            .entry(symbol)
            .or_default()
            .push(Bar::new(i as f64, change).width(0.6));
    }

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Signal")
        .y_axis_label("Short-term change")
        .height(260.0)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (symbol, bars) in buckets {
                let name = Trend::ALL
                    .iter()
                    .find(|t| t.symbol() == symbol)
                    .map(|t| format!("{symbol}  {}", t.describe()))
                    .unwrap_or_else(|| symbol.to_string());

                let chart = BarChart::new(bars)
                    .name(name)
                    .color(state.trend_colors.color_for(symbol));
                plot_ui.bar_chart(chart);
            }
        });
}
