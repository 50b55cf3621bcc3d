use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::trend::Trend;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: trend bucket → Color32
// ---------------------------------------------------------------------------

/// Maps the four trend buckets to distinct chart colours.
#[derive(Debug, Clone)]
pub struct TrendColors {
    mapping: BTreeMap<&'static str, Color32>,
    default_color: Color32,
}

impl Default for TrendColors {
    fn default() -> Self {
        let palette = generate_palette(Trend::ALL.len());
        let mapping: BTreeMap<&'static str, Color32> = Trend::ALL
            .iter()
            .zip(palette)
            .map(|(t, c): (&Trend, Color32)| (t.symbol(), c))
            .collect();
        TrendColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl TrendColors {
    /// Look up the colour for a trend's symbol label.
    pub fn color_for(&self, symbol: &str) -> Color32 {
        self.mapping
            .get(symbol)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (symbol, description, colour) in bucket order.
    pub fn legend_entries(&self) -> Vec<(&'static str, &'static str, Color32)> {
        Trend::ALL
            .iter()
            .map(|t| (t.symbol(), t.describe(), self.color_for(t.symbol())))
            .collect()
    }
}
