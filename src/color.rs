use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

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
// Color mapping: group value → Color32
// ---------------------------------------------------------------------------

/// One distinct colour per group of the ranking chart. Groups are coloured in
/// key order so a group keeps its colour while the ranking reshuffles.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
}

impl ColorMap {
    /// Build a colour map over every value a group column can take.
    pub fn new<'a>(groups: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut keys: Vec<CellValue> = groups.into_iter().cloned().collect();
        keys.sort();
        keys.dedup();

        let palette = generate_palette(keys.len());
        ColorMap {
            mapping: keys.into_iter().zip(palette).collect(),
        }
    }

    /// Look up the colour for a given group value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}
