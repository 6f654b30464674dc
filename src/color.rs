use std::collections::{BTreeMap, BTreeSet};

use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::OutcomeClass;

/// Fallback for values the map has never seen.
pub const DEFAULT_COLOR: &str = "#9e9e9e";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// formatted as CSS hex strings.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_hex((i as f32 / n as f32) * 360.0))
        .collect()
}

fn hsl_hex(hue: f32) -> String {
    let hsl = Hsl::new(hue, 0.75, 0.55);
    let rgb: Srgb = hsl.into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}

/// Fixed colour per launch outcome, so a single-site pie keeps the same
/// colouring whether one or both outcomes are present.
pub fn outcome_color(class: OutcomeClass) -> String {
    match class {
        OutcomeClass::Failure => hsl_hex(0.0),
        OutcomeClass::Success => hsl_hex(130.0),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → colour
// ---------------------------------------------------------------------------

/// Maps the unique values of a category column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
}

impl ColorMap {
    /// Build a colour map from the sorted unique values of a column.
    pub fn new(unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &str) -> &str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COLOR)
    }
}
