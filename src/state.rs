use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::SliderConfig;
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// Everything the request handlers read.  Built once after the dataset is
/// loaded; cloning only bumps reference counts.
#[derive(Clone)]
pub struct DashboardState {
    /// Launch records, read-only for the lifetime of the process.
    pub dataset: Arc<LaunchDataset>,

    /// Colours of the booster version categories in the scatter chart.
    pub color_map: Arc<ColorMap>,

    /// Slider bounds, also the defaults for scatter queries.
    pub slider: SliderConfig,
}

impl DashboardState {
    pub fn new(dataset: LaunchDataset, slider: SliderConfig) -> Self {
        let color_map = ColorMap::new(dataset.booster_categories());
        Self {
            dataset: Arc::new(dataset),
            color_map: Arc::new(color_map),
            slider,
        }
    }
}
