use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::{generate_palette, outcome_color, ColorMap};
use crate::data::filter::{PayloadCorrelation, SiteSummary};

/// Axis titles of the scatter chart, named after the source columns.
pub const X_AXIS_TITLE: &str = "Payload Mass (kg)";
pub const Y_AXIS_TITLE: &str = "class";

// ---------------------------------------------------------------------------
// Chart.js configuration types
// ---------------------------------------------------------------------------

/// A complete Chart.js configuration object (`new Chart(ctx, config)`).
#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig<D> {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData<D>,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Scatter,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData<D> {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<D>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieDataset {
    pub data: Vec<usize>,
    pub background_color: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterDataset {
    pub label: String,
    pub data: Vec<ScatterPoint>,
    pub background_color: String,
    pub point_radius: f32,
}

/// `x`/`y` are plotted; the rest feeds the tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: u8,
    pub flight: i64,
    pub booster: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Plugins {
    pub title: TextBlock,
    pub legend: Legend,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub display: bool,
    pub position: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: TextBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<Ticks>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub step_size: f64,
}

fn options(title: &str, scales: Option<Scales>) -> ChartOptions {
    ChartOptions {
        responsive: true,
        plugins: Plugins {
            title: TextBlock {
                display: true,
                text: title.to_string(),
            },
            legend: Legend {
                display: true,
                position: "right",
            },
        },
        scales,
    }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Pie chart of a site summary.
///
/// Per-site slices take evenly spaced palette colours; outcome slices use
/// the fixed outcome colours.
pub fn pie_chart(summary: &SiteSummary) -> ChartConfig<PieDataset> {
    let site_palette = generate_palette(summary.slices.len());
    let background_color = summary
        .slices
        .iter()
        .zip(site_palette)
        .map(|(slice, site_color)| match slice.outcome {
            Some(class) => outcome_color(class),
            None => site_color,
        })
        .collect();

    ChartConfig {
        kind: ChartKind::Pie,
        data: ChartData {
            labels: summary.slices.iter().map(|s| s.label.clone()).collect(),
            datasets: vec![PieDataset {
                data: summary.slices.iter().map(|s| s.value).collect(),
                background_color,
            }],
        },
        options: options(&summary.title, None),
    }
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

/// Scatter chart of payload vs. outcome, one dataset per booster version
/// category (sorted by category name).
pub fn scatter_chart(
    correlation: &PayloadCorrelation,
    color_map: &ColorMap,
) -> ChartConfig<ScatterDataset> {
    let mut by_category: BTreeMap<&str, Vec<ScatterPoint>> = BTreeMap::new();
    for p in &correlation.points {
        by_category
            .entry(p.booster_version_category.as_str())
            .or_default()
            .push(ScatterPoint {
                x: p.payload_mass_kg,
                y: p.outcome_class.code(),
                flight: p.flight_number,
                booster: p.booster_version.clone(),
            });
    }

    let datasets = by_category
        .into_iter()
        .map(|(category, data)| ScatterDataset {
            label: category.to_string(),
            data,
            background_color: color_map.color_for(category).to_string(),
            point_radius: 6.0,
        })
        .collect();

    let scales = Scales {
        x: Axis {
            title: TextBlock {
                display: true,
                text: X_AXIS_TITLE.to_string(),
            },
            min: None,
            max: None,
            ticks: None,
        },
        y: Axis {
            title: TextBlock {
                display: true,
                text: Y_AXIS_TITLE.to_string(),
            },
            min: Some(-0.25),
            max: Some(1.25),
            ticks: Some(Ticks { step_size: 1.0 }),
        },
    };

    ChartConfig {
        kind: ChartKind::Scatter,
        data: ChartData {
            labels: Vec::new(),
            datasets,
        },
        options: options(&correlation.title, Some(scales)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{payload_correlation, site_summary, PayloadRange};
    use crate::data::model::tests::record;
    use crate::data::model::OutcomeClass::{Failure, Success};
    use crate::data::model::{LaunchDataset, SiteSelection};

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record(1, "A", Success, 500.0, "v1.1"),
            record(2, "A", Failure, 2500.0, "FT"),
            record(3, "B", Failure, 3000.0, "FT"),
            record(4, "A", Success, 9600.0, "B5"),
        ])
    }

    fn color_map(ds: &LaunchDataset) -> ColorMap {
        ColorMap::new(ds.booster_categories())
    }

    #[test]
    fn pie_for_all_sites() {
        let chart = pie_chart(&site_summary(&dataset(), &SiteSelection::All));
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "pie");
        assert_eq!(json["data"]["labels"], serde_json::json!(["A", "B"]));
        assert_eq!(json["data"]["datasets"][0]["data"], serde_json::json!([2, 0]));
        assert_eq!(
            json["options"]["plugins"]["title"]["text"],
            "Launch Site Success Rate"
        );
        assert!(json["options"].get("scales").is_none());
    }

    #[test]
    fn outcome_slices_use_fixed_colors() {
        let ds = dataset();
        let both = pie_chart(&site_summary(&ds, &SiteSelection::Site("A".into())));
        let only_failure = pie_chart(&site_summary(&ds, &SiteSelection::Site("B".into())));

        assert_eq!(both.data.labels, ["Failure", "Success"]);
        assert_eq!(only_failure.data.labels, ["Failure"]);
        assert_eq!(
            both.data.datasets[0].background_color[0],
            only_failure.data.datasets[0].background_color[0]
        );
        assert_eq!(
            both.data.datasets[0].background_color[1],
            outcome_color(Success)
        );
    }

    #[test]
    fn scatter_groups_by_category() {
        let ds = dataset();
        let corr = payload_correlation(
            &ds,
            &SiteSelection::All,
            PayloadRange::new(0.0, 10000.0).unwrap(),
        );
        let chart = scatter_chart(&corr, &color_map(&ds));
        let labels: Vec<&str> = chart.data.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["B5", "FT", "v1.1"]);

        let ft = &chart.data.datasets[1];
        assert_eq!(ft.data.len(), 2);
        assert_eq!(ft.data[0].x, 2500.0);
        assert_eq!(ft.data[0].y, 0);
        assert_eq!(ft.background_color, color_map(&ds).color_for("FT"));

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "scatter");
        assert!(json["data"].get("labels").is_none());
        assert_eq!(json["options"]["scales"]["x"]["title"]["text"], X_AXIS_TITLE);
        assert_eq!(json["options"]["scales"]["y"]["ticks"]["stepSize"], 1.0);
    }

    #[test]
    fn empty_correlation_is_a_valid_chart() {
        let ds = dataset();
        let corr = payload_correlation(
            &ds,
            &SiteSelection::All,
            PayloadRange::new(5000.0, 6000.0).unwrap(),
        );
        let chart = scatter_chart(&corr, &ColorMap::new(&BTreeSet::new()));
        assert!(chart.data.datasets.is_empty());
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["data"]["datasets"], serde_json::json!([]));
    }
}
