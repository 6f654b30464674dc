use std::fmt::Write;

use crate::config::SliderConfig;
use crate::data::model::{ALL_SITES, SiteOption};
use crate::state::DashboardState;

/// Chart.js CDN URL for rendering charts
pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

pub const PAGE_TITLE: &str = "SpaceX Launch Records Dashboard";

/// Element ids shared with `static/dashboard.js`.
pub mod ids {
    pub const SITE_DROPDOWN: &str = "site-dropdown";
    pub const PIE_CHART: &str = "success-pie-chart";
    pub const PAYLOAD_LOW: &str = "payload-low";
    pub const PAYLOAD_HIGH: &str = "payload-high";
    pub const SCATTER_CHART: &str = "success-payload-scatter-chart";
}

/// Script driving the controls; served at `/static/dashboard.js`.
pub const DASHBOARD_JS: &str = include_str!("static/dashboard.js");

// ---------------------------------------------------------------------------
// Page layout
// ---------------------------------------------------------------------------

/// Render the full dashboard page: header, site dropdown, pie chart,
/// payload range slider and scatter chart, top to bottom.
pub fn render_page(state: &DashboardState) -> String {
    let dataset = &state.dataset;
    let bounds_note = match dataset.payload_bounds() {
        Some(b) => format!(
            "{} launches, payloads from {} kg to {} kg",
            dataset.len(),
            b.min,
            b.max
        ),
        None => "No launches loaded".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>{css}</style>
</head>
<body>
    <h1 class="page-title">{title}</h1>
    {dropdown}
    <br>
    <div class="chart-container"><canvas id="{pie}"></canvas></div>
    <br>
    <p>Payload range (Kg):</p>
    {slider}
    <p class="note">{bounds_note}</p>
    <div class="chart-container"><canvas id="{scatter}"></canvas></div>
    <p id="status" class="status"></p>
    <script src="/static/dashboard.js"></script>
</body>
</html>"#,
        title = PAGE_TITLE,
        cdn = CHART_JS_CDN,
        css = PAGE_CSS,
        dropdown = site_dropdown(&dataset.site_options()),
        pie = ids::PIE_CHART,
        slider = payload_slider(&state.slider),
        bounds_note = escape_html(&bounds_note),
        scatter = ids::SCATTER_CHART,
    )
}

/// Launch site `<select>`, "All Sites" preselected.
pub fn site_dropdown(options: &[SiteOption]) -> String {
    let mut html = format!(
        r#"<select id="{}" class="dropdown" title="Select a Launch Site here">"#,
        ids::SITE_DROPDOWN
    );
    html.push_str(r#"<option value="" disabled>Select a Launch Site here</option>"#);
    for opt in options {
        let selected = if opt.value == ALL_SITES { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{selected}>{}</option>"#,
            escape_html(&opt.value),
            escape_html(&opt.label)
        );
    }
    html.push_str("</select>");
    html
}

/// Two-handle range slider built from a pair of range inputs, with a tick
/// label at every step.
pub fn payload_slider(slider: &SliderConfig) -> String {
    let input = |id: &str, value: u32| {
        format!(
            r#"<input type="range" id="{id}" min="{}" max="{}" step="{}" value="{value}" list="payload-marks">"#,
            slider.min, slider.max, slider.step
        )
    };

    let mut marks = String::from(r#"<datalist id="payload-marks">"#);
    let mut labels = String::from(r#"<div class="marks">"#);
    for m in slider.marks() {
        let _ = write!(marks, r#"<option value="{m}" label="{m}"></option>"#);
        let _ = write!(labels, "<span>{m}</span>");
    }
    marks.push_str("</datalist>");
    labels.push_str("</div>");

    format!(
        r#"<div class="slider">{}{}{}{}<output id="payload-value">{} – {} kg</output></div>"#,
        input(ids::PAYLOAD_LOW, slider.min),
        input(ids::PAYLOAD_HIGH, slider.max),
        marks,
        labels,
        slider.min,
        slider.max
    )
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PAGE_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 2rem; }
.page-title { text-align: center; color: #503D36; font-size: 40px; }
.dropdown { width: 100%; padding: 0.5rem; font-size: 1rem; }
.chart-container { max-width: 900px; margin: 0 auto; }
.slider { position: relative; max-width: 900px; margin: 0 auto; }
.slider input[type=range] { width: 100%; }
.marks { display: flex; justify-content: space-between; font-size: 0.8rem; color: #666; }
.note { text-align: center; color: #666; font-size: 0.9rem; }
.status { color: #b00020; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::LaunchDataset;
    use crate::data::model::OutcomeClass::Success;

    #[test]
    fn page_contains_controls_and_charts() {
        let ds = LaunchDataset::from_records(vec![
            record(1, "CCAFS LC-40", Success, 500.0, "v1.0"),
            record(2, "KSC LC-39A", Success, 9600.0, "FT"),
        ]);
        let html = render_page(&DashboardState::new(ds, SliderConfig::default()));

        assert!(html.contains("<h1 class=\"page-title\">SpaceX Launch Records Dashboard</h1>"));
        assert!(html.contains(r#"id="site-dropdown""#));
        assert!(html.contains(r#"<option value="ALL" selected>All Sites</option>"#));
        assert!(html.contains(r#"<option value="KSC LC-39A">KSC LC-39A</option>"#));
        assert!(html.contains(r#"id="success-pie-chart""#));
        assert!(html.contains(r#"id="success-payload-scatter-chart""#));
        assert!(html.contains("Payload range (Kg):"));
        assert!(html.contains("2 launches, payloads from 500 kg to 9600 kg"));
        assert!(html.contains(CHART_JS_CDN));
    }

    #[test]
    fn slider_has_step_and_marks() {
        let html = payload_slider(&SliderConfig::default());
        assert!(html.contains(r#"id="payload-low" min="0" max="10000" step="1000" value="0""#));
        assert!(html.contains(
            r#"id="payload-high" min="0" max="10000" step="1000" value="10000""#
        ));
        assert_eq!(html.matches("<span>").count(), 11);
    }

    #[test]
    fn script_drops_superseded_chart_responses() {
        // A slow response for an earlier selection must not replace a newer chart.
        assert!(DASHBOARD_JS.contains("latest[canvasId] === ticket"));
        assert_eq!(DASHBOARD_JS.matches("await fetchLatest(").count(), 2);
        assert!(!DASHBOARD_JS.contains("await fetchChart('/api"));
    }

    #[test]
    fn dropdown_escapes_site_names() {
        let html = site_dropdown(&[SiteOption {
            label: "<Pad \"39\">".to_string(),
            value: "<Pad \"39\">".to_string(),
        }]);
        assert!(html.contains("&lt;Pad &quot;39&quot;&gt;"));
        assert!(!html.contains("<Pad"));
    }

    #[test]
    fn escape_html_handles_all_specials() {
        assert_eq!(escape_html(r#"a&b<c>"d"'e"#), "a&amp;b&lt;c&gt;&quot;d&quot;&#39;e");
    }
}
