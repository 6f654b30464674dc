use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::data::filter::{payload_correlation, site_summary, PayloadRange, RangeError};
use crate::data::model::{LaunchDataset, PayloadBounds, SiteOption, SiteSelection};
use crate::state::DashboardState;
use crate::ui::plot::{pie_chart, scatter_chart, ChartConfig, PieDataset, ScatterDataset};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Serves the dashboard page and the chart endpoints it polls.
pub struct DashboardServer {
    config: DashboardConfig,
    state: DashboardState,
}

impl DashboardServer {
    pub fn new(config: DashboardConfig, dataset: LaunchDataset) -> Self {
        let state = DashboardState::new(dataset, config.slider);
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/static/dashboard.js", get(script_handler))
            .route("/api/sites", get(sites_handler))
            .route("/api/dataset", get(dataset_handler))
            .route("/api/pie", get(pie_handler))
            .route("/api/scatter", get(scatter_handler))
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn serve(self) -> std::io::Result<()> {
        let addr = self.config.addr();
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        log::info!("Dashboard ready at http://{addr}");

        axum::serve(listener, app).await
    }
}

// ---------------------------------------------------------------------------
// Errors at the binding boundary
// ---------------------------------------------------------------------------

/// Bad control values, rejected before they reach the filter functions.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("parameter '{param}' is not a number: '{value}'")]
    NotANumber { param: &'static str, value: String },

    #[error(transparent)]
    Range(#[from] RangeError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::debug!("Rejected request: {self}");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index_handler(State(state): State<DashboardState>) -> Html<String> {
    Html(panels::render_page(&state))
}

async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        panels::DASHBOARD_JS,
    )
}

async fn sites_handler(State(state): State<DashboardState>) -> Json<Vec<SiteOption>> {
    Json(state.dataset.site_options())
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
    launches: usize,
    sites: Vec<String>,
    payload_bounds: Option<PayloadBounds>,
}

async fn dataset_handler(State(state): State<DashboardState>) -> Json<DatasetInfo> {
    let ds = &state.dataset;
    Json(DatasetInfo {
        launches: ds.len(),
        sites: ds.sites().to_vec(),
        payload_bounds: ds.payload_bounds(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct PieQuery {
    site: Option<String>,
}

async fn pie_handler(
    State(state): State<DashboardState>,
    Query(query): Query<PieQuery>,
) -> Json<ChartConfig<PieDataset>> {
    let selection = selection(query.site.as_deref());
    log::debug!("Pie chart for {selection:?}");
    Json(pie_chart(&site_summary(&state.dataset, &selection)))
}

/// Numbers arrive as raw strings so that a malformed value becomes an
/// [`ApiError`] with a JSON body.
#[derive(Debug, Default, Deserialize)]
struct ScatterQuery {
    site: Option<String>,
    low: Option<String>,
    high: Option<String>,
}

async fn scatter_handler(
    State(state): State<DashboardState>,
    Query(query): Query<ScatterQuery>,
) -> Result<Json<ChartConfig<ScatterDataset>>, ApiError> {
    let selection = selection(query.site.as_deref());
    let low = parse_bound("low", query.low.as_deref(), state.slider.min)?;
    let high = parse_bound("high", query.high.as_deref(), state.slider.max)?;
    let range = PayloadRange::new(low, high)?;

    log::debug!("Scatter chart for {selection:?}, payload {low}..={high} kg");
    let correlation = payload_correlation(&state.dataset, &selection, range);
    Ok(Json(scatter_chart(&correlation, &state.color_map)))
}

fn selection(site: Option<&str>) -> SiteSelection {
    match site {
        Some(value) if !value.is_empty() => SiteSelection::from_value(value),
        _ => SiteSelection::All,
    }
}

fn parse_bound(param: &'static str, raw: Option<&str>, default: u32) -> Result<f64, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default as f64),
        Some(text) => text.parse::<f64>().map_err(|_| ApiError::NotANumber {
            param,
            value: text.to_string(),
        }),
    }
}
