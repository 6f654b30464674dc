use super::model::{LaunchDataset, OutcomeClass, SiteSelection};

// ---------------------------------------------------------------------------
// Payload range coming from the slider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeError {
    #[error("payload bound {0} is not a finite number")]
    NotFinite(f64),
    #[error("payload bound {0} is negative")]
    Negative(f64),
    #[error("payload range is inverted: low {low} > high {high}")]
    Inverted { low: f64, high: f64 },
}

/// Inclusive payload interval, validated so that `0 <= low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        for bound in [low, high] {
            if !bound.is_finite() {
                return Err(RangeError::NotFinite(bound));
            }
            if bound < 0.0 {
                return Err(RangeError::Negative(bound));
            }
        }
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(PayloadRange { low, high })
    }

    /// Both ends are included.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

// ---------------------------------------------------------------------------
// Site summary (pie chart)
// ---------------------------------------------------------------------------

/// One labelled slice of the pie.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarySlice {
    pub label: String,
    pub value: usize,
    /// Set when the slice counts one outcome class of a single site.
    pub outcome: Option<OutcomeClass>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub title: String,
    pub slices: Vec<SummarySlice>,
}

/// Aggregate the launch outcomes for the pie chart.
///
/// * `All` → one `(site, success_count)` slice per site, in the order sites
///   first appear in the dataset; sites without a success keep a zero slice.
/// * `Site(s)` → `Failure` then `Success` counts for site `s`.  Only outcome
///   classes that actually occur are emitted, so a site with no failures
///   yields a single `Success` slice and an unknown site yields none.
pub fn site_summary(dataset: &LaunchDataset, selection: &SiteSelection) -> SiteSummary {
    match selection {
        SiteSelection::All => {
            let slices = dataset
                .sites()
                .iter()
                .map(|site| SummarySlice {
                    label: site.clone(),
                    value: dataset
                        .records()
                        .iter()
                        .filter(|r| {
                            r.launch_site == *site && r.outcome_class == OutcomeClass::Success
                        })
                        .count(),
                    outcome: None,
                })
                .collect();
            SiteSummary {
                title: "Launch Site Success Rate".to_string(),
                slices,
            }
        }
        SiteSelection::Site(site) => {
            if !dataset.has_site(site) {
                log::warn!("Pie requested for unknown launch site '{site}'");
            }
            let slices = [OutcomeClass::Failure, OutcomeClass::Success]
                .into_iter()
                .map(|class| SummarySlice {
                    label: class.label().to_string(),
                    value: dataset
                        .records()
                        .iter()
                        .filter(|r| r.launch_site == *site && r.outcome_class == class)
                        .count(),
                    outcome: Some(class),
                })
                .filter(|slice| slice.value > 0)
                .collect();
            SiteSummary {
                title: format!("Launch Site Success for {site}"),
                slices,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Payload correlation subset (scatter chart)
// ---------------------------------------------------------------------------

/// A launch projected onto the fields the scatter chart plots.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadPoint {
    pub flight_number: i64,
    pub payload_mass_kg: f64,
    pub outcome_class: OutcomeClass,
    pub booster_version: String,
    pub booster_version_category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayloadCorrelation {
    pub title: String,
    pub points: Vec<PayloadPoint>,
}

/// Launches of the selected site(s) whose payload lies in `range`, in
/// dataset order.  An empty result is a valid (empty) chart.
pub fn payload_correlation(
    dataset: &LaunchDataset,
    selection: &SiteSelection,
    range: PayloadRange,
) -> PayloadCorrelation {
    let points = dataset
        .records()
        .iter()
        .filter(|r| selection.matches(&r.launch_site))
        .filter(|r| range.contains(r.payload_mass_kg))
        .map(|r| PayloadPoint {
            flight_number: r.flight_number,
            payload_mass_kg: r.payload_mass_kg,
            outcome_class: r.outcome_class,
            booster_version: r.booster_version.clone(),
            booster_version_category: r.booster_version_category.clone(),
        })
        .collect();

    PayloadCorrelation {
        title: "Success Correlation with Payload".to_string(),
        points,
    }
}
