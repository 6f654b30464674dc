use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Dropdown value reserved for the "All Sites" option.
pub const ALL_SITES: &str = "ALL";

/// Display label of the synthetic "All Sites" option.
pub const ALL_SITES_LABEL: &str = "All Sites";

// ---------------------------------------------------------------------------
// OutcomeClass – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome.  Ordered so that `Failure` (0) sorts before `Success` (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutcomeClass {
    Failure,
    Success,
}

impl OutcomeClass {
    /// Interpret a raw `class` cell.  Only 0 and 1 are valid.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OutcomeClass::Failure),
            1 => Some(OutcomeClass::Success),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            OutcomeClass::Failure => 0,
            OutcomeClass::Success => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutcomeClass::Failure => "Failure",
            OutcomeClass::Success => "Success",
        }
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source CSV).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub flight_number: i64,
    pub launch_site: String,
    pub outcome_class: OutcomeClass,
    pub payload_mass_kg: f64,
    pub booster_version: String,
    pub booster_version_category: String,
}

// ---------------------------------------------------------------------------
// Site selection coming from the dropdown
// ---------------------------------------------------------------------------

/// The dropdown value, either the `ALL` sentinel or one launch site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn from_value(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value.to_string())
        }
    }

    /// Whether a record launched from `site` passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(selected) => selected == site,
        }
    }
}

/// One entry of the launch site dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteOption {
    pub label: String,
    pub value: String,
}

/// Min / max payload across the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices.
///
/// Built once at startup and never mutated afterwards; every query produces
/// a new derived view.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    sites: Vec<String>,
    /// Sorted distinct booster version categories.
    booster_categories: BTreeSet<String>,
    /// `None` only for an empty dataset.
    payload_bounds: Option<PayloadBounds>,
}

impl LaunchDataset {
    /// Build site / category indices and payload bounds from the loaded rows.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        let mut booster_categories = BTreeSet::new();
        let mut payload_bounds: Option<PayloadBounds> = None;

        for rec in &records {
            if !sites.iter().any(|s| s == &rec.launch_site) {
                sites.push(rec.launch_site.clone());
            }
            booster_categories.insert(rec.booster_version_category.clone());

            let m = rec.payload_mass_kg;
            payload_bounds = Some(match payload_bounds {
                None => PayloadBounds { min: m, max: m },
                Some(b) => PayloadBounds {
                    min: b.min.min(m),
                    max: b.max.max(m),
                },
            });
        }

        LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    pub fn payload_bounds(&self) -> Option<PayloadBounds> {
        self.payload_bounds
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Dropdown options: "All Sites" first, then one per site.
    pub fn site_options(&self) -> Vec<SiteOption> {
        std::iter::once(SiteOption {
            label: ALL_SITES_LABEL.to_string(),
            value: ALL_SITES.to_string(),
        })
        .chain(self.sites.iter().map(|s| SiteOption {
            label: s.clone(),
            value: s.clone(),
        }))
        .collect()
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        flight: i64,
        site: &str,
        class: OutcomeClass,
        payload: f64,
        category: &str,
    ) -> LaunchRecord {
        LaunchRecord {
            flight_number: flight,
            launch_site: site.to_string(),
            outcome_class: class,
            payload_mass_kg: payload,
            booster_version: format!("{category} B{flight:04}"),
            booster_version_category: category.to_string(),
        }
    }

    #[test]
    fn sites_keep_first_appearance_order() {
        let ds = LaunchDataset::from_records(vec![
            record(1, "KSC LC-39A", OutcomeClass::Success, 100.0, "FT"),
            record(2, "CCAFS LC-40", OutcomeClass::Failure, 50.0, "v1.0"),
            record(3, "KSC LC-39A", OutcomeClass::Failure, 900.0, "FT"),
        ]);
        assert_eq!(ds.sites(), ["KSC LC-39A", "CCAFS LC-40"]);
        assert_eq!(
            ds.payload_bounds(),
            Some(PayloadBounds { min: 50.0, max: 900.0 })
        );
        assert_eq!(ds.booster_categories().len(), 2);
    }

    #[test]
    fn site_options_start_with_all() {
        let ds = LaunchDataset::from_records(vec![
            record(1, "A", OutcomeClass::Success, 1.0, "FT"),
            record(2, "B", OutcomeClass::Success, 1.0, "FT"),
        ]);
        let opts = ds.site_options();
        assert_eq!(opts.len(), 3);
        assert_eq!(opts[0].label, "All Sites");
        assert_eq!(opts[0].value, ALL_SITES);
        assert_eq!(opts[2].value, "B");
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.payload_bounds(), None);
        assert_eq!(ds.site_options().len(), 1);
    }

    #[test]
    fn selection_from_value() {
        assert_eq!(SiteSelection::from_value("ALL"), SiteSelection::All);
        let sel = SiteSelection::from_value("VAFB SLC-4E");
        assert!(sel.matches("VAFB SLC-4E"));
        assert!(!sel.matches("KSC LC-39A"));
        assert!(SiteSelection::All.matches("anything"));
    }

    #[test]
    fn outcome_codes() {
        assert_eq!(OutcomeClass::from_code(0), Some(OutcomeClass::Failure));
        assert_eq!(OutcomeClass::from_code(1), Some(OutcomeClass::Success));
        assert_eq!(OutcomeClass::from_code(2), None);
        assert!(OutcomeClass::Failure < OutcomeClass::Success);
    }
}
