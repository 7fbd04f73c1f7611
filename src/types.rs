use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date_reported")]
    pub date_reported: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "WHO_region")]
    pub who_region: Option<String>,
    #[serde(rename = "Covid_new_hospitalizations_last_7days")]
    pub hosp_7d: Option<String>,
    #[serde(rename = "Covid_new_icu_admissions_last_7days")]
    pub icu_7d: Option<String>,
    #[serde(rename = "Covid_new_hospitalizations_last_28days")]
    pub hosp_28d: Option<String>,
    #[serde(rename = "Covid_new_icu_admissions_last_28days")]
    pub icu_28d: Option<String>,
}

/// One cleaned row of the WHO dataset. Metric fields stay `Option` so that
/// missing or non-numeric source values are excluded from sums and peaks
/// instead of being counted as zero.
#[derive(Debug, Clone)]
pub struct Observation {
    pub date: NaiveDate,
    pub country: String,
    pub who_region: Option<WhoRegion>,
    pub hosp_7d: Option<f64>,
    pub icu_7d: Option<f64>,
    pub hosp_28d: Option<f64>,
    pub icu_28d: Option<f64>,
}

/// The six WHO geographic groupings. Rows carrying any other region string
/// keep `None` and only ever appear in global views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WhoRegion {
    Amr,
    Eur,
    Afr,
    Emr,
    Sear,
    Wpr,
}

impl WhoRegion {
    pub const ALL: [WhoRegion; 6] = [
        WhoRegion::Amr,
        WhoRegion::Eur,
        WhoRegion::Afr,
        WhoRegion::Emr,
        WhoRegion::Sear,
        WhoRegion::Wpr,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            WhoRegion::Amr => "AMR",
            WhoRegion::Eur => "EUR",
            WhoRegion::Afr => "AFR",
            WhoRegion::Emr => "EMR",
            WhoRegion::Sear => "SEAR",
            WhoRegion::Wpr => "WPR",
        }
    }
}

impl FromStr for WhoRegion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AMR" => Ok(WhoRegion::Amr),
            "EUR" => Ok(WhoRegion::Eur),
            "AFR" => Ok(WhoRegion::Afr),
            "EMR" => Ok(WhoRegion::Emr),
            "SEAR" => Ok(WhoRegion::Sear),
            "WPR" => Ok(WhoRegion::Wpr),
            _ => Err(()),
        }
    }
}

impl fmt::Display for WhoRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reporting horizon for the dashboard metrics: trailing 7-day or trailing
/// 28-day counts. Selects which pair of source columns feeds the daily
/// series and the peak cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Weekly,
    Monthly,
}

impl Window {
    pub fn hosp(&self, obs: &Observation) -> Option<f64> {
        match self {
            Window::Weekly => obs.hosp_7d,
            Window::Monthly => obs.hosp_28d,
        }
    }

    pub fn icu(&self, obs: &Observation) -> Option<f64> {
        match self {
            Window::Weekly => obs.icu_7d,
            Window::Monthly => obs.icu_28d,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Window::Weekly => "last 7 days",
            Window::Monthly => "last 28 days",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Weekly => write!(f, "Weekly (7 days)"),
            Window::Monthly => write!(f, "Monthly (28 days)"),
        }
    }
}

/// Which metric the country-trend view plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Hospitalizations,
    IcuAdmissions,
}

impl Metric {
    pub fn value(&self, window: Window, obs: &Observation) -> Option<f64> {
        match self {
            Metric::Hospitalizations => window.hosp(obs),
            Metric::IcuAdmissions => window.icu(obs),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Hospitalizations => write!(f, "Hospitalizations"),
            Metric::IcuAdmissions => write!(f, "ICU admissions"),
        }
    }
}

/// User-chosen parameters for one recomputation pass. `scope = None` means
/// the global view.
#[derive(Debug, Clone, Copy)]
pub struct Filters {
    pub window: Window,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub scope: Option<WhoRegion>,
    pub metric: Metric,
}

/// One point of the global daily series. A `None` total means every source
/// value for that date was missing, which is distinct from a genuine zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub hosp: Option<f64>,
    pub icu: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub value: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryTotal {
    pub country: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionShare {
    pub region: WhoRegion,
    pub total_hosp: f64,
    pub total_icu: f64,
    pub icu_pct: f64,
}

/// One point of the top-country trend series for the chosen metric.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub country: String,
    pub value: Option<f64>,
}

/// The four summary-card figures. Totals always use the 7-day fields; the
/// peaks follow the chosen window.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFigures {
    pub total_hosp: f64,
    pub total_icu: f64,
    pub peak_hosp: Option<Peak>,
    pub peak_icu: Option<Peak>,
}

/// Everything one recomputation pass hands to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub summary: SummaryFigures,
    pub series: Vec<DailyTotal>,
    pub ranking: Vec<CountryTotal>,
    pub top_countries: Vec<String>,
    pub trend: Vec<TrendPoint>,
    pub regional: Vec<RegionShare>,
}

// Display/export rows. Numbers are pre-formatted strings so the console
// preview and the CSV export show the same values.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DailySeriesRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Hospitalizations")]
    #[tabled(rename = "Hospitalizations")]
    pub hosp: String,
    #[serde(rename = "IcuAdmissions")]
    #[tabled(rename = "IcuAdmissions")]
    pub icu: String,
    #[serde(rename = "PeakMarker")]
    #[tabled(rename = "PeakMarker")]
    pub peak_marker: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountryRankRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "TotalHospitalizations")]
    #[tabled(rename = "TotalHospitalizations")]
    pub total_hosp: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionShareRow {
    #[serde(rename = "WhoRegion")]
    #[tabled(rename = "WhoRegion")]
    pub region: String,
    #[serde(rename = "TotalHospitalizations")]
    #[tabled(rename = "TotalHospitalizations")]
    pub total_hosp: String,
    #[serde(rename = "TotalIcuAdmissions")]
    #[tabled(rename = "TotalIcuAdmissions")]
    pub total_icu: String,
    #[serde(rename = "IcuSharePct")]
    #[tabled(rename = "IcuSharePct")]
    pub icu_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TrendRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryExport {
    pub total_hospitalizations: f64,
    pub total_icu_admissions: f64,
    pub peak_hospitalizations: f64,
    pub peak_hospitalizations_date: Option<NaiveDate>,
    pub peak_icu_admissions: f64,
    pub peak_icu_admissions_date: Option<NaiveDate>,
}
