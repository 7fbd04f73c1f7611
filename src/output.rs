use crate::types::{
    CountryRankRow, DailySeriesRow, Dashboard, RegionShareRow, SummaryExport, TrendRow,
};
use crate::util::{format_number, human_format};
use serde::Serialize;
use std::error::Error;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn display_value(v: Option<f64>) -> String {
    match v {
        Some(v) => format_number(v, 0),
        None => "-".to_string(),
    }
}

/// Daily series rows with the two peak dates marked, the console stand-in
/// for the gold peak markers on the original line chart.
pub fn daily_rows(dash: &Dashboard) -> Vec<DailySeriesRow> {
    dash.series
        .iter()
        .map(|point| {
            let mut markers: Vec<&str> = Vec::new();
            if dash.summary.peak_hosp.map(|p| p.date) == Some(point.date) {
                markers.push("peak hosp");
            }
            if dash.summary.peak_icu.map(|p| p.date) == Some(point.date) {
                markers.push("peak icu");
            }
            DailySeriesRow {
                date: point.date,
                hosp: display_value(point.hosp),
                icu: display_value(point.icu),
                peak_marker: markers.join(", "),
            }
        })
        .collect()
}

pub fn ranking_rows(dash: &Dashboard) -> Vec<CountryRankRow> {
    dash.ranking
        .iter()
        .take(dash.top_countries.len())
        .enumerate()
        .map(|(idx, c)| CountryRankRow {
            rank: idx + 1,
            country: c.country.clone(),
            total_hosp: format_number(c.total, 0),
        })
        .collect()
}

pub fn region_rows(dash: &Dashboard) -> Vec<RegionShareRow> {
    dash.regional
        .iter()
        .map(|s| RegionShareRow {
            region: s.region.code().to_string(),
            total_hosp: human_format(s.total_hosp),
            total_icu: human_format(s.total_icu),
            icu_pct: format!("{:.1}%", s.icu_pct),
        })
        .collect()
}

pub fn trend_rows(dash: &Dashboard) -> Vec<TrendRow> {
    dash.trend
        .iter()
        .map(|p| TrendRow {
            date: p.date,
            country: p.country.clone(),
            value: display_value(p.value),
        })
        .collect()
}

/// Flat summary for the JSON export. Absent peaks export as `0` with a null
/// date, matching the summary-card display.
pub fn summary_export(dash: &Dashboard) -> SummaryExport {
    SummaryExport {
        total_hospitalizations: dash.summary.total_hosp,
        total_icu_admissions: dash.summary.total_icu,
        peak_hospitalizations: dash.summary.peak_hosp.map(|p| p.value).unwrap_or(0.0),
        peak_hospitalizations_date: dash.summary.peak_hosp.map(|p| p.date),
        peak_icu_admissions: dash.summary.peak_icu.map(|p| p.value).unwrap_or(0.0),
        peak_icu_admissions_date: dash.summary.peak_icu.map(|p| p.date),
    }
}
