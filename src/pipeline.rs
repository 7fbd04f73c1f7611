// The aggregation pipeline behind the dashboard.
//
// Every function here is pure: the loaded table is read-only input, each
// interaction recomputes the derived tables from scratch, and identical
// inputs always produce identical outputs (rows, order, values). Grouping
// keeps first-seen order and ranking uses a stable sort so ties never
// depend on hash-map iteration order.
use crate::types::{
    CountryTotal, DailyTotal, Dashboard, Filters, Metric, Observation, Peak, RegionShare,
    SummaryFigures, TrendPoint, WhoRegion, Window,
};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

/// How many ranked countries the trend view plots.
pub const TOP_COUNTRY_COUNT: usize = 5;

/// Rows whose date lies within `[start, end]` inclusive. A reversed range
/// simply matches nothing; the empty subset is handled by the caller, not
/// treated as an error.
pub fn filter_by_date(data: &[Observation], start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
    data.iter()
        .filter(|o| o.date >= start && o.date <= end)
        .cloned()
        .collect()
}

/// Group the subset by date and sum the chosen window's hospitalization and
/// ICU fields across all countries, ascending by date. A date whose values
/// are all missing keeps `None` so it never masquerades as a real zero.
pub fn daily_totals(subset: &[Observation], window: Window) -> Vec<DailyTotal> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut sums: HashMap<NaiveDate, (Option<f64>, Option<f64>)> = HashMap::new();
    for obs in subset {
        let entry = sums.entry(obs.date).or_insert_with(|| {
            dates.push(obs.date);
            (None, None)
        });
        if let Some(v) = window.hosp(obs) {
            entry.0 = Some(entry.0.unwrap_or(0.0) + v);
        }
        if let Some(v) = window.icu(obs) {
            entry.1 = Some(entry.1.unwrap_or(0.0) + v);
        }
    }
    dates.sort();
    dates
        .into_iter()
        .map(|date| {
            let (hosp, icu) = sums[&date];
            DailyTotal { date, hosp, icu }
        })
        .collect()
}

/// Maximum of `field` over the series and the date it occurred on. Ties go
/// to the first occurrence in ascending-date order. `None` when the series
/// is empty or every value is missing.
pub fn peak<F>(series: &[DailyTotal], field: F) -> Option<Peak>
where
    F: Fn(&DailyTotal) -> Option<f64>,
{
    let mut best: Option<Peak> = None;
    for point in series {
        let value = match field(point) {
            Some(v) => v,
            None => continue,
        };
        let replace = match &best {
            Some(b) => value > b.value,
            None => true,
        };
        if replace {
            best = Some(Peak {
                value,
                date: point.date,
            });
        }
    }
    best
}

/// Sum of `field` over the subset, ignoring missing values. An empty subset
/// sums to zero.
pub fn totals_over_period<F>(subset: &[Observation], field: F) -> f64
where
    F: Fn(&Observation) -> Option<f64>,
{
    subset.iter().filter_map(field).sum()
}

/// Countries ranked by total 7-day hospitalizations over the subset,
/// descending. The 7-day basis is fixed: the ranking does not change with
/// the weekly/monthly window choice. With `region` set, only rows from that
/// WHO region participate. Ties keep first-seen country order.
pub fn rank_countries(subset: &[Observation], region: Option<WhoRegion>) -> Vec<CountryTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();
    for obs in subset {
        if let Some(r) = region {
            if obs.who_region != Some(r) {
                continue;
            }
        }
        let entry = totals.entry(obs.country.clone()).or_insert_with(|| {
            order.push(obs.country.clone());
            0.0
        });
        if let Some(v) = obs.hosp_7d {
            *entry += v;
        }
    }
    let mut ranked: Vec<CountryTotal> = order
        .into_iter()
        .map(|country| {
            let total = totals[&country];
            CountryTotal { country, total }
        })
        .collect();
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));
    ranked
}

/// Per-region totals of the fixed 7-day fields with the ICU share as a
/// percentage of hospitalizations. Regions with no positive hospitalization
/// total are dropped (avoids division by zero and suppresses degenerate
/// regions). Descending by total hospitalizations.
pub fn regional_icu_share(subset: &[Observation]) -> Vec<RegionShare> {
    let mut sums: HashMap<WhoRegion, (f64, f64)> = HashMap::new();
    for obs in subset {
        let region = match obs.who_region {
            Some(r) => r,
            None => continue,
        };
        let entry = sums.entry(region).or_insert((0.0, 0.0));
        if let Some(v) = obs.hosp_7d {
            entry.0 += v;
        }
        if let Some(v) = obs.icu_7d {
            entry.1 += v;
        }
    }
    // Walk the closed region list so the pre-sort order is deterministic.
    let mut shares: Vec<RegionShare> = WhoRegion::ALL
        .iter()
        .filter_map(|region| {
            let (total_hosp, total_icu) = *sums.get(region)?;
            if total_hosp <= 0.0 {
                return None;
            }
            Some(RegionShare {
                region: *region,
                total_hosp,
                total_icu,
                icu_pct: total_icu / total_hosp * 100.0,
            })
        })
        .collect();
    shares.sort_by(|a, b| {
        b.total_hosp
            .partial_cmp(&a.total_hosp)
            .unwrap_or(Ordering::Equal)
    });
    shares
}

/// Time series of the chosen metric for the given countries, ascending by
/// date. With `region` set, only rows from that region participate, same as
/// the ranking the country list came from.
pub fn trend_series(
    subset: &[Observation],
    region: Option<WhoRegion>,
    countries: &[String],
    window: Window,
    metric: Metric,
) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = subset
        .iter()
        .filter(|o| match region {
            Some(r) => o.who_region == Some(r),
            None => true,
        })
        .filter(|o| countries.iter().any(|c| c == &o.country))
        .map(|o| TrendPoint {
            date: o.date,
            country: o.country.clone(),
            value: metric.value(window, o),
        })
        .collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// One full recomputation pass: filter by date, then derive every table the
/// presentation layer consumes. Returns `None` when the date range matches
/// no rows at all; a `Some` dashboard may still carry empty ranking, trend,
/// or regional tables, which the caller reports per view.
///
/// The summary totals always use the 7-day fields; the two peaks follow the
/// chosen window.
pub fn build_dashboard(data: &[Observation], filters: &Filters) -> Option<Dashboard> {
    let subset = filter_by_date(data, filters.start, filters.end);
    if subset.is_empty() {
        return None;
    }

    let series = daily_totals(&subset, filters.window);
    let summary = SummaryFigures {
        total_hosp: totals_over_period(&subset, |o| o.hosp_7d),
        total_icu: totals_over_period(&subset, |o| o.icu_7d),
        peak_hosp: peak(&series, |p| p.hosp),
        peak_icu: peak(&series, |p| p.icu),
    };

    let ranking = rank_countries(&subset, filters.scope);
    let top_countries: Vec<String> = ranking
        .iter()
        .take(TOP_COUNTRY_COUNT)
        .map(|c| c.country.clone())
        .collect();
    let trend = trend_series(
        &subset,
        filters.scope,
        &top_countries,
        filters.window,
        filters.metric,
    );
    let regional = regional_icu_share(&subset);

    Some(Dashboard {
        summary,
        series,
        ranking,
        top_countries,
        trend,
        regional,
    })
}
