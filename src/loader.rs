use crate::types::{Observation, RawRow, WhoRegion};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::ReaderBuilder;
use std::error::Error;
use std::io::Read;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub unknown_regions: usize,
}

/// Load and clean the WHO hospitalization CSV from a file path.
///
/// Rows without a parseable `Date_reported` are unusable for any
/// date-filtered computation and are dropped. Non-numeric metric values
/// become missing, never zero. Unrecognized region codes are kept as
/// region-less rows: they appear in global views but never match a
/// regional filter.
pub fn load_and_clean(path: &str) -> Result<(Vec<Observation>, LoadReport), Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

pub fn load_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<Observation>, LoadReport), Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut unknown_regions = 0usize;
    let mut data: Vec<Observation> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };

        let date = match parse_date_safe(row.date_reported.as_deref()) {
            Some(d) => d,
            None => {
                parse_errors += 1;
                continue;
            }
        };

        let country = row
            .country
            .unwrap_or_else(|| "Unknown".to_string())
            .trim()
            .to_string();

        let who_region = match row.who_region.as_deref() {
            Some(s) => {
                let parsed = s.parse::<WhoRegion>().ok();
                if parsed.is_none() && !s.trim().is_empty() {
                    unknown_regions += 1;
                }
                parsed
            }
            None => None,
        };

        data.push(Observation {
            date,
            country,
            who_region,
            hosp_7d: parse_f64_safe(row.hosp_7d.as_deref()),
            icu_7d: parse_f64_safe(row.icu_7d.as_deref()),
            hosp_28d: parse_f64_safe(row.hosp_28d.as_deref()),
            icu_28d: parse_f64_safe(row.icu_28d.as_deref()),
        });
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: data.len(),
        parse_errors,
        unknown_regions,
    };
    Ok((data, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "Date_reported,Country,WHO_region,\
Covid_new_hospitalizations_last_7days,Covid_new_icu_admissions_last_7days,\
Covid_new_hospitalizations_last_28days,Covid_new_icu_admissions_last_28days";

    fn load(rows: &str) -> (Vec<Observation>, LoadReport) {
        let csv = format!("{}\n{}", HEADER, rows);
        load_from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn loads_well_formed_rows() {
        let (data, report) = load("2021-01-01,France,EUR,100,20,400,80");
        assert_eq!(report.total_rows, 1);
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(report.parse_errors, 0);
        let obs = &data[0];
        assert_eq!(obs.date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(obs.country, "France");
        assert_eq!(obs.who_region, Some(WhoRegion::Eur));
        assert_eq!(obs.hosp_7d, Some(100.0));
        assert_eq!(obs.icu_28d, Some(80.0));
    }

    #[test]
    fn drops_rows_with_unparseable_dates() {
        let (data, report) = load(
            "not-a-date,France,EUR,100,20,400,80\n\
             2021-01-02,France,EUR,110,21,410,82",
        );
        assert_eq!(data.len(), 1);
        assert_eq!(report.parse_errors, 1);
        assert_eq!(report.loaded_rows, 1);
    }

    #[test]
    fn blank_and_textual_metrics_become_missing() {
        let (data, _) = load("2021-01-01,France,EUR,,n/a,400,80");
        let obs = &data[0];
        assert_eq!(obs.hosp_7d, None);
        assert_eq!(obs.icu_7d, None);
        assert_eq!(obs.hosp_28d, Some(400.0));
    }

    #[test]
    fn unknown_region_codes_load_as_region_less() {
        let (data, report) = load("2021-01-01,Atlantis,XYZ,100,20,400,80");
        assert_eq!(data[0].who_region, None);
        assert_eq!(report.unknown_regions, 1);
        // Still loaded: the row stays visible in global views.
        assert_eq!(report.loaded_rows, 1);
    }
}
