// Entry point and interactive dashboard flow.
//
// Console rendition of the COVID-19 hospital & ICU capacity dashboard:
// - Option [1] loads and cleans the WHO CSV, printing diagnostics.
// - Option [2] sets the filters (time window, date range, scope, metric).
// - Option [3] recomputes the pipeline and renders every view.
// - Option [4] exports the derived tables to CSV/JSON files.
mod loader;
mod output;
mod pipeline;
mod types;
mod util;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Mutex;
use types::{Filters, Metric, Observation, WhoRegion, Window};

const DEFAULT_DATA_PATH: &str = "whoCovid19.csv";

// Simple in-memory app state so we only load/clean the CSV once but can
// recompute the dashboard for any number of filter changes in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        filters: None,
    })
});

struct AppState {
    data: Option<Vec<Observation>>,
    filters: Option<Filters>,
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    read_line("Enter choice: ")
}

/// Ask the user whether to go back to the menu after rendering the dashboard.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Full span of the loaded data, used as the default date range.
fn full_span(data: &[Observation]) -> Option<(NaiveDate, NaiveDate)> {
    let min = data.iter().map(|o| o.date).min()?;
    let max = data.iter().map(|o| o.date).max()?;
    Some((min, max))
}

fn default_filters(data: &[Observation]) -> Option<Filters> {
    let (start, end) = full_span(data)?;
    Some(Filters {
        window: Window::Weekly,
        start,
        end,
        scope: None,
        metric: Metric::Hospitalizations,
    })
}

/// Handle option [1]: load and clean the CSV file.
///
/// On success the observations land in `APP_STATE` and the filters reset to
/// their defaults over the new data's full date span.
fn handle_load() {
    let path = read_line(&format!("CSV path (Enter for {}): ", DEFAULT_DATA_PATH));
    let path = if path.is_empty() {
        DEFAULT_DATA_PATH.to_string()
    } else {
        path
    };
    match loader::load_and_clean(&path) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} observations loaded)",
                util::format_int(report.total_rows as i64),
                util::format_int(report.loaded_rows as i64)
            );
            println!(
                "Note: {} rows skipped due to parse/validation errors.",
                util::format_int(report.parse_errors as i64)
            );
            if report.unknown_regions > 0 {
                println!(
                    "Info: {} rows carry an unrecognized WHO region and only appear in global views.",
                    util::format_int(report.unknown_regions as i64)
                );
            }
            println!("");
            let filters = default_filters(&data);
            let mut state = APP_STATE.lock().unwrap();
            state.filters = filters;
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn prompt_window(current: Window) -> Window {
    let choice = read_line(&format!(
        "Time window [1] Weekly (7 days) [2] Monthly (28 days) (Enter keeps {}): ",
        current
    ));
    match choice.as_str() {
        "1" => Window::Weekly,
        "2" => Window::Monthly,
        _ => current,
    }
}

fn prompt_date(label: &str, default: NaiveDate) -> NaiveDate {
    let raw = read_line(&format!("{} (YYYY-MM-DD, Enter for {}): ", label, default));
    match util::parse_date_safe(Some(raw.as_str())) {
        Some(d) => d,
        None => {
            if !raw.is_empty() {
                println!("Unrecognized date, using {}.", default);
            }
            default
        }
    }
}

fn prompt_scope(current: Option<WhoRegion>) -> Option<WhoRegion> {
    let raw = read_line("Country group (Global or AMR/EUR/AFR/EMR/SEAR/WPR, Enter for Global): ");
    if raw.is_empty() || raw.eq_ignore_ascii_case("global") {
        return None;
    }
    match WhoRegion::from_str(&raw.to_uppercase()) {
        Ok(region) => Some(region),
        Err(_) => {
            println!("Unrecognized region, keeping current scope.");
            current
        }
    }
}

fn prompt_metric(current: Metric) -> Metric {
    let choice = read_line(&format!(
        "Trend metric [1] Hospitalizations [2] ICU admissions (Enter keeps {}): ",
        current
    ));
    match choice.as_str() {
        "1" => Metric::Hospitalizations,
        "2" => Metric::IcuAdmissions,
        _ => current,
    }
}

/// Handle option [2]: adjust the filter controls one by one. Every prompt
/// accepts Enter to keep the current (or default) value, mirroring the
/// defaults of the filter panel.
fn handle_set_filters() {
    let (data, filters) = {
        let state = APP_STATE.lock().unwrap();
        (state.data.clone(), state.filters)
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let Some(mut filters) = filters.or_else(|| default_filters(&data)) else {
        println!("Error: The loaded dataset has no usable dates.\n");
        return;
    };
    let (span_start, span_end) = full_span(&data).unwrap_or((filters.start, filters.end));

    filters.window = prompt_window(filters.window);
    filters.start = prompt_date("Start date", span_start);
    filters.end = prompt_date("End date", span_end);
    filters.scope = prompt_scope(filters.scope);
    filters.metric = prompt_metric(filters.metric);

    println!(
        "\nFilters set: {}, {} to {}, scope {}, metric {}.\n",
        filters.window,
        filters.start,
        filters.end,
        filters
            .scope
            .map(|r| r.code().to_string())
            .unwrap_or_else(|| "Global".to_string()),
        filters.metric
    );
    APP_STATE.lock().unwrap().filters = Some(filters);
}

fn current_dashboard() -> Option<(types::Dashboard, Filters)> {
    let (data, filters) = {
        let state = APP_STATE.lock().unwrap();
        (state.data.clone(), state.filters)
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return None;
    };
    let Some(filters) = filters else {
        println!("Error: The loaded dataset has no usable dates.\n");
        return None;
    };
    match pipeline::build_dashboard(&data, &filters) {
        Some(dash) => Some((dash, filters)),
        None => {
            println!("No data for the current filter selection.\n");
            None
        }
    }
}

fn render_summary(dash: &types::Dashboard, window: Window) {
    println!("Key insights (selected period)");
    println!(
        "  Total hospitalizations: {}",
        util::format_number(dash.summary.total_hosp, 0)
    );
    println!(
        "  Total ICU admissions:   {}",
        util::format_number(dash.summary.total_icu, 0)
    );
    match dash.summary.peak_hosp {
        Some(p) => println!(
            "  Peak hospitalizations ({}): {} on {}",
            window.label(),
            util::format_number(p.value, 0),
            p.date
        ),
        None => println!("  Peak hospitalizations ({}): 0", window.label()),
    }
    match dash.summary.peak_icu {
        Some(p) => println!(
            "  Peak ICU admissions ({}):   {} on {}",
            window.label(),
            util::format_number(p.value, 0),
            p.date
        ),
        None => println!("  Peak ICU admissions ({}):   0", window.label()),
    }
    println!("");
}

/// Handle option [3]: one recomputation pass and a full render.
fn handle_dashboard() {
    let Some((dash, filters)) = current_dashboard() else {
        return;
    };

    render_summary(&dash, filters.window);

    println!("Global evolution ({})", filters.window.label());
    let daily = output::daily_rows(&dash);
    output::preview_table_rows(&daily, 10);
    if daily.len() > 10 {
        println!(
            "({} dates total; option 4 exports the full series)\n",
            util::format_int(daily.len() as i64)
        );
    }

    let scope_label = filters
        .scope
        .map(|r| format!("Top 5 countries - {}", r.code()))
        .unwrap_or_else(|| "Top 5 countries globally".to_string());
    println!("{} ({})", scope_label, filters.metric);
    if dash.ranking.is_empty() {
        println!("No data available for this region and date selection.\n");
    } else {
        output::preview_table_rows(&output::ranking_rows(&dash), pipeline::TOP_COUNTRY_COUNT);
        println!("Trend for the ranked countries:");
        output::preview_table_rows(&output::trend_rows(&dash), 15);
    }

    println!("ICU share within total hospitalizations by WHO region");
    if dash.regional.is_empty() {
        println!("No regional data for this selection.\n");
    } else {
        output::preview_table_rows(&output::region_rows(&dash), WhoRegion::ALL.len());
    }
}

/// Handle option [4]: write the derived tables next to the binary.
fn handle_export() {
    let Some((dash, _)) = current_dashboard() else {
        return;
    };

    println!("Exporting reports...");
    let daily = output::daily_rows(&dash);
    if let Err(e) = output::write_csv("daily_series.csv", &daily) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_csv("top_countries.csv", &output::ranking_rows(&dash)) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_csv("regional_icu_share.csv", &output::region_rows(&dash)) {
        eprintln!("Write error: {}", e);
    }
    if let Err(e) = output::write_json("summary.json", &output::summary_export(&dash)) {
        eprintln!("Write error: {}", e);
    }
    println!("Wrote daily_series.csv, top_countries.csv, regional_icu_share.csv, summary.json\n");
}

fn main() {
    loop {
        println!("COVID-19 Hospital & ICU Capacity");
        println!("[1] Load the file");
        println!("[2] Set filters");
        println!("[3] Show dashboard");
        println!("[4] Export reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                handle_set_filters();
            }
            "3" => {
                println!("");
                handle_dashboard();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "4" => {
                println!("");
                handle_export();
            }
            _ => {
                println!("Invalid choice. Please enter 1-4.\n");
            }
        }
    }
}
