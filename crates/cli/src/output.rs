//! Human-readable crawl output.

use seatscout_core::{CrawlResult, Showing};

/// Render showings as an aligned table: theater, start time, and optionally
/// the seat page link. Showings are printed in the order given.
pub fn format_showings(showings: &[Showing], link: bool) -> String {
    let rows: Vec<(&str, String, &str)> = showings
        .iter()
        .map(|s| {
            (
                s.theater.as_str(),
                s.when.format("%-I:%M%P").to_string(),
                s.link.as_str(),
            )
        })
        .collect();

    let theater_width = rows.iter().map(|(t, _, _)| t.chars().count()).max().unwrap_or(0);
    let time_width = rows.iter().map(|(_, w, _)| w.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (theater, when, url) in rows {
        let line = if link {
            format!("{:<theater_width$}  {:<time_width$}  {}", theater, when, url)
        } else {
            format!("{:<theater_width$}  {}", theater, when)
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render a whole crawl result. Showing lists are sorted by theater, then time.
pub fn format_result(result: &CrawlResult, link: bool, show_bad: bool) -> String {
    let mut out = String::new();

    let mut good = result.good.clone();
    good.sort_by(Showing::cmp_by_theater_time);
    if good.is_empty() {
        out.push_str("No showings with good seats found.\n");
    } else {
        out.push_str("Showings with good seats:\n");
        out.push_str(&format_showings(&good, link));
    }

    if show_bad && !result.bad.is_empty() {
        let mut bad = result.bad.clone();
        bad.sort_by(Showing::cmp_by_theater_time);
        out.push_str("\nShowings without good seats:\n");
        out.push_str(&format_showings(&bad, link));
    }

    let report = format_report(result);
    if !report.is_empty() {
        out.push('\n');
        out.push_str(&report);
    }
    out
}

/// The follow-up part of a result: an early-stop notice and the failure
/// report. Empty when nothing was attempted and the crawl wasn't cancelled.
pub fn format_report(result: &CrawlResult) -> String {
    let mut out = String::new();
    if result.cancelled {
        out.push_str("Crawl stopped early; remaining showings were not checked.\n");
    }
    if let Some(summary) = result.failure_summary() {
        out.push_str(&summary.to_string());
        out.push('\n');
    }
    out
}
