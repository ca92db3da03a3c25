use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{bail, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use clap::Parser;
use regex_lite::Regex;

use seatscout_core::{CrawlConfig, DurationRange};

static ZIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("static regex"));
static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,2})-([0-9]{1,2})$").expect("static regex"));

/// Command line arguments for seatscout
#[derive(Parser, Debug)]
#[command(author, version, about = "Find movie showings that still have good seats together")]
pub struct Args {
    /// All or part of the movie title (case-insensitive)
    #[arg(long)]
    pub title: String,

    /// Day to search: today, tomorrow, a weekday name, or MM-DD
    #[arg(long, default_value = "today")]
    pub date: String,

    /// 5 digit zip code to search near
    #[arg(long, value_parser = parse_zip)]
    pub zip: String,

    /// Number of contiguous seats to find [default: 2]
    #[arg(long, value_parser = parse_num_seats)]
    pub num_seats: Option<usize>,

    /// Print the seat page link of every showing
    #[arg(long, default_value_t = false)]
    pub link: bool,

    /// Also print showings without good seats
    #[arg(long, default_value_t = false)]
    pub show_bad: bool,

    /// Give up after this many seconds [default: unlimited]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Retry failed seat checks [default: true]
    #[arg(long, action = clap::ArgAction::Set)]
    pub retry: Option<bool>,

    /// Seconds to wait between page loads: N or A-B [default: 15-25]
    #[arg(long)]
    pub request_interval: Option<DurationRange>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Run a single crawl step: "search" or "seats:<link>"
    #[arg(long)]
    pub debug_step: Option<DebugStep>,

    /// Check at most this many showings [default: unlimited]
    #[arg(long)]
    pub showing_limit: Option<usize>,

    /// Path to a TOML configuration file
    #[arg(long, env = "SEATSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the crawl result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl Args {
    /// Override configured crawl settings with the flags that were given.
    pub fn apply(&self, crawl: &mut CrawlConfig) {
        if let Some(num_seats) = self.num_seats {
            crawl.num_seats = num_seats;
        }
        if let Some(retry) = self.retry {
            crawl.retry = retry;
        }
        if let Some(interval) = self.request_interval {
            crawl.request_interval = interval;
        }
        if self.showing_limit.is_some() {
            crawl.showing_limit = self.showing_limit;
        }
        if self.timeout.is_some() {
            crawl.timeout_secs = self.timeout;
        }
    }
}

/// A single crawl step to run on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugStep {
    /// Only search for showings.
    Search,
    /// Only check the seats behind one seat page link.
    Seats(String),
}

impl FromStr for DebugStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "search" {
            return Ok(DebugStep::Search);
        }
        match s.strip_prefix("seats:") {
            Some(link) if !link.is_empty() => Ok(DebugStep::Seats(link.to_string())),
            _ => Err(format!(
                "invalid debug step {:?} (expected \"search\" or \"seats:<link>\")",
                s
            )),
        }
    }
}

fn parse_zip(s: &str) -> Result<String, String> {
    if ZIP.is_match(s) {
        Ok(s.to_string())
    } else {
        Err(format!("invalid zip code {:?} (expected 5 digits)", s))
    }
}

fn parse_num_seats(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("invalid seat count {:?} (expected a number >= 1)", s)),
    }
}

/// Resolve a `--date` value relative to `today`.
///
/// Weekday names mean the next such day after today; `MM-DD` means the next
/// time that date comes around, today included.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "today" => return Ok(today),
        "tomorrow" => {
            return today
                .checked_add_days(Days::new(1))
                .ok_or_else(|| anyhow::anyhow!("date out of range"))
        }
        _ => {}
    }

    if let Ok(weekday) = input.parse::<Weekday>() {
        let ahead = (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
        let ahead = if ahead == 0 { 7 } else { ahead };
        return today
            .checked_add_days(Days::new(ahead.into()))
            .ok_or_else(|| anyhow::anyhow!("date out of range"));
    }

    if let Some(caps) = MONTH_DAY.captures(&input) {
        let month: u32 = caps[1].parse()?;
        let day: u32 = caps[2].parse()?;
        // Leap days can be up to 8 years out.
        if let Some(date) = (today.year()..=today.year() + 8)
            .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
            .find(|date| *date >= today)
        {
            return Ok(date);
        }
        bail!("invalid date {:?}", input);
    }

    bail!(
        "invalid date {:?} (expected today, tomorrow, a weekday name, or MM-DD)",
        input
    )
}
