mod args;
mod output;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatscout_core::{
    load_config_or_default, validate_config, CrawlRequest, Crawler, HttpNavigator,
    PageSeatChecker, PageShowingSearcher, RateLimitedNavigator, SearchQuery, SeatChecker,
    ShowingSearcher,
};

use args::{Args, DebugStep};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.debug {
        "warn,seatscout=debug"
    } else {
        "warn,seatscout=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration, then let flags override it
    let mut config = load_config_or_default(args.config.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    args.apply(&mut config.crawl);
    validate_config(&config).context("Configuration validation failed")?;

    let date = args::parse_date(&args.date, Local::now().date_naive())?;
    let query = SearchQuery {
        title: args.title.clone(),
        date,
        zip: args.zip.clone(),
    };

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, config.crawl.timeout_secs);

    // Searcher and seat checker share one navigator so they share pacing
    let http = HttpNavigator::new(&config.site).context("Failed to create HTTP client")?;
    let navigator = Arc::new(RateLimitedNavigator::new(
        http,
        config.crawl.request_interval,
        cancel.clone(),
    ));
    info!(interval = %config.crawl.request_interval, "Request interval");

    let searcher: Arc<dyn ShowingSearcher> = Arc::new(PageShowingSearcher::new(
        Arc::clone(&navigator),
        config.site.base_url.clone(),
    ));
    let seats: Arc<dyn SeatChecker> = Arc::new(PageSeatChecker::new(
        navigator,
        Duration::from_secs(config.site.seat_map_timeout_secs),
    ));
    let crawler = Crawler::new(searcher, seats, cancel);
    let request = CrawlRequest::new(query, &config.crawl);

    match args.debug_step {
        Some(DebugStep::Search) => {
            let mut showings = crawler
                .crawl_search(&request.query)
                .await
                .context("Failed to get showings")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&showings)?);
            } else {
                showings.sort_by(|a, b| a.cmp_by_theater_time(b));
                print!("{}", output::format_showings(&showings, true));
            }
        }
        Some(DebugStep::Seats(link)) => {
            let good = crawler
                .crawl_seats(&link, request.num_seats)
                .await
                .with_context(|| format!("Failed to check seats at {}", link))?;
            if args.json {
                println!("{}", serde_json::json!({ "link": link, "good": good }));
            } else {
                println!("good seats: {}", good);
            }
        }
        None => {
            let result = crawler.crawl(&request).await.context("Crawl failed")?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                // Keep the follow-up report visible without mixing it into the JSON.
                eprint!("{}", output::format_report(&result));
            } else {
                print!("{}", output::format_result(&result, args.link, args.show_bad));
            }
        }
    }

    Ok(())
}

/// Cancel the crawl on Ctrl+C, or when the overall deadline passes.
fn spawn_cancel_triggers(cancel: &CancellationToken, timeout_secs: Option<u64>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, stopping crawl");
            on_signal.cancel();
        }
    });

    if let Some(secs) = timeout_secs {
        let on_deadline = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            info!(timeout_secs = secs, "Timed out, stopping crawl");
            on_deadline.cancel();
        });
    }
}
