//! Portal command-line front end
//!
//! Drives the banner and directory engines from a terminal, the same way
//! the web page does on each render.
//!
//! # Usage
//!
//! ```bash
//! # Live countdown, refreshed every second until Ctrl-C
//! cargo run --bin portal -- banner --schedule ramadan-2026.json
//!
//! # One frame at a fixed instant, as JSON
//! cargo run --bin portal -- banner --schedule ramadan-2026.json --once \
//!   --now 2026-02-19T19:00:00+05:00 --json
//!
//! # Hide the banner for the configured period
//! cargo run --bin portal -- dismiss
//!
//! # Directory listing
//! cargo run --bin portal -- directory --records universities.json \
//!   --region Tashkent --search state --page 2
//! ```
//!
//! # Environment Variables
//!
//! - `PORTAL_CONFIG`: Path to `portal.toml` (otherwise searched in the usual places)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use eduportal::db::{KeyValueStore, StoreFactory};
use eduportal::io::{load_records, JsonFileSource};
use eduportal::models::{Schedule, UtcMillis};
use eduportal::parsing::parse_schedule_file;
use eduportal::services::{
    parse_page_param, spawn_banner_ticker, BannerController, BannerDecision, BannerFrame, Clock,
    DirectoryBrowser, FilterState, ManualClock, PageChange, PageLink, RetryPolicy, SystemClock, TickerExit,
    TokioClock,
};
use eduportal::PortalConfig;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Education portal banner and directory tools", long_about = None)]
struct Cli {
    /// Path to portal.toml (overrides PORTAL_CONFIG and the default search)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the countdown banner
    Banner {
        /// Schedule JSON file
        #[arg(short, long)]
        schedule: PathBuf,
        /// Print a single frame and exit
        #[arg(long)]
        once: bool,
        /// Pretend the current time is this RFC 3339 instant
        #[arg(long)]
        now: Option<String>,
        /// Emit frames as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Hide the banner for the configured number of hours
    Dismiss {
        /// Dismiss as of this RFC 3339 instant
        #[arg(long)]
        now: Option<String>,
    },
    /// Search, filter and page through the directory
    Directory {
        /// Records JSON file
        #[arg(short, long)]
        records: PathBuf,
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        search: String,
        /// Exact region
        #[arg(long, default_value = "")]
        region: String,
        /// Exact type
        #[arg(long = "type", default_value = "")]
        kind: String,
        /// Page number; anything that is not a positive integer means 1
        #[arg(short, long)]
        page: Option<String>,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the region and type filter options
    Facets {
        /// Records JSON file
        #[arg(short, long)]
        records: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PortalConfig::from_file(path)?,
        None => PortalConfig::load_or_default()?,
    };

    match cli.command {
        Commands::Banner {
            schedule,
            once,
            now,
            json,
        } => run_banner(&config, schedule, once, now.as_deref(), json).await,
        Commands::Dismiss { now } => run_dismiss(&config, now.as_deref()),
        Commands::Directory {
            records,
            search,
            region,
            kind,
            page,
            json,
        } => {
            let filters = FilterState {
                search,
                region,
                kind,
            };
            run_directory(&config, records, filters, page.as_deref(), json).await
        }
        Commands::Facets { records } => run_facets(&config, records).await,
    }
}

/// Single-shot clock: pinned to `--now` when given, the wall clock otherwise.
fn clock_for(now: Option<UtcMillis>) -> Box<dyn Clock> {
    match now {
        Some(at) => Box::new(ManualClock::new(at)),
        None => Box::new(SystemClock),
    }
}

fn parse_now(raw: Option<&str>) -> Result<Option<UtcMillis>> {
    raw.map(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .with_context(|| format!("Invalid --now value: {}", s))
    })
    .transpose()
}

fn mount_banner(
    config: &PortalConfig,
    schedule: Schedule,
) -> Result<BannerController<Arc<dyn KeyValueStore>>> {
    let store = StoreFactory::create(&config.storage)?;
    Ok(BannerController::mount(schedule, &config.banner, store)?)
}

async fn run_banner(
    config: &PortalConfig,
    schedule_path: PathBuf,
    once: bool,
    now: Option<&str>,
    json: bool,
) -> Result<()> {
    let schedule = parse_schedule_file(&schedule_path)?;
    let controller = mount_banner(config, schedule)?;
    let now = parse_now(now)?;

    if once {
        let frame = controller.frame(clock_for(now).now_millis());
        print_frame(&frame, json)?;
        return Ok(());
    }

    let controller = Arc::new(Mutex::new(controller));
    let period = config.banner.tick_interval();
    let exit = match now {
        Some(start) => run_ticker(controller, TokioClock::starting_at(start), period, json).await,
        None => run_ticker(controller, SystemClock, period, json).await,
    };
    info!("Banner stopped: {:?}", exit);
    Ok(())
}

async fn run_ticker<C: Clock + 'static>(
    controller: Arc<Mutex<BannerController<Arc<dyn KeyValueStore>>>>,
    clock: C,
    period: std::time::Duration,
    json: bool,
) -> TickerExit {
    let handle = spawn_banner_ticker(controller, clock, period, move |frame: &BannerFrame| {
        print_frame(frame, json).is_ok()
    });

    tokio::select! {
        exit = handle.join() => exit,
        _ = tokio::signal::ctrl_c() => TickerExit::Cancelled,
    }
}

fn print_frame(frame: &BannerFrame, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(frame)?);
        return Ok(());
    }

    match (&frame.decision, &frame.countdown) {
        (BannerDecision::Render(state), Some(countdown)) => {
            let day = state
                .day_number
                .map(|d| format!("  [day {}]", d))
                .unwrap_or_default();
            println!("{}: {}{}", state.label, countdown, day);
        }
        (BannerDecision::Suppress(reason), _) => println!("(banner hidden: {:?})", reason),
        (BannerDecision::Render(_), None) => {
            return Err(anyhow!("Rendered frame without countdown"));
        }
    }
    Ok(())
}

fn run_dismiss(config: &PortalConfig, now: Option<&str>) -> Result<()> {
    let mut controller = mount_banner(config, Schedule::new(Vec::new()))?;
    let now = clock_for(parse_now(now)?).now_millis();
    let hidden_until = controller.dismiss(now)?;

    let until = DateTime::from_timestamp_millis(hidden_until)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| hidden_until.to_string());
    println!("Banner hidden until {}", until);
    Ok(())
}

async fn run_directory(
    config: &PortalConfig,
    records_path: PathBuf,
    filters: FilterState,
    page: Option<&str>,
    json: bool,
) -> Result<()> {
    let source = JsonFileSource::new(records_path);
    let records = load_records(&source, &RetryPolicy::from(&config.retry)).await?;

    let mut browser = DirectoryBrowser::with_settings(records, &config.directory);
    if let PageChange::ResetToFirst { from } = browser.set_filters(filters) {
        info!("Page {} no longer exists, showing page 1", from);
    }
    browser.go_to_page(parse_page_param(page) as i64);

    let view = browser.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("Nothing found.");
        return Ok(());
    }

    println!(
        "{} result(s), page {} of {}",
        view.page.total_items, view.page.effective_page, view.page.total_pages
    );
    for record in &view.page.items {
        let region = record.region.as_ref().and_then(|r| r.primary()).unwrap_or("-");
        let kind = record.kind.as_ref().and_then(|k| k.primary()).unwrap_or("-");
        println!("  {}  ({}, {})", record.title, region, kind);
    }

    let links: Vec<String> = view
        .links
        .iter()
        .map(|link| match link {
            PageLink::Page(n) if *n == view.page.effective_page => format!("[{}]", n),
            other => other.to_string(),
        })
        .collect();
    println!("{}", links.join(" "));
    Ok(())
}

async fn run_facets(config: &PortalConfig, records_path: PathBuf) -> Result<()> {
    let source = JsonFileSource::new(records_path);
    let records = load_records(&source, &RetryPolicy::from(&config.retry)).await?;
    let browser = DirectoryBrowser::with_settings(records, &config.directory);

    let facets = browser.facets();
    println!("Regions: {}", facets.regions.join(", "));
    println!("Types:   {}", facets.types.join(", "));
    Ok(())
}
