//! # campus-harvest CLI
//!
//! Command-line access to the portal client.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands, one per record kind:
//!   - `news`: paginated news with optional article details
//!   - `events`: newsletter events, one line per scheduled date
//!   - `exams`: exams the student can still take
//!   - `reservations`: booked sessions, or open sessions for one exam
//!   - `taxes`: paid or unpaid payment slips
//!
//! Session and transport settings come from `CAMPUS_HARVEST_*` environment
//! variables and can be overridden with flags. Output is text or JSON.

mod logging;

use anyhow::anyhow;
use campus_harvest::prelude::*;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "Extract news, events, exams and taxes from a university portal", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Output format (text|json)
    #[arg(short, long, global = true, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Directory of extra PEM certificates to trust
    #[arg(long, global = true)]
    cert_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Maximum requests per minute
    #[arg(long, global = true)]
    rate: Option<u32>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List news articles
    News(NewsArgs),

    /// List newsletter events
    Events,

    /// List exams that can still be taken
    Exams,

    /// List exam reservations
    Reservations(ReservationArgs),

    /// List payment slips
    Taxes(TaxArgs),
}

#[derive(Args, Debug)]
struct NewsArgs {
    /// Language of the listing (it|en)
    #[arg(short, long, default_value = "it")]
    locale: String,

    /// Maximum number of articles
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Read only this page
    #[arg(short, long)]
    page: Option<u32>,

    /// Read pages 0 up to, not including, this one
    #[arg(short, long)]
    max_page: Option<u32>,

    /// Full-text search query
    #[arg(short, long)]
    query: Option<String>,

    /// Skip article descriptions
    #[arg(long)]
    no_description: bool,
}

#[derive(Args, Debug)]
struct ReservationArgs {
    /// Show open sessions for this exam code instead of booked ones
    #[arg(short, long)]
    exam: Option<String>,
}

#[derive(Args, Debug)]
struct TaxArgs {
    /// Show paid slips instead of unpaid ones
    #[arg(short, long)]
    paid: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Keep the guard alive so file logs are flushed on exit
    let _guard = logging::setup_logging(cli.global.log_file.as_deref(), cli.global.verbose)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["campus-harvest", "--help"]);
            return Ok(());
        }
    };

    let client = build_client(&cli.global)?;
    let json = cli.global.format == "json";

    match command {
        Commands::News(args) => news_command(&client, args, json).await?,
        Commands::Events => events_command(&client, json).await?,
        Commands::Exams => exams_command(&client, json).await?,
        Commands::Reservations(args) => reservations_command(&client, args, json).await?,
        Commands::Taxes(args) => taxes_command(&client, args, json).await?,
    }

    Ok(())
}

fn build_client(global: &GlobalArgs) -> anyhow::Result<PortalClient> {
    let mut config = ClientConfig::from_env();
    if let Some(dir) = &global.cert_dir {
        config.fetcher.cert_dir = Some(dir.clone());
    }
    if let Some(timeout) = global.timeout {
        config.fetcher.timeout_secs = timeout;
    }
    if let Some(rate) = global.rate {
        config.fetcher.requests_per_minute = Some(rate);
    }
    Ok(PortalClient::new(config)?)
}

fn print_json<T: Serialize>(records: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}

#[instrument(skip(client))]
async fn news_command(client: &PortalClient, args: NewsArgs, json: bool) -> anyhow::Result<()> {
    let locale = Locale::from_tag(&args.locale)
        .ok_or_else(|| anyhow!("unsupported locale '{}', use it or en", args.locale))?;

    // Default to the first page when no paging option is given
    let page = match (args.limit, args.page, args.max_page) {
        (None, None, None) => Some(0),
        _ => args.page,
    };

    let news = client
        .news(
            locale,
            !args.no_description,
            args.limit,
            page,
            args.max_page,
            args.query.as_deref(),
        )
        .await?;

    if json {
        return print_json(&news);
    }

    println!("Found {} articles", news.len());
    for (i, item) in news.iter().enumerate() {
        println!("{}. {}", i + 1, item.title);
        if let Some(date) = item.date {
            println!("   Date: {}", date.format("%Y-%m-%d"));
        }
        println!("   URL: {}", item.url);
        if let Some(description) = &item.description {
            println!("   {}", description);
        }
        println!();
    }
    Ok(())
}

#[instrument(skip(client))]
async fn events_command(client: &PortalClient, json: bool) -> anyhow::Result<()> {
    let events = client.newsletter_events().await?;

    if json {
        return print_json(&events);
    }

    println!("Found {} events", events.len());
    for (i, event) in events.iter().enumerate() {
        println!("{}. {} ({})", i + 1, event.title, event.start.format("%Y-%m-%d %H:%M"));
        let place: Vec<&str> = [event.room.as_deref(), event.place.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !place.is_empty() {
            println!("   Where: {}", place.join(", "));
        }
        println!("   URL: {}", event.url);
        println!();
    }
    Ok(())
}

#[instrument(skip(client))]
async fn exams_command(client: &PortalClient, json: bool) -> anyhow::Result<()> {
    let exams = client.exams_doable().await?;

    if json {
        return print_json(&exams);
    }

    println!("Found {} exams", exams.len());
    for exam in &exams {
        println!("{} {} ({} CFU)", exam.exam_code, exam.description, exam.cfu);
    }
    Ok(())
}

#[instrument(skip(client))]
async fn reservations_command(
    client: &PortalClient,
    args: ReservationArgs,
    json: bool,
) -> anyhow::Result<()> {
    let reservations = match &args.exam {
        Some(code) => {
            let exams = client.exams_doable().await?;
            let exam = exams
                .iter()
                .find(|exam| &exam.exam_code == code)
                .ok_or_else(|| anyhow!("exam {} is not among the exams you can take", code))?;
            client.available_reservations(exam).await?
        }
        None => client.active_reservations().await?,
    };

    if json {
        return print_json(&reservations);
    }

    println!("Found {} sessions", reservations.len());
    for reservation in &reservations {
        println!(
            "{} {}{}",
            reservation.exam_date.format("%Y-%m-%d %H:%M"),
            reservation.exam_subject,
            reservation
                .teacher
                .as_deref()
                .map(|t| format!(" ({})", t))
                .unwrap_or_default()
        );
    }
    Ok(())
}

#[instrument(skip(client))]
async fn taxes_command(client: &PortalClient, args: TaxArgs, json: bool) -> anyhow::Result<()> {
    let taxes = if args.paid {
        client.paid_taxes().await?
    } else {
        client.unpaid_taxes().await?
    };

    if json {
        return print_json(&taxes);
    }

    println!("Found {} payment slips", taxes.len());
    for tax in &taxes {
        let when = match (tax.payment_date, tax.expiration_date) {
            (Some(paid), _) => format!("paid {}", paid.format("%Y-%m-%d")),
            (None, Some(due)) => format!("due {}", due.format("%Y-%m-%d")),
            (None, None) => String::new(),
        };
        println!("{} {:>10.2} EUR {}", tax.code, tax.amount, when);
    }
    Ok(())
}
