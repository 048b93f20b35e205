use anyhow::Context;
use cfp_deadlines::config::Config;
use cfp_deadlines::constants::DEFAULT_CONFIG_PATH;
use cfp_deadlines::infra::ReqwestPageFetcher;
use cfp_deadlines::normalize::{normalize, FormatPattern};
use cfp_deadlines::pipeline::Pipeline;
use cfp_deadlines::storage::{DeadlineRecord, DeadlineStore, FileStore};
use cfp_deadlines::types::{ConferenceDeadlines, NormalizedDeadline};
use cfp_deadlines::{logging, metrics};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cfp_deadlines")]
#[command(about = "Conference call-for-papers deadline tracker")]
#[command(version)]
struct Cli {
    /// Conference config file (TOML). Falls back to CFP_CONFIG, then conferences.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every conference, print the sorted deadlines and save them
    Run {
        /// Only these conferences (comma-separated names)
        #[arg(long)]
        only: Option<String>,
        /// Do not overwrite the saved deadline file
        #[arg(long)]
        no_save: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Normalize a date snippet without fetching anything
    Parse {
        /// strftime-style pattern, e.g. "%B %d, %Y"
        #[arg(long)]
        format: String,
        /// Output zone abbreviation (defaults to the configured one)
        #[arg(long)]
        canonical: Option<String>,
        /// The text to normalize
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print the deadlines saved by the last run
    Show,
    /// List configured conferences
    Sources,
}

#[derive(Serialize)]
struct JsonDeadline<'a> {
    status: &'static str,
    timestamp: Option<String>,
    zone: Option<&'a str>,
    display: &'a str,
}

impl<'a> From<&'a NormalizedDeadline> for JsonDeadline<'a> {
    fn from(d: &'a NormalizedDeadline) -> Self {
        Self {
            status: d.status.label(),
            timestamp: d.persisted_timestamp().map(|ts| ts.to_rfc3339()),
            zone: d.zone.as_deref(),
            display: &d.display,
        }
    }
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    deadline: JsonDeadline<'a>,
    notification: Option<JsonDeadline<'a>>,
}

fn print_row(row: &ConferenceDeadlines) {
    match &row.notification {
        Some(notification) => println!(
            "[{:>15}] {}  (notification: {})",
            row.name, row.deadline.display, notification.display
        ),
        None => println!("[{:>15}] {}", row.name, row.deadline.display),
    }
}

fn load_config(cli_path: Option<PathBuf>) -> anyhow::Result<Config> {
    let (path, explicit) = match cli_path.or_else(|| std::env::var("CFP_CONFIG").ok().map(PathBuf::from)) {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };
    Config::load(&path, explicit).with_context(|| format!("loading {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    metrics::init_metrics();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Run { only, no_save, json } => {
            let sources = match only {
                Some(list) => {
                    let names: Vec<String> = list.split(',').map(|s| s.trim().to_string()).collect();
                    config.select_sources(&names)?
                }
                None => config.sources.clone(),
            };

            let fetcher = Arc::new(ReqwestPageFetcher::new(&config.fetch)?);
            let result = Pipeline::run(sources, fetcher, Arc::new(config.zones.clone())).await;

            if json {
                let rows: Vec<JsonRow> = result
                    .rows
                    .iter()
                    .map(|row| JsonRow {
                        name: &row.name,
                        deadline: (&row.deadline).into(),
                        notification: row.notification.as_ref().map(JsonDeadline::from),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in &result.rows {
                    print_row(row);
                }
            }

            if result.failed() > 0 {
                warn!("{} of {} conferences need attention", result.failed(), result.rows.len());
            }

            if !no_save {
                let records: Vec<DeadlineRecord> =
                    result.rows.iter().map(DeadlineRecord::from_deadlines).collect();
                FileStore::new(&config.cache_path).save(&records).await?;
            }
        }
        Commands::Parse {
            format,
            canonical,
            text,
        } => {
            let pattern = FormatPattern::new(&format)?;
            let zones = match canonical {
                Some(abbr) => config.zones.clone().with_canonical(&abbr)?,
                None => config.zones.clone(),
            };
            let deadline = normalize(&text.join(" "), &pattern, &zones);
            println!("status:   {}", deadline.status.label());
            println!("zone:     {}", deadline.zone.as_deref().unwrap_or("none (AoE)"));
            println!("result:   {}", deadline.display);
            if let Some(ts) = deadline.persisted_timestamp() {
                println!("rfc3339:  {}", ts.to_rfc3339());
            }
        }
        Commands::Show => {
            let store = FileStore::new(&config.cache_path);
            let records = store.load().await?;
            if records.is_empty() {
                info!("Nothing saved at {}", store.path().display());
            }
            for record in records {
                match record.timestamp {
                    Some(ts) => println!("[{:>15}] {}", record.name, ts.format("%Y-%m-%d %H:%M %:z")),
                    None => println!("[{:>15}] -", record.name),
                }
            }
        }
        Commands::Sources => {
            for source in &config.sources {
                println!("{:<16} {}", source.name, source.url);
                println!("{:<16} {} as \"{}\"", "", source.deadline.locator, source.deadline.pattern);
                if let Some(notification) = &source.notification {
                    println!(
                        "{:<16} notification: {} as \"{}\"",
                        "", notification.locator, notification.pattern
                    );
                }
            }
        }
    }
    Ok(())
}
