mod error;
mod feedback;
mod notion;
mod parser;
mod render;
mod settings;
mod sheets;
mod workflow;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use notion::NotionClient;
use settings::AppConfig;
use sheets::{GoogleAuth, SheetsClient};
use workflow::{FeedbackOptions, PublishOptions};

#[derive(Parser)]
#[command(name = "workout_sync", about = "Workout sheet cells to Notion pages and back")]
struct Cli {
    /// JSON config file; WORKOUT_* environment variables override it
    #[arg(short, long, default_value = settings::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a local text file as one cell and print the rendered blocks
    Preview {
        file: PathBuf,
    },
    /// Publish sheet "Week N" as a Notion page
    Publish {
        /// Week to publish (default: the config's week counter, which is then bumped)
        #[arg(short, long)]
        week: Option<u32>,
        /// One child page per session instead of a single page
        #[arg(long)]
        per_session: bool,
    },
    /// Copy a session page's overall/lower/upper notes onto a sheet cell
    Feedback {
        /// Week (default: the config's week counter)
        #[arg(short, long)]
        week: Option<u32>,
        /// Session number, as in the "Session N" page title
        #[arg(short, long)]
        session: usize,
        /// Target cell, e.g. "B2"
        #[arg(long)]
        cell: String,
        /// Sheet tab holding the cell
        #[arg(long, default_value = "Sheet1")]
        tab: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Preview { file } => preview(&file),
        Commands::Publish { week, per_session } => {
            let cfg = AppConfig::load(&cli.config)?;
            publish(&cli.config, &cfg, week, per_session).await
        }
        Commands::Feedback {
            week,
            session,
            cell,
            tab,
        } => {
            let cfg = AppConfig::load(&cli.config)?;
            post_feedback(&cfg, week.unwrap_or(cfg.week), session, &cell, &tab).await
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn preview(file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let session = parser::Session {
        number: 1,
        sections: parser::parse_cell(&text),
    };
    let blocks = render::render_session(&session);
    println!("{}", render::preview(&blocks));
    println!(
        "\n{} sections, {} blocks",
        session.sections.len(),
        blocks.len()
    );
    Ok(())
}

async fn publish(
    config_path: &Path,
    cfg: &AppConfig,
    week: Option<u32>,
    per_session: bool,
) -> anyhow::Result<()> {
    // check everything up front so nothing remote happens on a bad config
    let token = cfg.notion_token()?;
    let parent_id = cfg.parent_page_id()?;
    let owner = cfg.sheet_owner()?;
    let (client_id, client_secret) = cfg.google_client()?;

    let auth = GoogleAuth::new(&cfg.token_url, client_id, client_secret, &cfg.token_cache)?;
    let sheets = SheetsClient::new(&auth, &cfg.sheets_url, &cfg.drive_url);
    let notion = NotionClient::new(&cfg.notion_url, token)?;

    let opts = PublishOptions {
        owner,
        parent_id,
        range: &cfg.sheet_range,
        week: week.unwrap_or(cfg.week),
        icon: cfg.icon.as_deref(),
        per_session,
    };
    let summary = workflow::publish_week(&sheets, &notion, &opts).await?;
    println!(
        "Published {} ({} sessions, {} blocks) from {} -> page {}",
        workflow::week_title(opts.week),
        summary.sessions,
        summary.blocks,
        summary.sheet.url,
        summary.page.0,
    );

    if week.is_none() {
        let next = settings::bump_week(config_path, cfg.week)?;
        info!(next, "bumped week counter");
        println!("Week counter is now {}", next);
    }
    Ok(())
}

async fn post_feedback(
    cfg: &AppConfig,
    week: u32,
    session: usize,
    cell: &str,
    tab: &str,
) -> anyhow::Result<()> {
    let token = cfg.notion_token()?;
    let parent_id = cfg.parent_page_id()?;
    let owner = cfg.sheet_owner()?;
    let (client_id, client_secret) = cfg.google_client()?;

    let auth = GoogleAuth::new(&cfg.token_url, client_id, client_secret, &cfg.token_cache)?;
    let sheets = SheetsClient::new(&auth, &cfg.sheets_url, &cfg.drive_url);
    let notion = NotionClient::new(&cfg.notion_url, token)?;

    let opts = FeedbackOptions {
        owner,
        parent_id,
        week,
        session,
        cell,
        tab,
    };
    match workflow::post_feedback(&notion, &sheets, &opts).await? {
        Some(notes) => println!(
            "Wrote note to {}!{} ({} chars)",
            tab,
            cell,
            notes.combined().chars().count()
        ),
        None => println!("No overall/lower/upper notes found; sheet left unchanged."),
    }
    Ok(())
}
