//! Newsletter command handlers
//!
//! Handles newsletter listing, details, deletion, triggering generation,
//! and watching a generation job until it settles.
//!
//! Watching is a thin binding over the status poller: this module supplies
//! the fetch (a newsletter lookup), the terminal predicate (status is
//! `Ready` or `Failed`), and callbacks that forward each outcome into the
//! command loop for display.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use curator_client::{ClientError, CuratorClient};
use curator_core::domain::newsletter::{Newsletter, NewsletterStatus};
use curator_core::dto::newsletter::{CreateNewsletter, NewsletterSummary};
use curator_poll::{PollOptions, StatusPoller, observer};

use crate::config::Config;
use crate::id_resolver::{resolve_article_id, resolve_newsletter_id};
use crate::types::IdOrPrefix;

/// Newsletter subcommands
#[derive(Subcommand)]
pub enum NewsletterCommands {
    /// List all newsletters
    List,
    /// Get newsletter details
    Get {
        /// Newsletter ID or unambiguous prefix
        id: String,
    },
    /// Delete a newsletter
    Delete {
        /// Newsletter ID or unambiguous prefix
        id: String,
    },
    /// Create a newsletter from selected articles and trigger generation
    Generate {
        /// Newsletter title
        #[arg(short, long)]
        title: String,

        /// Selected article ID or prefix (repeatable)
        #[arg(short, long = "article", required = true)]
        articles: Vec<String>,

        /// Keep polling until generation settles
        #[arg(short, long)]
        watch: bool,

        /// Polling interval in seconds when watching
        #[arg(long, default_value = "5")]
        interval_secs: u64,
    },
    /// Watch an existing newsletter until generation settles
    Watch {
        /// Newsletter ID or unambiguous prefix
        id: String,

        /// Polling interval in seconds
        #[arg(long, default_value = "5")]
        interval_secs: u64,
    },
}

/// Handle newsletter commands
///
/// Routes newsletter subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The newsletter command to execute
/// * `config` - The CLI configuration
pub async fn handle_newsletter_command(command: NewsletterCommands, config: &Config) -> Result<()> {
    let client = CuratorClient::new(&config.api_url);

    match command {
        NewsletterCommands::List => list_newsletters(&client).await,
        NewsletterCommands::Get { id } => get_newsletter(&client, &id).await,
        NewsletterCommands::Delete { id } => delete_newsletter(&client, &id).await,
        NewsletterCommands::Generate {
            title,
            articles,
            watch,
            interval_secs,
        } => generate_newsletter(&client, title, articles, watch, interval_secs).await,
        NewsletterCommands::Watch { id, interval_secs } => {
            watch_newsletter(&client, &id, interval_secs).await
        }
    }
}

/// List all newsletters
async fn list_newsletters(client: &CuratorClient) -> Result<()> {
    let newsletters = client.list_newsletters().await?;

    if newsletters.is_empty() {
        println!("{}", "No newsletters found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} newsletter(s):", newsletters.len()).bold()
        );
        println!();
        for newsletter in newsletters {
            print_newsletter_summary(&newsletter);
        }
    }

    Ok(())
}

/// Get and display a single newsletter
async fn get_newsletter(client: &CuratorClient, id: &str) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let uuid = resolve_newsletter_id(client, &id_or_prefix).await?;

    let newsletter = client.get_newsletter(uuid).await?;

    print_newsletter_details(&newsletter);

    Ok(())
}

/// Delete a newsletter
async fn delete_newsletter(client: &CuratorClient, id: &str) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let uuid = resolve_newsletter_id(client, &id_or_prefix).await?;

    client.delete_newsletter(uuid).await?;

    println!(
        "{}",
        format!("✓ Newsletter {} deleted successfully!", uuid)
            .green()
            .bold()
    );

    Ok(())
}

/// Create a newsletter and optionally watch generation until it settles
async fn generate_newsletter(
    client: &CuratorClient,
    title: String,
    articles: Vec<String>,
    watch: bool,
    interval_secs: u64,
) -> Result<()> {
    let mut article_ids = Vec::with_capacity(articles.len());
    for id in &articles {
        let id_or_prefix = IdOrPrefix::parse(id);
        article_ids.push(resolve_article_id(client, &id_or_prefix).await?);
    }

    let req = CreateNewsletter { title, article_ids };

    let newsletter = client.create_newsletter(req).await?;

    println!("{}", "✓ Newsletter generation started!".green().bold());
    println!("  ID:        {}", newsletter.id.to_string().cyan());
    println!("  Title:     {}", newsletter.title.bold());
    println!("  Status:    {}", colorize_status(&newsletter.status));
    println!(
        "  Requested: {}",
        newsletter.requested_at.format("%Y-%m-%d %H:%M:%S")
    );

    if watch {
        println!();
        let settled = watch_until_terminal(
            client,
            newsletter.id,
            Duration::from_secs(interval_secs),
        )
        .await?;
        print_outcome(&settled);
    } else {
        println!();
        println!(
            "  Run {} to follow progress.",
            format!("curator newsletter watch {}", newsletter.id).cyan()
        );
    }

    Ok(())
}

/// Watch an existing newsletter until generation settles
async fn watch_newsletter(client: &CuratorClient, id: &str, interval_secs: u64) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let uuid = resolve_newsletter_id(client, &id_or_prefix).await?;

    println!("{}", format!("Watching newsletter {}...", uuid).bold());

    let settled = watch_until_terminal(client, uuid, Duration::from_secs(interval_secs)).await?;
    print_outcome(&settled);

    Ok(())
}

/// One delivery from the poll session to the command loop
enum WatchEvent {
    Update(Newsletter),
    Failed(String),
}

/// Poll a newsletter's status until it reaches a terminal state
///
/// Binds a poll session: fetch is a newsletter lookup, the terminal
/// predicate is [`NewsletterStatus::is_terminal`], and the observer forwards
/// every delivery into a channel drained here so display happens on the
/// command task.
async fn watch_until_terminal(
    client: &CuratorClient,
    newsletter_id: Uuid,
    interval: Duration,
) -> Result<Newsletter> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let err_tx = tx.clone();

    let fetch_client = client.clone();
    let fetcher = move |key: String| {
        let client = fetch_client.clone();
        async move {
            let id = Uuid::parse_str(&key)
                .map_err(|e| ClientError::InvalidRequest(format!("invalid newsletter id: {}", e)))?;
            client.get_newsletter(id).await
        }
    };

    let handle = StatusPoller::start(
        newsletter_id.to_string(),
        fetcher,
        observer(
            move |newsletter: &Newsletter| {
                let _ = tx.send(WatchEvent::Update(newsletter.clone()));
            },
            move |error: &ClientError| {
                let _ = err_tx.send(WatchEvent::Failed(error.to_string()));
            },
        ),
        PollOptions::new(|newsletter: &Newsletter| newsletter.status.is_terminal())
            .with_interval(interval),
    )?;

    while let Some(event) = rx.recv().await {
        match event {
            WatchEvent::Update(newsletter) => {
                debug!(
                    "Newsletter {} status: {}",
                    newsletter.id, newsletter.status
                );
                println!(
                    "  {} {}",
                    chrono::Utc::now()
                        .format("%H:%M:%S")
                        .to_string()
                        .dimmed(),
                    colorize_status(&newsletter.status)
                );
                if newsletter.status.is_terminal() {
                    handle.stop();
                    return Ok(newsletter);
                }
            }
            WatchEvent::Failed(message) => {
                handle.stop();
                bail!("Status fetch failed: {}", message);
            }
        }
    }

    bail!("Watch ended before the newsletter settled")
}

/// Print the end state of a watched generation
fn print_outcome(newsletter: &Newsletter) {
    match newsletter.status {
        NewsletterStatus::Ready => {
            println!();
            println!("{}", "✓ Newsletter ready!".green().bold());
            if let Some(completed) = newsletter.completed_at {
                let duration = completed.signed_duration_since(newsletter.requested_at);
                println!("  Generated in {}s", duration.num_seconds());
            }
            if let Some(document) = &newsletter.document {
                println!("\n{}", "Document:".bold());
                println!("{}", "─".repeat(80).dimmed());
                println!("{}", document);
                println!("{}", "─".repeat(80).dimmed());
            }
        }
        NewsletterStatus::Failed => {
            println!();
            println!("{}", "✗ Generation failed.".red().bold());
            if let Some(error) = &newsletter.error_message {
                println!("  {}", error.red());
            }
        }
        _ => {}
    }
}

/// Print a newsletter summary from a list entry
fn print_newsletter_summary(newsletter: &NewsletterSummary) {
    println!("  {} {}", "▸".cyan(), newsletter.title.bold());
    println!("    ID:        {}", newsletter.id.to_string().dimmed());
    println!("    Status:    {}", colorize_status(&newsletter.status));
    println!(
        "    Requested: {}",
        newsletter
            .requested_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed newsletter information
fn print_newsletter_details(newsletter: &Newsletter) {
    println!("{}", "Newsletter Details:".bold());
    println!("  ID:        {}", newsletter.id.to_string().cyan());
    println!("  Title:     {}", newsletter.title.bold());
    println!("  Status:    {}", colorize_status(&newsletter.status));
    println!(
        "  Requested: {}",
        newsletter.requested_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(completed) = newsletter.completed_at {
        println!("  Completed: {}", completed.format("%Y-%m-%d %H:%M:%S"));
    }

    println!("  Articles:  {}", newsletter.article_ids.len());
    for article_id in &newsletter.article_ids {
        println!("    - {}", article_id.to_string().dimmed());
    }

    if let Some(error) = &newsletter.error_message {
        println!("\n{}", "Error:".bold());
        println!("{}", error.red());
    }

    if let Some(document) = &newsletter.document {
        println!("\n{}", "Document:".bold());
        println!("{}", "─".repeat(80).dimmed());
        println!("{}", document);
        println!("{}", "─".repeat(80).dimmed());
    }
}

/// Colorize newsletter status for display
fn colorize_status(status: &NewsletterStatus) -> colored::ColoredString {
    let status_str = status.to_string();
    match status {
        NewsletterStatus::Pending => status_str.yellow(),
        NewsletterStatus::Generating => status_str.cyan(),
        NewsletterStatus::Ready => status_str.green(),
        NewsletterStatus::Failed => status_str.red(),
    }
}
