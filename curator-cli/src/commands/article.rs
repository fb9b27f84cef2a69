//! Article command handlers
//!
//! Handles article browsing: listing with filters and sorting, and viewing
//! a single article.

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use colored::*;

use curator_client::CuratorClient;
use curator_core::domain::article::{Article, ArticleFilter, ArticleSort, sort_articles};
use curator_core::dto::article::ArticleQuery;

use crate::config::Config;
use crate::id_resolver::resolve_article_id;
use crate::types::IdOrPrefix;

/// Article subcommands
#[derive(Subcommand)]
pub enum ArticleCommands {
    /// List articles
    List {
        /// Only articles from this source
        #[arg(long)]
        source: Option<String>,

        /// Only articles tagged with this topic
        #[arg(long)]
        topic: Option<String>,

        /// Only articles whose title or summary contains this text
        #[arg(long)]
        search: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value = "published-desc")]
        sort: SortOrder,
    },
    /// Get article details
    Get {
        /// Article ID or unambiguous prefix
        id: String,
    },
}

/// Sort order accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrder {
    /// Newest first
    PublishedDesc,
    /// Oldest first
    PublishedAsc,
    /// Alphabetical by title
    Title,
}

impl From<SortOrder> for ArticleSort {
    fn from(sort: SortOrder) -> Self {
        match sort {
            SortOrder::PublishedDesc => ArticleSort::PublishedDesc,
            SortOrder::PublishedAsc => ArticleSort::PublishedAsc,
            SortOrder::Title => ArticleSort::Title,
        }
    }
}

/// Handle article commands
///
/// Routes article subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The article command to execute
/// * `config` - The CLI configuration
pub async fn handle_article_command(command: ArticleCommands, config: &Config) -> Result<()> {
    let client = CuratorClient::new(&config.api_url);

    match command {
        ArticleCommands::List {
            source,
            topic,
            search,
            sort,
        } => {
            let filter = ArticleFilter {
                source,
                topic,
                search,
            };
            list_articles(&client, filter, sort.into()).await
        }
        ArticleCommands::Get { id } => get_article(&client, &id).await,
    }
}

/// List articles matching the filter, sorted for display
async fn list_articles(
    client: &CuratorClient,
    filter: ArticleFilter,
    sort: ArticleSort,
) -> Result<()> {
    let query = ArticleQuery {
        source: filter.source.clone(),
        topic: filter.topic.clone(),
        search: filter.search.clone(),
    };

    let fetched = client.list_articles(&query).await?;

    // The service does not guarantee order, and older deployments ignore
    // unknown query parameters, so filter and sort again locally.
    let mut articles: Vec<Article> = fetched.into_iter().filter(|a| filter.matches(a)).collect();
    sort_articles(&mut articles, sort);

    if articles.is_empty() {
        println!("{}", "No articles found.".yellow());
    } else {
        println!("{}", format!("Found {} article(s):", articles.len()).bold());
        println!();
        for article in &articles {
            print_article_summary(article);
        }
    }

    Ok(())
}

/// Get and display a single article
async fn get_article(client: &CuratorClient, id: &str) -> Result<()> {
    let id_or_prefix = IdOrPrefix::parse(id);
    let uuid = resolve_article_id(client, &id_or_prefix).await?;

    let article = client.get_article(uuid).await?;

    print_article_details(&article);

    Ok(())
}

/// Print an article summary
fn print_article_summary(article: &Article) {
    println!("  {} {}", "▸".cyan(), article.title.bold());
    println!("    ID:        {}", article.id.to_string().dimmed());
    println!("    Source:    {}", article.source.dimmed());
    println!(
        "    Published: {}",
        article
            .published_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if !article.topics.is_empty() {
        println!("    Topics:    {}", article.topics.join(", ").dimmed());
    }
    println!();
}

/// Print detailed article information
fn print_article_details(article: &Article) {
    println!("{}", "Article Details:".bold());
    println!("  ID:        {}", article.id.to_string().cyan());
    println!("  Title:     {}", article.title.bold());
    println!("  URL:       {}", article.url);
    println!("  Source:    {}", article.source);
    println!(
        "  Published: {}",
        article.published_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Ingested:  {}",
        article.ingested_at.format("%Y-%m-%d %H:%M:%S")
    );
    if !article.topics.is_empty() {
        println!("  Topics:    {}", article.topics.join(", "));
    }
    if let Some(summary) = &article.summary {
        println!("\n{}", "Summary:".bold());
        println!("{}", summary);
    }
}
