//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod article;
mod newsletter;

pub use article::ArticleCommands;
pub use newsletter::NewsletterCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Browse ingested articles
    Article {
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Newsletter management
    Newsletter {
        #[command(subcommand)]
        command: NewsletterCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Article { command } => article::handle_article_command(command, config).await,
        Commands::Newsletter { command } => {
            newsletter::handle_newsletter_command(command, config).await
        }
    }
}
