//! ID resolver module
//!
//! Handles resolution of UUID prefixes to full UUIDs by querying the API.
//! This allows users to specify short, unambiguous prefixes instead of full
//! UUIDs.

use anyhow::{Context, Result, anyhow};
use uuid::Uuid;

use curator_client::CuratorClient;
use curator_core::dto::article::ArticleQuery;

use crate::types::IdOrPrefix;

/// Resolve a newsletter ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately. Otherwise,
/// fetches all newsletters and finds the one matching the prefix.
///
/// # Errors
/// Returns an error if:
/// - No newsletter matches the prefix
/// - Multiple newsletters match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_newsletter_id(
    client: &CuratorClient,
    id_or_prefix: &IdOrPrefix,
) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let prefix = id_or_prefix.as_str().to_lowercase();

    let newsletters = client
        .list_newsletters()
        .await
        .context("Failed to fetch newsletters for ID resolution")?;

    let matches: Vec<_> = newsletters
        .iter()
        .filter(|n| n.id.to_string().to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!(
            "No newsletter found with ID starting with '{}'",
            prefix
        )),
        1 => Ok(matches[0].id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|n| n.id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple newsletters: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}

/// Resolve an article ID or prefix to a full UUID
///
/// If the input is already a full UUID, returns it immediately. Otherwise,
/// fetches the article list and finds the one matching the prefix.
///
/// # Errors
/// Returns an error if:
/// - No article matches the prefix
/// - Multiple articles match the prefix (ambiguous)
/// - API call fails
pub async fn resolve_article_id(client: &CuratorClient, id_or_prefix: &IdOrPrefix) -> Result<Uuid> {
    if let Some(uuid) = id_or_prefix.as_uuid() {
        return Ok(uuid);
    }

    let prefix = id_or_prefix.as_str().to_lowercase();

    let articles = client
        .list_articles(&ArticleQuery::default())
        .await
        .context("Failed to fetch articles for ID resolution")?;

    let matches: Vec<_> = articles
        .iter()
        .filter(|a| a.id.to_string().to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(anyhow!(
            "No article found with ID starting with '{}'",
            prefix
        )),
        1 => Ok(matches[0].id),
        _ => {
            let ids: Vec<String> = matches.iter().map(|a| a.id.to_string()).collect();
            Err(anyhow!(
                "Ambiguous prefix '{}' matches multiple articles: {}",
                prefix,
                ids.join(", ")
            ))
        }
    }
}
