//! Newsletter-related API endpoints

use crate::CuratorClient;
use crate::error::Result;
use curator_core::domain::newsletter::Newsletter;
use curator_core::dto::newsletter::{CreateNewsletter, NewsletterSummary};
use uuid::Uuid;

impl CuratorClient {
    /// Create a newsletter and trigger generation of its document
    ///
    /// Generation runs inside the curation service; the returned record
    /// starts in a non-terminal status and is observed via
    /// [`CuratorClient::get_newsletter`] until it settles.
    ///
    /// # Arguments
    /// * `req` - Title and selected article IDs
    ///
    /// # Returns
    /// The created newsletter record
    pub async fn create_newsletter(&self, req: CreateNewsletter) -> Result<Newsletter> {
        let url = format!("{}/api/newsletters", self.base_url);
        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get a newsletter by ID
    ///
    /// # Arguments
    /// * `newsletter_id` - The newsletter UUID
    ///
    /// # Returns
    /// The newsletter, including its current generation status
    pub async fn get_newsletter(&self, newsletter_id: Uuid) -> Result<Newsletter> {
        let url = format!("{}/api/newsletters/{}", self.base_url, newsletter_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List all newsletters
    ///
    /// # Returns
    /// Compact summaries of every newsletter
    pub async fn list_newsletters(&self) -> Result<Vec<NewsletterSummary>> {
        let url = format!("{}/api/newsletters", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Delete a newsletter
    ///
    /// # Arguments
    /// * `newsletter_id` - The newsletter UUID
    pub async fn delete_newsletter(&self, newsletter_id: Uuid) -> Result<()> {
        let url = format!("{}/api/newsletters/{}", self.base_url, newsletter_id);
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
