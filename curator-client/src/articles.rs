//! Article-related API endpoints

use crate::CuratorClient;
use crate::error::Result;
use curator_core::domain::article::Article;
use curator_core::dto::article::ArticleQuery;
use uuid::Uuid;

impl CuratorClient {
    /// List articles, optionally filtered server-side
    ///
    /// # Arguments
    /// * `query` - Server-side filter; unset fields are not sent
    ///
    /// # Returns
    /// Articles matching the query
    pub async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let url = format!("{}/api/articles", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Get an article by ID
    ///
    /// # Arguments
    /// * `article_id` - The article UUID
    ///
    /// # Returns
    /// The article details
    pub async fn get_article(&self, article_id: Uuid) -> Result<Article> {
        let url = format!("{}/api/articles/{}", self.base_url, article_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
