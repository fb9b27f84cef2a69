//! Newsletter DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::newsletter::NewsletterStatus;

/// Request to create a newsletter and trigger generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsletter {
    pub title: String,
    pub article_ids: Vec<Uuid>,
}

/// Compact newsletter representation for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSummary {
    pub id: Uuid,
    pub title: String,
    pub status: NewsletterStatus,
    pub requested_at: chrono::DateTime<chrono::Utc>,
}
