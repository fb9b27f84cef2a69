//! Newsletter domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A newsletter generation record
///
/// Created when a user triggers generation from a set of selected articles.
/// The curation service owns the generation job; clients observe it through
/// `status` until it reaches a terminal state.
///
/// `document` is only populated once the status is `Ready`, and
/// `error_message` only when it is `Failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Newsletter {
    pub id: Uuid,
    pub title: String,
    pub status: NewsletterStatus,
    pub article_ids: Vec<Uuid>,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub document: Option<String>,
    pub error_message: Option<String>,
}

/// Generation status of a newsletter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsletterStatus {
    /// Accepted, not yet picked up by the generation backend
    Pending,
    /// Generation in progress
    Generating,
    /// Document generated and available
    Ready,
    /// Generation failed
    Failed,
}

impl NewsletterStatus {
    /// Whether this status ends the generation lifecycle
    ///
    /// Terminal statuses will never change on subsequent fetches, so pollers
    /// use this to decide when to stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NewsletterStatus::Ready | NewsletterStatus::Failed)
    }
}

impl std::fmt::Display for NewsletterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsletterStatus::Pending => write!(f, "Pending"),
            NewsletterStatus::Generating => write!(f, "Generating"),
            NewsletterStatus::Ready => write!(f, "Ready"),
            NewsletterStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!NewsletterStatus::Pending.is_terminal());
        assert!(!NewsletterStatus::Generating.is_terminal());
        assert!(NewsletterStatus::Ready.is_terminal());
        assert!(NewsletterStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(NewsletterStatus::Generating.to_string(), "Generating");
        assert_eq!(NewsletterStatus::Ready.to_string(), "Ready");
    }
}
