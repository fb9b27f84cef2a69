//! Configuration module
//!
//! Handles CLI configuration including the curation service URL.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the curation service
    pub api_url: String,
}
