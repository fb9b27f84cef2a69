//! Core domain types
//!
//! This module contains the core domain structures used across the curator
//! toolkit. These types represent the fundamental business entities and are
//! shared between the API client, the poller bindings, and the CLI.

pub mod article;
pub mod newsletter;
