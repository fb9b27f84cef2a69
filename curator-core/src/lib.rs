//! Curator Core
//!
//! Core types and abstractions for the curator newsletter toolkit.
//!
//! This crate contains:
//! - Domain types: Core business entities (Article, Newsletter, etc.)
//! - DTOs: Data transfer objects for communication with the curation service

pub mod domain;
pub mod dto;
