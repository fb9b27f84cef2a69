//! Error types for the status poller

use thiserror::Error;

/// Configuration errors surfaced synchronously by
/// [`crate::StatusPoller::start`] and [`crate::PollHandle::restart`]
///
/// These indicate caller bugs and fail fast at call time instead of
/// silently defaulting. Fetch failures are not represented here; they are
/// delivered to the session's observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PollError {
    /// The tracked key was empty
    #[error("poll key must not be empty")]
    EmptyKey,

    /// The polling interval was zero
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
}
