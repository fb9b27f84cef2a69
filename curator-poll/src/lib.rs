//! Curator Poll
//!
//! Generic status polling for resources tracked in the managed curation
//! service (newsletter generation jobs, refresh progress, and similar).
//!
//! The service exposes no push channel, so clients observe long-running work
//! by re-fetching its status. Doing that ad hoc at every call site invites
//! two classic races: a stale response arriving after the tracked resource
//! changed, and a timer left running after the caller went away. This crate
//! centralizes the pattern: one [`StatusPoller`] session per tracked key,
//! generation-tagged so stale fetch results are discarded, stopped
//! automatically when a terminal result or a fetch error is observed.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use curator_poll::{observer, PollOptions, StatusPoller};
//!
//! # fn example() -> Result<(), curator_poll::PollError> {
//! let handle = StatusPoller::start(
//!     "newsletter-42",
//!     |_key: String| async move { Ok::<_, String>("generating".to_string()) },
//!     observer(
//!         |status: &String| println!("status: {status}"),
//!         |err: &String| eprintln!("fetch failed: {err}"),
//!     ),
//!     PollOptions::new(|status: &String| status == "ready")
//!         .with_interval(Duration::from_secs(2)),
//! )?;
//!
//! // later, when the surrounding scope is torn down
//! handle.stop();
//! # Ok(())
//! # }
//! ```

mod error;
mod observer;
mod poller;

pub use error::PollError;
pub use observer::{FnObserver, PollObserver, observer};
pub use poller::{DEFAULT_INTERVAL, PollHandle, PollOptions, PollState, StatusPoller};
