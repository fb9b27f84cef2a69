//! Status poller
//!
//! Repeatedly fetches the status of a keyed resource on a fixed interval and
//! delivers each outcome to an observer, stopping on a terminal result, a
//! fetch failure, or explicit cancellation.
//!
//! Each session owns one driver task at a time. The driver owns the interval
//! timer, issues one fetch per tick as a spawned task so a slow fetch never
//! delays the timer, and funnels completions back through a channel so
//! observer delivery stays in completion order. Every fetch is tagged with
//! the session generation current when it was issued; `stop` and `restart`
//! bump the generation, which turns any still-in-flight fetch into a stale
//! one whose outcome is discarded without touching session state.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::PollError;
use crate::observer::PollObserver;

/// Polling interval used when the caller does not set one
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;
type Fetcher<T, E> = Arc<dyn Fn(String) -> BoxFuture<T, E> + Send + Sync>;
type SharedObserver<T, E> = Arc<Mutex<dyn PollObserver<T, E>>>;

/// Lifecycle state of a poll session
///
/// `Polling` is the only state in which a timer is alive. `Terminal` and
/// `Errored` are reached only through a delivered fetch outcome; `Cancelled`
/// only through [`PollHandle::stop`] or handle teardown. `restart` returns
/// any state to `Polling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Timer alive, fetches being issued
    Polling,
    /// A result satisfying the terminal predicate was delivered
    Terminal,
    /// Stopped explicitly before reaching a terminal result
    Cancelled,
    /// A fetch failed; the failure was delivered to the observer
    Errored,
}

impl PollState {
    /// Whether the session is still issuing fetches
    pub fn is_live(&self) -> bool {
        matches!(self, PollState::Polling)
    }
}

/// Session configuration: interval and terminal predicate
pub struct PollOptions<T> {
    interval: Duration,
    is_terminal: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> PollOptions<T> {
    /// Options with the default interval and the given terminal predicate
    pub fn new(is_terminal: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            is_terminal: Arc::new(is_terminal),
        }
    }

    /// Override the polling interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl<T> Clone for PollOptions<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            is_terminal: Arc::clone(&self.is_terminal),
        }
    }
}

/// Shared mutable state of one poll session
struct Session<T> {
    /// Bumped on stop, restart, and on leaving `Polling`; fetches tagged
    /// with an older value are stale
    generation: AtomicU64,
    state: Mutex<SessionState<T>>,
}

struct SessionState<T> {
    key: String,
    state: PollState,
    last_result: Option<T>,
    driver: Option<JoinHandle<()>>,
}

/// Entry point for starting poll sessions
pub struct StatusPoller;

impl StatusPoller {
    /// Start polling `key` with `fetcher` on the configured interval
    ///
    /// The first fetch is issued immediately; subsequent fetches are issued
    /// on every interval tick, scheduled by the timer independently of fetch
    /// completion. Each delivered result is handed to the observer's
    /// `on_update`; a result satisfying the terminal predicate is delivered
    /// and then ends the session. A fetch failure is handed to `on_error`
    /// and ends the session without retrying.
    ///
    /// # Arguments
    /// * `key` - Opaque non-empty identifier of the tracked resource
    /// * `fetcher` - Asynchronous status fetch, invoked once per tick
    /// * `observer` - Receives results and failures
    /// * `options` - Interval and terminal predicate
    ///
    /// # Errors
    /// [`PollError::EmptyKey`] if the key is empty,
    /// [`PollError::ZeroInterval`] if the interval is zero. Both are caller
    /// bugs and are reported before any fetch is issued.
    pub fn start<T, E, F, Fut, O>(
        key: impl Into<String>,
        fetcher: F,
        observer: O,
        options: PollOptions<T>,
    ) -> Result<PollHandle<T, E>, PollError>
    where
        T: Clone + Send + 'static,
        E: Send + 'static,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        O: PollObserver<T, E> + 'static,
    {
        let key = key.into();
        if key.is_empty() {
            return Err(PollError::EmptyKey);
        }
        if options.interval.is_zero() {
            return Err(PollError::ZeroInterval);
        }

        let fetcher: Fetcher<T, E> =
            Arc::new(move |key: String| -> BoxFuture<T, E> { Box::pin(fetcher(key)) });
        let observer: SharedObserver<T, E> = Arc::new(Mutex::new(observer));
        let session = Arc::new(Session {
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState {
                key: key.clone(),
                state: PollState::Polling,
                last_result: None,
                driver: None,
            }),
        });

        let handle = PollHandle {
            session,
            fetcher,
            observer,
            options,
        };
        handle.spawn_driver(0, key);

        Ok(handle)
    }
}

/// Handle to a live or ended poll session
///
/// Dropping the handle cancels the session, so a handle owned by a scope
/// being torn down cannot leave a timer behind.
pub struct PollHandle<T, E> {
    session: Arc<Session<T>>,
    fetcher: Fetcher<T, E>,
    observer: SharedObserver<T, E>,
    options: PollOptions<T>,
}

impl<T, E> PollHandle<T, E> {
    /// Stop the session
    ///
    /// Idempotent: stopping an already-ended session is a no-op. Any fetch
    /// still in flight becomes stale and its outcome is discarded; the
    /// observer will not be invoked again.
    pub fn stop(&self) {
        let driver = {
            let mut state = self.session.state.lock().unwrap();
            if !state.state.is_live() {
                return;
            }
            self.session.generation.fetch_add(1, Ordering::SeqCst);
            state.state = PollState::Cancelled;
            state.driver.take()
        };
        if let Some(driver) = driver {
            driver.abort();
        }
        debug!("Poll session cancelled");
    }

    /// Current lifecycle state
    pub fn state(&self) -> PollState {
        self.session.state.lock().unwrap().state
    }

    /// The key currently being tracked
    pub fn key(&self) -> String {
        self.session.state.lock().unwrap().key.clone()
    }
}

impl<T, E> PollHandle<T, E>
where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    /// Switch the session to a new key and begin a fresh cycle
    ///
    /// Bumps the session generation first, so an outcome from the old key
    /// still in flight can never reach the observer, then starts polling
    /// `new_key` with an immediate first fetch, as if the session had just
    /// been started. Works from any state, including ended ones.
    ///
    /// # Errors
    /// [`PollError::EmptyKey`] if `new_key` is empty; the session is left
    /// untouched in that case.
    pub fn restart(&self, new_key: impl Into<String>) -> Result<(), PollError> {
        let new_key = new_key.into();
        if new_key.is_empty() {
            return Err(PollError::EmptyKey);
        }

        let (generation, old_driver) = {
            let mut state = self.session.state.lock().unwrap();
            let generation = self.session.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.key = new_key.clone();
            state.state = PollState::Polling;
            state.last_result = None;
            (generation, state.driver.take())
        };
        if let Some(driver) = old_driver {
            driver.abort();
        }

        debug!("Poll session restarted for key {}", new_key);
        self.spawn_driver(generation, new_key);

        Ok(())
    }

    /// Most recent result delivered for the current key, if any
    pub fn last_result(&self) -> Option<T> {
        self.session.state.lock().unwrap().last_result.clone()
    }

    fn spawn_driver(&self, generation: u64, key: String) {
        let driver = tokio::spawn(drive(
            Arc::clone(&self.session),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.observer),
            self.options.clone(),
            generation,
            key,
        ));
        self.session.state.lock().unwrap().driver = Some(driver);
    }
}

impl<T, E> Drop for PollHandle<T, E> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Driver loop for one (session, generation) pair
///
/// Sole owner of the timer and sole mutator of session state while its
/// generation is current. Returns as soon as the generation moves on or an
/// end state is reached.
async fn drive<T, E>(
    session: Arc<Session<T>>,
    fetcher: Fetcher<T, E>,
    observer: SharedObserver<T, E>,
    options: PollOptions<T>,
    generation: u64,
    key: String,
) where
    T: Clone + Send + 'static,
    E: Send + 'static,
{
    let mut ticker = tokio::time::interval(options.interval);
    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Result<T, E>)>();

    debug!(
        "Poll session started for key {} (interval: {:?})",
        key, options.interval
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if session.generation.load(Ordering::SeqCst) != generation {
                    return;
                }

                debug!("Fetching status for key {}", key);

                let fut = (fetcher)(key.clone());
                let tx = tx.clone();
                tokio::spawn(async move {
                    let outcome = fut.await;
                    // Send fails only after the driver exited; stale by then.
                    let _ = tx.send((generation, outcome));
                });
            }
            Some((tag, outcome)) = rx.recv() => {
                let mut state = session.state.lock().unwrap();
                if tag != session.generation.load(Ordering::SeqCst) {
                    debug!("Discarding stale fetch outcome for key {}", key);
                    continue;
                }

                match outcome {
                    Ok(result) => {
                        let terminal = (options.is_terminal)(&result);
                        state.last_result = Some(result.clone());
                        if terminal {
                            state.state = PollState::Terminal;
                            session.generation.fetch_add(1, Ordering::SeqCst);
                        }
                        drop(state);

                        observer.lock().unwrap().on_update(&result);

                        if terminal {
                            debug!("Terminal result for key {}, session complete", key);
                            return;
                        }
                    }
                    Err(error) => {
                        state.state = PollState::Errored;
                        session.generation.fetch_add(1, Ordering::SeqCst);
                        drop(state);

                        warn!("Status fetch failed for key {}, stopping session", key);
                        observer.lock().unwrap().on_error(&error);
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::observer;
    use std::sync::atomic::AtomicUsize;
    use tokio::time;

    type Updates = Arc<Mutex<Vec<String>>>;

    fn recording_observer(
        updates: Updates,
        errors: Updates,
    ) -> impl PollObserver<String, String> + 'static {
        observer(
            move |result: &String| updates.lock().unwrap().push(result.clone()),
            move |error: &String| errors.lock().unwrap().push(error.clone()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_is_immediate_then_interval_multiples() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&fetches);
        let handle = StatusPoller::start(
            "newsletter-1",
            move |_key: String| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<String, String>("pending".to_string()) }
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|_: &String| false).with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        // Just before the first interval tick
        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        // Past ticks at 5s and 10s
        time::sleep(Duration::from_secs(7)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
        assert_eq!(updates.lock().unwrap().len(), 3);
        assert!(errors.lock().unwrap().is_empty());
        assert_eq!(handle.state(), PollState::Polling);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_on_first_fetch_releases_timer() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&fetches);
        let handle = StatusPoller::start(
            "newsletter-2",
            move |_key: String| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<String, String>("done".to_string()) }
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|result: &String| result == "done")
                .with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), PollState::Terminal);
        assert_eq!(handle.last_result(), Some("done".to_string()));

        // No timer remains: no further fetch past several intervals
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(*updates.lock().unwrap(), ["done"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_discards_in_flight_fetch() {
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let handle = StatusPoller::start(
            "newsletter-3",
            |_key: String| async move {
                time::sleep(Duration::from_secs(10)).await;
                Ok::<String, String>("late".to_string())
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|_: &String| false).with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        // First fetch issued at t=0, resolves at t=10; stop at t=2
        time::sleep(Duration::from_secs(2)).await;
        handle.stop();
        assert_eq!(handle.state(), PollState::Cancelled);

        // Let the in-flight fetch resolve; its outcome must be discarded
        time::sleep(Duration::from_secs(30)).await;
        assert!(updates.lock().unwrap().is_empty());
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent() {
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let handle = StatusPoller::start(
            "newsletter-4",
            |_key: String| async move { Ok::<String, String>("pending".to_string()) },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|_: &String| false).with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        time::sleep(Duration::from_millis(10)).await;
        handle.stop();
        handle.stop();
        assert_eq!(handle.state(), PollState::Cancelled);
        assert_eq!(updates.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_pending_done_scenario() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&fetches);
        let handle = StatusPoller::start(
            "newsletter-5",
            move |_key: String| {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    let status = if call < 2 { "pending" } else { "done" };
                    Ok::<String, String>(status.to_string())
                }
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|result: &String| result == "done")
                .with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        // Fetches at t=0, t=5, t=10; the third is terminal
        time::sleep(Duration::from_secs(12)).await;
        assert_eq!(
            *updates.lock().unwrap(),
            ["pending", "pending", "done"]
        );
        assert_eq!(handle.state(), PollState::Terminal);

        // No fetch at the would-be fourth tick
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_on_first_fetch_stops_session() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&fetches);
        let handle = StatusPoller::start(
            "newsletter-6",
            move |_key: String| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Err::<String, String>("network unreachable".to_string()) }
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|_: &String| false).with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.state(), PollState::Errored);
        assert_eq!(*errors.lock().unwrap(), ["network unreachable"]);
        assert!(updates.lock().unwrap().is_empty());

        // No fetch at the next tick
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_discards_old_key_in_flight() {
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let handle = StatusPoller::start(
            "A",
            |key: String| async move {
                if key == "A" {
                    // Slow: resolves two interval ticks later
                    time::sleep(Duration::from_secs(10)).await;
                    Ok::<String, String>("a-done".to_string())
                } else {
                    Ok("b-done".to_string())
                }
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|result: &String| result.ends_with("done"))
                .with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        // A's first fetch is in flight; switch to B before it resolves
        time::sleep(Duration::from_secs(1)).await;
        handle.restart("B").unwrap();
        assert_eq!(handle.key(), "B");

        // B resolves immediately and is terminal; A's late outcome at t=10
        // must never be delivered
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(*updates.lock().unwrap(), ["b-done"]);
        assert_eq!(handle.state(), PollState::Terminal);
        assert_eq!(handle.last_result(), Some("b-done".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_terminal_begins_fresh_cycle() {
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let handle = StatusPoller::start(
            "first",
            |key: String| async move { Ok::<String, String>(format!("{key}-done")) },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|result: &String| result.ends_with("done"))
                .with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.state(), PollState::Terminal);

        handle.restart("second").unwrap();
        time::sleep(Duration::from_millis(10)).await;

        assert_eq!(*updates.lock().unwrap(), ["first-done", "second-done"]);
        assert_eq!(handle.state(), PollState::Terminal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_with_empty_key_leaves_session_untouched() {
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let handle = StatusPoller::start(
            "newsletter-7",
            |_key: String| async move { Ok::<String, String>("pending".to_string()) },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|_: &String| false).with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.restart(""), Err(PollError::EmptyKey));
        assert_eq!(handle.state(), PollState::Polling);
        assert_eq!(handle.key(), "newsletter-7");

        // The original cycle keeps delivering
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(updates.lock().unwrap().len(), 2);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_does_not_delay_ticks_delivery_in_completion_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let updates: Updates = Arc::new(Mutex::new(Vec::new()));
        let errors: Updates = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&calls);
        let handle = StatusPoller::start(
            "newsletter-8",
            move |_key: String| {
                let call = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        // Resolves after the second fetch has already landed
                        time::sleep(Duration::from_secs(7)).await;
                        Ok::<String, String>("first".to_string())
                    } else {
                        Ok("second".to_string())
                    }
                }
            },
            recording_observer(Arc::clone(&updates), Arc::clone(&errors)),
            PollOptions::new(|_: &String| false).with_interval(Duration::from_secs(5)),
        )
        .unwrap();

        // Tick at t=5 fires while the t=0 fetch is still in flight; the
        // second fetch completes at t=5, the first at t=7
        time::sleep(Duration::from_secs(8)).await;
        assert_eq!(*updates.lock().unwrap(), ["second", "first"]);

        handle.stop();
    }

    #[tokio::test]
    async fn test_rejects_empty_key() {
        let result = StatusPoller::start(
            "",
            |_key: String| async move { Ok::<String, String>("pending".to_string()) },
            observer(|_: &String| {}, |_: &String| {}),
            PollOptions::new(|_: &String| false),
        );

        assert!(matches!(result, Err(PollError::EmptyKey)));
    }

    #[tokio::test]
    async fn test_rejects_zero_interval() {
        let result = StatusPoller::start(
            "newsletter-9",
            |_key: String| async move { Ok::<String, String>("pending".to_string()) },
            observer(|_: &String| {}, |_: &String| {}),
            PollOptions::new(|_: &String| false).with_interval(Duration::ZERO),
        );

        assert!(matches!(result, Err(PollError::ZeroInterval)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_interval_is_five_seconds() {
        let fetches = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fetches);
        let handle = StatusPoller::start(
            "newsletter-10",
            move |_key: String| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<String, String>("pending".to_string()) }
            },
            observer(|_: &String| {}, |_: &String| {}),
            PollOptions::new(|_: &String| false),
        )
        .unwrap();

        time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);

        handle.stop();
    }
}
