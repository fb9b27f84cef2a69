//! Observer seam for poll sessions
//!
//! Sessions deliver fetch outcomes through this trait so call sites can bind
//! whatever surface they have (CLI output, a channel into a UI loop, test
//! recorders) without the poller knowing about it.

/// Receives the outcomes of one poll session
///
/// Callbacks are invoked synchronously by the session driver in the turn
/// that received the corresponding fetch outcome; they are never batched or
/// deferred. `on_update` fires once per delivered result, including the
/// terminal one. `on_error` fires at most once, after which the session has
/// stopped.
pub trait PollObserver<T, E>: Send {
    /// A fetch resolved with a result for the current generation
    fn on_update(&mut self, result: &T);

    /// A fetch failed; the session stops after this delivery
    fn on_error(&mut self, error: &E);
}

/// Adapter binding a pair of closures as a [`PollObserver`]
pub struct FnObserver<U, F> {
    on_update: U,
    on_error: F,
}

/// Build an observer from an update closure and an error closure
pub fn observer<T, E, U, F>(on_update: U, on_error: F) -> FnObserver<U, F>
where
    U: FnMut(&T) + Send,
    F: FnMut(&E) + Send,
{
    FnObserver {
        on_update,
        on_error,
    }
}

impl<T, E, U, F> PollObserver<T, E> for FnObserver<U, F>
where
    U: FnMut(&T) + Send,
    F: FnMut(&E) + Send,
{
    fn on_update(&mut self, result: &T) {
        (self.on_update)(result)
    }

    fn on_error(&mut self, error: &E) {
        (self.on_error)(error)
    }
}
