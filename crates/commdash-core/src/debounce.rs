// ── Input debouncing ──
//
// Search boxes filter on every keystroke; the debouncer collapses a burst of
// calls into one delivery of the last value once input has been quiet for
// the wait period.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Default quiet period for search inputs.
pub const DEFAULT_DEBOUNCE_WAIT: Duration = Duration::from_millis(300);

/// Delivers only the last of a burst of values to a callback.
///
/// Each [`call`](Self::call) restarts the wait. Dropping the debouncer
/// cancels any pending delivery.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Start the background task. Must be called inside a tokio runtime.
    pub fn spawn<F>(wait: Duration, mut deliver: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let sleep = tokio::time::sleep(wait);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    biased;

                    () = token.cancelled() => break,

                    msg = rx.recv() => {
                        let Some(value) = msg else { break };
                        pending = Some(value);
                        sleep.as_mut().reset(Instant::now() + wait);
                    }

                    () = &mut sleep, if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            trace!("debounce window elapsed");
                            deliver(value);
                        }
                    }
                }
            }
        });

        Self { tx, cancel }
    }

    /// Submit a value, replacing any that is still waiting.
    pub fn call(&self, value: T) {
        if self.tx.send(value).is_err() {
            trace!("debouncer already stopped");
        }
    }

    /// Drop the pending value and stop the task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
