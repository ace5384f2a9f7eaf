// External event - wakes the host-processing thread
//
// The UI thread never calls into the host. It raises this event instead and
// the host thread, blocked on the receiving end, runs one dispatch per wake.

use crate::host::HostDocument;
use crate::request::{DispatchOutcome, RequestHandler};
use crate::ui::FrontEnd;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Name of the thread that owns the host document
pub const HOST_THREAD_NAME: &str = "host-processing";

/// Outcome of [`ExternalEvent::raise`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseOutcome {
    /// A wake was queued
    Queued,

    /// A wake was already queued; it will pick up the latest mailbox value
    Coalesced,

    /// The host thread has stopped
    Closed,
}

/// Sending side of the wake signal, held by the UI side.
///
/// The channel holds at most one pending wake. Wakes raised while one is
/// queued coalesce into it.
#[derive(Debug, Clone)]
pub struct ExternalEvent {
    wake_tx: mpsc::Sender<()>,
}

/// Receiving side, moved onto the host-processing thread
#[derive(Debug)]
pub struct WakeReceiver {
    wake_rx: mpsc::Receiver<()>,
}

impl ExternalEvent {
    pub fn new() -> (Self, WakeReceiver) {
        let (wake_tx, wake_rx) = mpsc::channel(1);
        (Self { wake_tx }, WakeReceiver { wake_rx })
    }

    /// Ask the host thread to run the handler.
    pub fn raise(&self) -> RaiseOutcome {
        match self.wake_tx.try_send(()) {
            Ok(()) => RaiseOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(())) => {
                tracing::debug!("Wake already pending - coalescing");
                RaiseOutcome::Coalesced
            }
            Err(mpsc::error::TrySendError::Closed(())) => {
                tracing::warn!("Failed to raise external event - host thread has stopped");
                RaiseOutcome::Closed
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.wake_tx.is_closed()
    }
}

impl WakeReceiver {
    /// Block until the next wake. `None` once every sender is gone.
    pub fn wait(&mut self) -> Option<()> {
        self.wake_rx.blocking_recv()
    }
}

/// The host-processing thread.
///
/// Runs until every [`ExternalEvent`] is dropped, then exits. A dispatch that
/// panics is logged and the loop keeps serving later wakes.
pub struct HostLoop {
    handle: JoinHandle<()>,
}

impl HostLoop {
    pub fn spawn<H, F>(
        mut handler: RequestHandler<H, F>,
        mut wake: WakeReceiver,
    ) -> std::io::Result<Self>
    where
        H: HostDocument + Send + 'static,
        F: FrontEnd + ?Sized + 'static,
    {
        let handle = thread::Builder::new()
            .name(HOST_THREAD_NAME.to_string())
            .spawn(move || {
                tracing::debug!("{} started", handler.name());

                while wake.wait().is_some() {
                    let result = panic::catch_unwind(AssertUnwindSafe(|| handler.execute()));
                    match result {
                        Ok(Ok(DispatchOutcome::Completed(code))) => {
                            tracing::debug!("Request {} completed", code);
                        }
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => tracing::error!("Request failed: {}", e),
                        Err(_) => {
                            tracing::error!("Request handler panicked");
                            handler.metrics().record_failure();
                        }
                    }
                }

                tracing::debug!("{} stopped", handler.name());
            })?;

        Ok(Self { handle })
    }

    /// Wait for the thread to finish. Drop every [`ExternalEvent`] first.
    pub fn join(self) {
        if self.handle.join().is_err() {
            tracing::error!("Host-processing thread terminated abnormally");
        }
    }

    /// Wait at most `grace` for the thread to finish.
    ///
    /// Returns false and detaches the thread if a dispatch is still running
    /// at the deadline. Drop every [`ExternalEvent`] first.
    pub fn join_timeout(self, grace: Duration) -> bool {
        let deadline = Instant::now() + grace;
        while !self.is_finished() {
            if Instant::now() >= deadline {
                tracing::warn!(
                    "Host-processing thread still busy after {:?} - detaching it",
                    grace
                );
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }

        self.join();
        true
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raise_coalesces() {
        let (event, _wake) = ExternalEvent::new();
        assert_eq!(event.raise(), RaiseOutcome::Queued);
        assert_eq!(event.raise(), RaiseOutcome::Coalesced);
    }

    #[test]
    fn test_raise_after_receiver_dropped() {
        let (event, wake) = ExternalEvent::new();
        drop(wake);
        assert!(event.is_closed());
        assert_eq!(event.raise(), RaiseOutcome::Closed);
    }

    #[test]
    fn test_join_timeout_detaches_busy_thread() {
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let host_loop = HostLoop {
            handle: thread::spawn(move || {
                let _ = release_rx.recv();
            }),
        };

        assert!(!host_loop.join_timeout(Duration::from_millis(50)));
        drop(release_tx);
    }

    #[test]
    fn test_join_timeout_joins_finished_thread() {
        let host_loop = HostLoop {
            handle: thread::spawn(|| {}),
        };

        assert!(host_loop.join_timeout(Duration::from_secs(5)));
    }

    #[test]
    fn test_wait_ends_when_senders_dropped() {
        let (event, mut wake) = ExternalEvent::new();
        event.raise();
        drop(event);

        assert_eq!(wake.wait(), Some(()));
        assert_eq!(wake.wait(), None);
    }
}
