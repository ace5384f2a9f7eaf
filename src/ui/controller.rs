// Coordinator - wires the front-end to the host-processing thread
//
// This module contains the Coordinator which owns:
// - the request Mailbox shared with the RequestHandler
// - the ExternalEvent that wakes the host thread
// - the HostLoop (the host thread itself)
// - the ViewManager the front-end renders from
//
// It is built once at startup and handed to the front-end; nothing is looked
// up through process-wide accessors.

use crate::host::HostDocument;
use crate::metrics::DispatchMetrics;
use crate::models::RequestCode;
use crate::request::{ExternalEvent, HostLoop, Mailbox, RaiseOutcome, RequestHandler};
use crate::services::CatalogStore;
use crate::state::ViewManager;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// How long shutdown waits for an in-flight dispatch before detaching it
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Why a request was not issued
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("A {0} request is still in progress")]
    Busy(RequestCode),

    #[error("No group number {0}")]
    NoSuchGroup(usize),

    #[error("Host-processing thread has stopped")]
    HostStopped,
}

/// Owner of the request plumbing for one front-end.
///
/// # Example
/// ```ignore
/// let document = InMemoryDocument::load(path)?;
/// let coordinator = Coordinator::start(document, CatalogStore::from_settings(&settings))?;
/// coordinator.make_request(RequestCode::Initial)?;
/// // ... front-end loop ...
/// coordinator.shutdown();
/// ```
pub struct Coordinator {
    mailbox: Arc<Mailbox>,

    /// Dropped on shutdown, which ends the host loop
    event: Option<ExternalEvent>,

    host_loop: Option<HostLoop>,

    view: Arc<ViewManager>,

    metrics: Arc<DispatchMetrics>,
}

impl Coordinator {
    /// Spawn the host-processing thread around `document`.
    pub fn start<H>(document: H, store: CatalogStore) -> Result<Self>
    where
        H: HostDocument + Send + 'static,
    {
        let mailbox = Arc::new(Mailbox::new());
        let view = Arc::new(ViewManager::new());
        let metrics = Arc::new(DispatchMetrics::new());

        let handler = RequestHandler::new(
            Arc::clone(&mailbox),
            document,
            Arc::clone(&view),
            store,
            Arc::clone(&metrics),
        );

        let (event, wake) = ExternalEvent::new();
        let host_loop =
            HostLoop::spawn(handler, wake).context("Failed to spawn host-processing thread")?;

        tracing::info!("Coordinator started");

        Ok(Self {
            mailbox,
            event: Some(event),
            host_loop: Some(host_loop),
            view,
            metrics,
        })
    }

    /// Hand `code` to the host thread.
    ///
    /// Disables the view first, then publishes and raises the wake signal, so
    /// the re-arm at the end of the dispatch can never run before the
    /// disable. Refused while another request is outstanding.
    pub fn make_request(&self, code: RequestCode) -> Result<(), RequestError> {
        let Some(event) = self.event.as_ref() else {
            return Err(RequestError::HostStopped);
        };

        if !self.view.doze_off(code) {
            let in_flight = self.view.read(|v| v.in_flight.unwrap_or_default());
            tracing::debug!("Refused {} while {} is in flight", code, in_flight);
            return Err(RequestError::Busy(in_flight));
        }

        if self.mailbox.publish(code).is_some() {
            self.metrics.record_preempted();
        }

        if event.raise() == RaiseOutcome::Closed {
            // Nothing will take the request; undo so the view is usable
            self.mailbox.take_raw();
            self.view.update(|v| {
                v.controls_enabled = true;
                v.in_flight = None;
            });
            return Err(RequestError::HostStopped);
        }

        tracing::debug!("Requested {}", code);
        Ok(())
    }

    /// Select the `n`-th (1-based) group and request its attributes.
    pub fn select_group(&self, n: usize) -> Result<String, RequestError> {
        if let Some(in_flight) = self.view.read(|v| v.is_busy().then_some(v.in_flight)) {
            return Err(RequestError::Busy(in_flight.unwrap_or_default()));
        }

        let title = self
            .view
            .select_index(n)
            .ok_or(RequestError::NoSuchGroup(n))?;
        self.make_request(RequestCode::ChangeSelection)?;
        Ok(title)
    }

    pub fn view(&self) -> &Arc<ViewManager> {
        &self.view
    }

    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Stop the host thread. Always allowed, even mid-request.
    ///
    /// Waits up to [`SHUTDOWN_GRACE`] for the in-flight dispatch; a dispatch
    /// still running after that is left detached.
    pub fn shutdown(mut self) {
        self.stop(SHUTDOWN_GRACE);
    }

    /// Same as [`shutdown`](Self::shutdown) with a custom grace period.
    pub fn shutdown_within(mut self, grace: Duration) {
        self.stop(grace);
    }

    fn stop(&mut self, grace: Duration) {
        // Dropping the only sender ends the host loop after its current wake
        self.event.take();

        if let Some(host_loop) = self.host_loop.take() {
            if host_loop.join_timeout(grace) {
                tracing::info!("Coordinator stopped");
            }
            self.metrics.log_summary();
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop(SHUTDOWN_GRACE);
    }
}
