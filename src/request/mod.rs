//! Request handoff between the UI thread and the host-processing thread.
//!
//! - [`Mailbox`]: the single pending request slot
//! - [`ExternalEvent`] / [`HostLoop`]: wake signal and the thread it wakes
//! - [`RequestHandler`]: takes the pending request and runs it on the host thread
//!
//! At most one request is in flight: the front-end disables itself before
//! publishing and is only re-armed by the handler once dispatch finishes.

pub mod event;
pub mod handler;
pub mod mailbox;

pub use event::{ExternalEvent, HOST_THREAD_NAME, HostLoop, RaiseOutcome, WakeReceiver};
pub use handler::{DispatchError, DispatchOutcome, DispatchState, RequestHandler};
pub use mailbox::Mailbox;
