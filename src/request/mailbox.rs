use crate::models::{RequestCode, UnknownRequestCode};
use std::sync::atomic::{AtomicU8, Ordering};

/// Single-slot holder of the next request for the host-processing thread.
///
/// One producer (the UI thread) and one consumer (the host thread) may use it
/// concurrently. Both operations are a single atomic swap, so a value is
/// handed over exactly once: no two [`take_and_clear`](Self::take_and_clear)
/// calls observe the same published value, and a publish is visible to the
/// next take.
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: AtomicU8,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(RequestCode::None as u8),
        }
    }

    /// Store `code` as pending, overwriting anything not yet taken.
    ///
    /// Returns the request that was overwritten, if there was one. The UI is
    /// disabled while a request is outstanding, so a preempted request means
    /// the front-end let a second request through.
    pub fn publish(&self, code: RequestCode) -> Option<RequestCode> {
        let previous = self.slot.swap(code.as_u8(), Ordering::AcqRel);
        match RequestCode::try_from(previous) {
            Ok(RequestCode::None) => None,
            Ok(preempted) => {
                tracing::warn!("Request {} preempted by {} before dispatch", preempted, code);
                Some(preempted)
            }
            Err(unknown) => {
                tracing::warn!("{} preempted by {} before dispatch", unknown, code);
                None
            }
        }
    }

    /// Store a raw discriminant, e.g. one from a newer front-end.
    pub fn publish_raw(&self, raw: u8) {
        self.slot.store(raw, Ordering::Release);
    }

    /// Take the pending request and reset the slot to `None` in one step.
    pub fn take_and_clear(&self) -> Result<RequestCode, UnknownRequestCode> {
        RequestCode::try_from(self.take_raw())
    }

    pub fn take_raw(&self) -> u8 {
        self.slot.swap(RequestCode::None.as_u8(), Ordering::AcqRel)
    }

    /// Current value without consuming it (diagnostics only)
    pub fn peek(&self) -> Result<RequestCode, UnknownRequestCode> {
        RequestCode::try_from(self.slot.load(Ordering::Acquire))
    }
}
