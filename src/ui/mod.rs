// UI module - front-end side of the request plumbing
//
// This module contains:
// - FrontEnd: callbacks the host-processing thread uses to feed the view
// - Coordinator: owns the mailbox, wake signal and host thread
// - console: line-based front-end used by the binary

pub mod console;
pub mod controller;
pub mod front_end;

pub use controller::{Coordinator, RequestError};
pub use front_end::FrontEnd;
