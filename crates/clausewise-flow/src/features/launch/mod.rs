//! Contract analysis launcher slice.
//!
//! Runs the readiness probe while the launcher is open and redirects to the
//! sibling application once the service reports ready.

mod update;

pub use update::{handle_probe_status, handle_redirected, launch, start_probe};
