//! Feature slices for the workflow (state transitions per slice).

pub mod auth;
pub mod chat;
pub mod launch;
