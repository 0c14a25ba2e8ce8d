//! Assistant chat slice.

mod update;

pub use update::{handle_reply, send};
