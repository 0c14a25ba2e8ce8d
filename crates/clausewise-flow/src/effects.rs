//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct state mutations).
//!
//! ## Cancellation Effects
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`.
//! The runtime executes these by calling `token.cancel()` on the provided token.

use clausewise_core::{Attachment, Identity};
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Stop the application loop.
    Quit,

    /// Log in through the auth gateway.
    SpawnLogin {
        task: TaskId,
        email: String,
        password: String,
    },

    /// Register an account through the auth gateway.
    SpawnSignup {
        task: TaskId,
        name: String,
        email: String,
        password: String,
    },

    /// Run the readiness sequence for the analysis service.
    StartProbe { task: TaskId },

    /// Ask the scripted assistant for a reply.
    ScheduleChatReply {
        task: TaskId,
        attachment: Option<Attachment>,
    },

    /// Full navigation to the sibling application.
    Redirect { url: String },

    /// Make the persisted identity match `identity` (`None` removes it).
    SyncSession { identity: Option<Identity> },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
