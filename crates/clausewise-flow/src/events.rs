//! UI event types.
//!
//! All inputs (user intents, async task results) are converted to `UiEvent`
//! before being processed by the reducer.

use clausewise_core::{Attachment, AuthResult, ChatMessage, ServiceStatus};

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    // ========================================================================
    // User intents
    // ========================================================================
    /// "Get started" on the landing page.
    GetStarted,
    /// Switch the login modal between sign-in and sign-up.
    ToggleSignupMode,
    SubmitLogin {
        email: String,
        password: String,
    },
    SubmitSignup {
        name: String,
        email: String,
        password: String,
    },
    CancelLogin,
    PickContractAnalysis,
    PickEducation,
    CancelServiceSelection,
    /// Back to service selection from the launcher or the chat widget.
    Back,
    RetryProbe,
    LaunchApp,
    SendChat {
        text: String,
        attachment: Option<Attachment>,
    },
    CloseChat,
    Logout,
    Quit,

    // ========================================================================
    // Task lifecycle
    // ========================================================================
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    // ========================================================================
    // Async results
    // ========================================================================
    LoginFinished(AuthResult),
    SignupFinished(AuthResult),
    /// Intermediate status from a running probe task.
    ProbeStatus {
        task: TaskId,
        status: ServiceStatus,
    },
    /// Probe task ended; `None` when it was cancelled.
    ProbeFinished(Option<ServiceStatus>),
    /// `None` when the reply was cancelled.
    ChatReply(Option<ChatMessage>),
    /// Outcome of a redirect effect.
    Redirected(Result<(), String>),
    /// Outcome of a session write or removal.
    SessionSynced(Result<(), String>),
}
