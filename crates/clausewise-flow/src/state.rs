//! Application state composition.
//!
//! ```text
//! AppState
//! ├── workflow: WorkflowState   (the single active screen)
//! ├── identity: Option<Identity> (mirror of the session store)
//! ├── login: LoginForm          (login/signup modal)
//! ├── launch: LaunchState       (analysis service readiness)
//! ├── chat: ChatState           (scripted assistant transcript)
//! ├── session_error             (last failed session write)
//! ├── task_seq: TaskSeq         (async task id generator)
//! └── tasks: Tasks              (task lifecycle state)
//! ```
//!
//! Exactly one screen is active at a time. Screen-specific state lives in its
//! own struct and is reset when the screen is entered, so stale modal state
//! cannot leak into another screen.

use clausewise_core::{ChatMessage, Identity, ServiceStatus};

use crate::common::{TaskSeq, Tasks};

/// The screen or modal currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowState {
    #[default]
    Landing,
    LoginModal,
    ServiceSelection,
    ContractAnalysisLaunch,
    EducationChat,
    Dashboard,
}

impl WorkflowState {
    /// Screens that must never be shown without an identity.
    pub fn requires_identity(self) -> bool {
        matches!(self, WorkflowState::EducationChat | WorkflowState::Dashboard)
    }

    /// Screens hosting the assistant chat.
    pub fn hosts_chat(self) -> bool {
        matches!(self, WorkflowState::EducationChat | WorkflowState::Dashboard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchState {
    pub status: ServiceStatus,
    /// Set once the service is ready.
    pub launch_url: Option<String>,
    pub launching: bool,
    pub error: Option<String>,
}

impl Default for LaunchState {
    fn default() -> Self {
        Self {
            status: ServiceStatus::Checking,
            launch_url: None,
            launching: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::greeting()],
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    pub workflow: WorkflowState,
    /// Mirrors the session store; written through on login and logout.
    pub identity: Option<Identity>,
    pub login: LoginForm,
    pub launch: LaunchState,
    pub chat: ChatState,
    /// Set when the session file could not be updated to match `identity`.
    pub session_error: Option<String>,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    launch_target: String,
}

impl AppState {
    /// Creates the initial state from the persisted identity.
    pub fn new(identity: Option<Identity>, launch_target: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            workflow: WorkflowState::Landing,
            identity,
            login: LoginForm::default(),
            launch: LaunchState::default(),
            chat: ChatState::default(),
            session_error: None,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            launch_target: launch_target.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// URL of the sibling application.
    pub fn launch_target(&self) -> &str {
        &self.launch_target
    }

    /// True while a signup or login request is in flight.
    pub fn auth_pending(&self) -> bool {
        self.tasks.login.is_running() || self.tasks.signup.is_running()
    }

    pub fn awaiting_reply(&self) -> bool {
        self.tasks.chat_reply.is_running()
    }
}
