//! What the user is shown for a given state.

use crate::state::{AppState, LoginMode, WorkflowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Login(LoginMode),
    ServiceSelection,
    Launcher,
    Dashboard,
}

/// Resolves the screen to present.
///
/// A signed-in user asking for the chat always sees the dashboard, and the
/// identity-only screens fall back to the landing page without an identity.
pub fn active_view(app: &AppState) -> View {
    match app.workflow {
        WorkflowState::Landing => View::Landing,
        WorkflowState::LoginModal => View::Login(app.login.mode),
        WorkflowState::ServiceSelection => View::ServiceSelection,
        WorkflowState::ContractAnalysisLaunch => View::Launcher,
        workflow if workflow.requires_identity() && !app.is_authenticated() => View::Landing,
        WorkflowState::EducationChat | WorkflowState::Dashboard => View::Dashboard,
    }
}
