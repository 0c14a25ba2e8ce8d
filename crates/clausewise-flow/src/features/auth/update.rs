//! Auth feature reducer.
//!
//! Handles login/signup submission and result processing.

use clausewise_core::AuthResult;

use crate::effects::UiEffect;
use crate::state::{AppState, LoginForm, LoginMode, WorkflowState};

const MISSING_FIELDS: &str = "Please fill in all fields.";
const SIGNUP_COMPLETE: &str = "Account created successfully! Please login.";

pub fn toggle_mode(form: &mut LoginForm) {
    form.mode = match form.mode {
        LoginMode::Login => LoginMode::Signup,
        LoginMode::Signup => LoginMode::Login,
    };
    form.error = None;
    form.notice = None;
}

pub fn submit_login(app: &mut AppState, email: String, password: String) -> Vec<UiEffect> {
    if app.auth_pending() {
        return vec![];
    }
    if email.trim().is_empty() || password.is_empty() {
        app.login.error = Some(MISSING_FIELDS.to_string());
        return vec![];
    }

    app.login.error = None;
    app.login.notice = None;
    let task = app.task_seq.next_id();
    app.tasks.login.begin(task);
    vec![UiEffect::SpawnLogin {
        task,
        email: email.trim().to_string(),
        password,
    }]
}

pub fn submit_signup(
    app: &mut AppState,
    name: String,
    email: String,
    password: String,
) -> Vec<UiEffect> {
    if app.auth_pending() {
        return vec![];
    }
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        app.login.error = Some(MISSING_FIELDS.to_string());
        return vec![];
    }

    app.login.error = None;
    app.login.notice = None;
    let task = app.task_seq.next_id();
    app.tasks.signup.begin(task);
    vec![UiEffect::SpawnSignup {
        task,
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password,
    }]
}

/// Applies a login result.
///
/// A successful login is adopted even if the modal was closed meanwhile: the
/// gateway has already persisted the identity, so the in-memory mirror must
/// follow. Navigation only happens from the modal.
pub fn handle_login_result(app: &mut AppState, result: AuthResult) {
    match result {
        AuthResult::Success { identity, .. } => {
            tracing::info!(email = %identity.email, "login complete");
            app.identity = Some(identity);
            app.login = LoginForm::default();
            if app.workflow == WorkflowState::LoginModal {
                app.workflow = WorkflowState::ServiceSelection;
            }
        }
        AuthResult::Failure { message } => {
            if app.workflow == WorkflowState::LoginModal {
                app.login.error = Some(message);
            }
        }
    }
}

pub fn handle_signup_result(app: &mut AppState, result: AuthResult) {
    if app.workflow != WorkflowState::LoginModal {
        return;
    }
    match result {
        AuthResult::Success { .. } => {
            app.login.mode = LoginMode::Login;
            app.login.error = None;
            app.login.notice = Some(SIGNUP_COMPLETE.to_string());
        }
        AuthResult::Failure { message } => {
            app.login.error = Some(message);
        }
    }
}
