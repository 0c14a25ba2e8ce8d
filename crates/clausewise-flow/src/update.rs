//! Workflow reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! Intents that do not apply to the current screen are ignored, which is what
//! keeps transitions from skipping screens (there is no way from `Landing` to
//! `Dashboard` except through login and service selection).

use clausewise_core::ServiceStatus;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{auth, chat, launch};
use crate::state::{AppState, ChatState, LaunchState, LoginForm, WorkflowState};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    use WorkflowState as W;

    match (app.workflow, event) {
        (W::Landing, UiEvent::GetStarted) => {
            if app.is_authenticated() {
                app.workflow = W::ServiceSelection;
            } else {
                app.login = LoginForm::default();
                app.workflow = W::LoginModal;
            }
            vec![]
        }

        // ====================================================================
        // Login modal
        // ====================================================================
        (W::LoginModal, UiEvent::ToggleSignupMode) => {
            if !app.auth_pending() {
                auth::toggle_mode(&mut app.login);
            }
            vec![]
        }
        (W::LoginModal, UiEvent::SubmitLogin { email, password }) => {
            auth::submit_login(app, email, password)
        }
        (
            W::LoginModal,
            UiEvent::SubmitSignup {
                name,
                email,
                password,
            },
        ) => auth::submit_signup(app, name, email, password),
        (W::LoginModal, UiEvent::CancelLogin) => {
            // An in-flight login keeps running: its result is adopted so the
            // mirror stays in sync with the session it persisted.
            let effects: Vec<UiEffect> = cancel(app, TaskKind::Signup).into_iter().collect();
            app.login = LoginForm::default();
            app.workflow = W::Landing;
            effects
        }

        // ====================================================================
        // Service selection
        // ====================================================================
        (W::ServiceSelection, UiEvent::PickContractAnalysis) => {
            app.workflow = W::ContractAnalysisLaunch;
            launch::start_probe(app)
        }
        (W::ServiceSelection, UiEvent::PickEducation) => {
            if app.is_authenticated() {
                // The dashboard supersedes the chat widget for signed-in users.
                app.chat = ChatState::default();
                app.workflow = W::Dashboard;
            } else {
                tracing::warn!("education chat requested without identity");
                app.workflow = W::Landing;
            }
            vec![]
        }
        (W::ServiceSelection, UiEvent::CancelServiceSelection) => {
            app.workflow = W::Landing;
            vec![]
        }

        // ====================================================================
        // Contract analysis launcher
        // ====================================================================
        (W::ContractAnalysisLaunch, UiEvent::Back) => {
            let effects: Vec<UiEffect> = cancel(app, TaskKind::Probe).into_iter().collect();
            app.launch = LaunchState::default();
            app.workflow = W::ServiceSelection;
            effects
        }
        (W::ContractAnalysisLaunch, UiEvent::RetryProbe) => {
            if app.launch.status == ServiceStatus::Error {
                launch::start_probe(app)
            } else {
                vec![]
            }
        }
        (W::ContractAnalysisLaunch, UiEvent::LaunchApp) => launch::launch(app),

        // ====================================================================
        // Chat
        // ====================================================================
        (workflow, UiEvent::Back) if workflow.hosts_chat() => {
            let effects: Vec<UiEffect> = cancel(app, TaskKind::ChatReply).into_iter().collect();
            app.workflow = W::ServiceSelection;
            effects
        }
        (workflow, UiEvent::CloseChat) if workflow.hosts_chat() => {
            let effects: Vec<UiEffect> = cancel(app, TaskKind::ChatReply).into_iter().collect();
            app.workflow = W::Landing;
            effects
        }
        (workflow, UiEvent::SendChat { text, attachment }) if workflow.hosts_chat() => {
            chat::send(app, &text, attachment)
        }

        // ====================================================================
        // Global
        // ====================================================================
        (_, UiEvent::Logout) => logout(app),
        (_, UiEvent::Quit) => {
            let mut effects = cancel_all(app);
            effects.push(UiEffect::Quit);
            effects
        }

        // ====================================================================
        // Task lifecycle
        // ====================================================================
        (_, UiEvent::TaskStarted { kind, started }) => {
            if app.tasks.state_mut(kind).on_started(&started) {
                vec![]
            } else {
                // Cancelled or superseded before the runtime reported it.
                vec![UiEffect::CancelTask {
                    kind,
                    token: started.cancel,
                }]
            }
        }
        (_, UiEvent::TaskCompleted { kind, completed }) => {
            let mut effects = if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, "dropping result of inactive task");
                vec![]
            };
            // Every login, current or abandoned, may have written the session
            // before reporting back. Once none is left in flight, storage is
            // lined up with the identity the app actually holds.
            if kind == TaskKind::Login && !app.tasks.login.is_running() {
                effects.push(UiEffect::SyncSession {
                    identity: app.identity.clone(),
                });
            }
            effects
        }

        // ====================================================================
        // Async results
        // ====================================================================
        (_, UiEvent::LoginFinished(result)) => {
            auth::handle_login_result(app, result);
            vec![]
        }
        (_, UiEvent::SignupFinished(result)) => {
            auth::handle_signup_result(app, result);
            vec![]
        }
        (_, UiEvent::ProbeStatus { task, status }) => {
            launch::handle_probe_status(app, task, status);
            vec![]
        }
        (_, UiEvent::ProbeFinished(terminal)) => {
            tracing::debug!(?terminal, "probe finished");
            vec![]
        }
        (_, UiEvent::ChatReply(reply)) => {
            chat::handle_reply(app, reply);
            vec![]
        }
        (_, UiEvent::Redirected(result)) => {
            launch::handle_redirected(app, result);
            vec![]
        }
        (_, UiEvent::SessionSynced(result)) => {
            app.session_error = result.err();
            vec![]
        }

        (workflow, event) => {
            tracing::debug!(?workflow, ?event, "ignoring event for current screen");
            vec![]
        }
    }
}

/// Unconditional return to `Landing`: clears the identity, every screen's
/// state and every in-flight task.
fn logout(app: &mut AppState) -> Vec<UiEffect> {
    let mut effects = cancel_all(app);
    if let Some(identity) = app.identity.take() {
        tracing::info!(email = %identity.email, "logged out");
    }
    app.login = LoginForm::default();
    app.launch = LaunchState::default();
    app.chat = ChatState::default();
    app.session_error = None;
    app.workflow = WorkflowState::Landing;
    effects.push(UiEffect::SyncSession { identity: None });
    effects
}

fn cancel(app: &mut AppState, kind: TaskKind) -> Option<UiEffect> {
    let state = app.tasks.state_mut(kind);
    if !state.is_running() {
        return None;
    }
    Some(UiEffect::CancelTask {
        kind,
        token: state.take_cancel(),
    })
}

fn cancel_all(app: &mut AppState) -> Vec<UiEffect> {
    TaskKind::ALL
        .iter()
        .filter_map(|kind| cancel(app, *kind))
        .collect()
}
