//! Effect handlers for the workflow runtime.
//!
//! Handlers are async functions that perform the I/O for one effect and
//! return the resulting `UiEvent`. They never touch `AppState`; the runtime
//! spawns them and forwards their result to the inbox.

use clausewise_core::{AuthGateway, AuthResult, ScriptedAssistant, ServiceProber};
use tokio_util::sync::CancellationToken;

use super::inbox::UiEventSender;
use crate::common::TaskId;
use crate::events::UiEvent;

pub async fn login(auth: AuthGateway, email: String, password: String) -> UiEvent {
    UiEvent::LoginFinished(auth.login(&email, &password).await)
}

/// Registration is abandoned when the modal closes; it has no local side effects.
pub async fn signup(
    auth: AuthGateway,
    name: String,
    email: String,
    password: String,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    tokio::select! {
        result = auth.signup(&name, &email, &password) => UiEvent::SignupFinished(result),
        () = cancel.cancelled() => {
            tracing::debug!("signup cancelled");
            UiEvent::SignupFinished(AuthResult::Failure {
                message: "Signup cancelled".to_string(),
            })
        }
    }
}

/// Runs the readiness sequence, streaming each status to the inbox as it is
/// reached.
pub async fn probe(
    prober: ServiceProber,
    task: TaskId,
    tx: UiEventSender,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    let terminal = prober
        .ensure_ready(&cancel, |status| {
            let _ = tx.send(UiEvent::ProbeStatus { task, status });
        })
        .await;
    UiEvent::ProbeFinished(terminal)
}

pub async fn chat_reply(
    assistant: ScriptedAssistant,
    has_attachment: bool,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    tokio::select! {
        reply = assistant.reply(has_attachment) => UiEvent::ChatReply(Some(reply)),
        () = cancel.cancelled() => UiEvent::ChatReply(None),
    }
}
