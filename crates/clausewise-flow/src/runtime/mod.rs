//! Workflow runtime: owns the state, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Spawned handlers send `UiEvent`s to `inbox_tx`
//! - The caller drives the runtime with [`FlowRuntime::pump`] or
//!   [`FlowRuntime::drain`], which feed inbox events to the reducer
//!
//! Must be used from within a tokio runtime.

mod handlers;
mod inbox;

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use clausewise_core::config::Config;
use clausewise_core::{AuthGateway, ScriptedAssistant, ServiceProber, SessionStore};
use inbox::{UiEventReceiver, UiEventSender};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::navigator::Navigator;
use crate::state::AppState;
use crate::update;

/// Everything the runtime talks to.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthGateway,
    pub prober: ServiceProber,
    pub assistant: ScriptedAssistant,
    pub session: Arc<dyn SessionStore>,
    pub navigator: Arc<dyn Navigator>,
}

impl Services {
    /// Wires the gateway and prober from configuration around a shared session store.
    ///
    /// # Errors
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(
        config: &Config,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Ok(Self {
            auth: AuthGateway::from_config(config, Arc::clone(&session))?,
            prober: ServiceProber::from_config(config)?,
            assistant: ScriptedAssistant::new(config.reply_delay()),
            session,
            navigator,
        })
    }
}

pub struct FlowRuntime {
    /// Application state. Only the reducer mutates it.
    pub state: AppState,
    services: Services,
    /// Inbox sender - handlers send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - drained by `pump`/`drain`.
    inbox_rx: UiEventReceiver,
}

impl FlowRuntime {
    /// Creates a runtime whose identity mirror is loaded from the session store.
    pub fn new(services: Services) -> Self {
        let identity = services.session.get();
        if let Some(identity) = &identity {
            tracing::debug!(email = %identity.email, "restored session");
        }
        let state = AppState::new(identity, services.prober.launch_url());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state,
            services,
            inbox_tx,
            inbox_rx,
        }
    }

    /// Feeds one event through the reducer and executes the resulting effects.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Dispatches every event already in the inbox without waiting.
    ///
    /// Returns the number of events processed.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.inbox_rx.try_recv() {
            self.dispatch(event);
            count += 1;
        }
        count
    }

    /// Waits for the next inbox event and dispatches it.
    pub async fn pump(&mut self) {
        // The runtime holds a sender, so the channel never closes.
        if let Some(event) = self.inbox_rx.recv().await {
            self.dispatch(event);
        }
    }

    /// Pumps events until `done` holds for the state.
    pub async fn pump_until<P>(&mut self, mut done: P)
    where
        P: FnMut(&AppState) -> bool,
    {
        while !done(&self.state) {
            self.pump().await;
        }
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }

            UiEffect::CancelTask { kind, token } => {
                if let Some(cancel) = token {
                    tracing::debug!(?kind, "cancelling task");
                    cancel.cancel();
                }
            }

            // Login is not cancelable: the gateway may already have written
            // the session, and the reducer resyncs storage once it reports back.
            UiEffect::SpawnLogin {
                task,
                email,
                password,
            } => {
                let auth = self.services.auth.clone();
                self.spawn_task(TaskKind::Login, task, false, move |_| {
                    handlers::login(auth, email, password)
                });
            }
            UiEffect::SpawnSignup {
                task,
                name,
                email,
                password,
            } => {
                let auth = self.services.auth.clone();
                self.spawn_task(TaskKind::Signup, task, true, move |cancel| {
                    handlers::signup(auth, name, email, password, cancel)
                });
            }

            UiEffect::StartProbe { task } => {
                let prober = self.services.prober.clone();
                let tx = self.inbox_tx.clone();
                self.spawn_task(TaskKind::Probe, task, true, move |cancel| {
                    handlers::probe(prober, task, tx, cancel)
                });
            }

            UiEffect::ScheduleChatReply { task, attachment } => {
                let assistant = self.services.assistant;
                let has_attachment = attachment.is_some();
                self.spawn_task(TaskKind::ChatReply, task, true, move |cancel| {
                    handlers::chat_reply(assistant, has_attachment, cancel)
                });
            }

            UiEffect::Redirect { url } => {
                let result = self
                    .services
                    .navigator
                    .navigate(&url)
                    .map_err(|e| format!("{e:#}"));
                if let Err(error) = &result {
                    tracing::warn!(%url, %error, "redirect failed");
                }
                self.dispatch(UiEvent::Redirected(result));
            }

            UiEffect::SyncSession { identity } => {
                let result = match &identity {
                    Some(identity) => self.services.session.set(identity),
                    None => self.services.session.clear(),
                }
                .map_err(|e| format!("{e:#}"));
                if let Err(error) = &result {
                    tracing::warn!(%error, "failed to update session");
                }
                self.dispatch(UiEvent::SessionSynced(result));
            }
        }
    }
}
