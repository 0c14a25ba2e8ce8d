//! Workflow orchestration for clausewise.
//!
//! Elm-style split: `update` is a pure reducer over [`AppState`] that returns
//! [`UiEffect`]s, and [`FlowRuntime`] executes them (network calls, session
//! writes, redirects) and feeds the results back as [`UiEvent`]s.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod navigator;
pub mod runtime;
pub mod state;
pub mod update;
pub mod view;

pub use effects::UiEffect;
pub use events::UiEvent;
pub use navigator::{BrowserNavigator, Navigator};
pub use runtime::{FlowRuntime, Services};
pub use state::{AppState, LoginMode, WorkflowState};
pub use update::update;
pub use view::{View, active_view};
