//! Inbox channel types.
//!
//! Handlers send `UiEvent`s here; the runtime drains them and feeds the reducer.

use tokio::sync::mpsc;

use crate::events::UiEvent;

pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;
