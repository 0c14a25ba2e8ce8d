//! Core services for clausewise: session persistence, authentication,
//! service probing and the scripted assistant.

pub mod assistant;
pub mod auth;
pub mod config;
pub mod logging;
pub mod probe;
pub mod session;

pub use assistant::{Attachment, ChatMessage, ScriptedAssistant, Sender};
pub use auth::{AuthGateway, AuthResult};
pub use probe::{ProbePolicy, ServiceProber, ServiceStatus};
pub use session::{FileSessionStore, Identity, MemorySessionStore, SessionStore};
