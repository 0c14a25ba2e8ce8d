//! Availability probing for the contract analysis service.
//!
//! `ensure_ready` walks `Checking -> Ready` when the health endpoint answers,
//! or `Checking -> Starting -> Ready | Error` when it does not. What happens
//! after `Starting` is decided by the [`ProbePolicy`].

use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::Config;

/// Belief about the analysis service. Re-derived on every check cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    Checking,
    Ready,
    Starting,
    Error,
}

impl ServiceStatus {
    /// User-facing status line.
    pub fn message(self) -> &'static str {
        match self {
            ServiceStatus::Checking => "Checking server status...",
            ServiceStatus::Starting => "Starting Contract Analysis Server...",
            ServiceStatus::Ready => "Contract Analysis Server is ready!",
            ServiceStatus::Error => "Error starting server. Please try again.",
        }
    }

    /// `Ready` and `Error` end a sequence; only a new `ensure_ready` leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, ServiceStatus::Ready | ServiceStatus::Error)
    }
}

/// What to do once the first probe fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePolicy {
    /// Assume the service is booting: wait `grace`, then report `Ready`
    /// without probing again.
    AssumeReady { grace: Duration },
    /// Re-probe up to `attempts` times with doubling backoff capped at
    /// `max_backoff`; report `Error` when every attempt fails.
    Reprobe {
        attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
    },
}

impl Default for ProbePolicy {
    fn default() -> Self {
        ProbePolicy::AssumeReady {
            grace: Duration::from_secs(2),
        }
    }
}

/// The probe could not be issued at all.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid health URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Polls the health endpoint and decides when the launch target is usable.
#[derive(Debug, Clone)]
pub struct ServiceProber {
    client: reqwest::Client,
    health_url: String,
    launch_url: String,
    policy: ProbePolicy,
}

impl ServiceProber {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        health_url: impl Into<String>,
        launch_url: impl Into<String>,
        policy: ProbePolicy,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build probe HTTP client")?;
        Ok(Self {
            client,
            health_url: health_url.into(),
            launch_url: launch_url.into(),
            policy,
        })
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.health_url(),
            config.launch_url(),
            config.probe_policy(),
            config.request_timeout(),
        )
    }

    /// Where the user is sent once the service is ready.
    pub fn launch_url(&self) -> &str {
        &self.launch_url
    }

    /// Issues a single health request.
    ///
    /// Returns `Ready` for a 2xx answer and `Starting` for anything else,
    /// meaning a start sequence is required.
    ///
    /// # Errors
    /// Returns an error when the request cannot be issued.
    pub async fn check_once(&self) -> Result<ServiceStatus, ProbeError> {
        let url = Url::parse(&self.health_url).map_err(|source| ProbeError::InvalidUrl {
            url: self.health_url.clone(),
            source,
        })?;

        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => Ok(ServiceStatus::Ready),
            Ok(response) => {
                tracing::debug!(status = %response.status(), "health check not ready");
                Ok(ServiceStatus::Starting)
            }
            Err(err) => {
                tracing::debug!(error = %err, "health check unreachable");
                Ok(ServiceStatus::Starting)
            }
        }
    }

    /// Runs the full readiness sequence, reporting each status to `on_status`.
    ///
    /// Returns the terminal status, or `None` if `cancel` fired first. Nothing
    /// is reported after cancellation.
    pub async fn ensure_ready<F>(
        &self,
        cancel: &CancellationToken,
        mut on_status: F,
    ) -> Option<ServiceStatus>
    where
        F: FnMut(ServiceStatus),
    {
        let mut emit = |status: ServiceStatus| {
            if !cancel.is_cancelled() {
                tracing::info!(?status, "service status");
                on_status(status);
            }
        };

        emit(ServiceStatus::Checking);
        let first = until_cancelled(cancel, self.check_once()).await?;
        match first {
            Ok(ServiceStatus::Ready) => {
                emit(ServiceStatus::Ready);
                return Some(ServiceStatus::Ready);
            }
            Ok(_) => emit(ServiceStatus::Starting),
            Err(err) => {
                tracing::warn!(error = %err, "cannot start readiness check");
                emit(ServiceStatus::Error);
                return Some(ServiceStatus::Error);
            }
        }

        let terminal = match self.policy {
            ProbePolicy::AssumeReady { grace } => {
                until_cancelled(cancel, tokio::time::sleep(grace)).await?;
                ServiceStatus::Ready
            }
            ProbePolicy::Reprobe {
                attempts,
                initial_backoff,
                max_backoff,
            } => self.reprobe(cancel, attempts, initial_backoff, max_backoff).await?,
        };

        emit(terminal);
        Some(terminal)
    }

    async fn reprobe(
        &self,
        cancel: &CancellationToken,
        attempts: u32,
        initial_backoff: Duration,
        max_backoff: Duration,
    ) -> Option<ServiceStatus> {
        let mut backoff = initial_backoff.min(max_backoff);
        for attempt in 1..=attempts {
            until_cancelled(cancel, tokio::time::sleep(backoff)).await?;
            match until_cancelled(cancel, self.check_once()).await? {
                Ok(ServiceStatus::Ready) => return Some(ServiceStatus::Ready),
                Ok(_) => tracing::debug!(attempt, attempts, "service still starting"),
                Err(err) => {
                    tracing::warn!(error = %err, "re-probe failed");
                    return Some(ServiceStatus::Error);
                }
            }
            backoff = (backoff * 2).min(max_backoff);
        }
        Some(ServiceStatus::Error)
    }
}

async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        () = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
