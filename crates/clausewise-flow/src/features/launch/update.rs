use clausewise_core::ServiceStatus;

use crate::common::TaskId;
use crate::effects::UiEffect;
use crate::state::{AppState, LaunchState, WorkflowState};

/// Starts a readiness probe unless one is already running.
pub fn start_probe(app: &mut AppState) -> Vec<UiEffect> {
    if app.tasks.probe.is_running() {
        tracing::debug!("probe already running, ignoring");
        return vec![];
    }
    app.launch = LaunchState::default();
    let task = app.task_seq.next_id();
    app.tasks.probe.begin(task);
    vec![UiEffect::StartProbe { task }]
}

/// Applies a status update. Updates from a probe that is no longer active
/// (cancelled, superseded) are dropped.
pub fn handle_probe_status(app: &mut AppState, task: TaskId, status: ServiceStatus) {
    if !app.tasks.probe.is_active(task) || app.workflow != WorkflowState::ContractAnalysisLaunch {
        tracing::debug!(?status, "dropping late probe status");
        return;
    }
    app.launch.status = status;
    app.launch.launch_url = (status == ServiceStatus::Ready).then(|| app.launch_target().to_string());
}

pub fn launch(app: &mut AppState) -> Vec<UiEffect> {
    if app.launch.status != ServiceStatus::Ready || app.launch.launching {
        return vec![];
    }
    let Some(url) = app.launch.launch_url.clone() else {
        return vec![];
    };
    app.launch.launching = true;
    app.launch.error = None;
    vec![UiEffect::Redirect { url }]
}

pub fn handle_redirected(app: &mut AppState, result: Result<(), String>) {
    app.launch.launching = false;
    if let Err(message) = result {
        app.launch.error = Some(message);
    }
}
