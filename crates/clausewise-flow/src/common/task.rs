use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    Signup,
    Probe,
    ChatReply,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Login,
        TaskKind::Signup,
        TaskKind::Probe,
        TaskKind::ChatReply,
    ];
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
///
/// A task is active from the moment the reducer emits its effect, so a second
/// request for the same kind can be refused before the runtime has spawned it.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin(&mut self, id: TaskId) {
        self.active = Some(id);
        self.cancel = None;
    }

    /// Records the cancel token. Returns false if `started` is not the active task.
    pub fn on_started(&mut self, started: &TaskStarted) -> bool {
        if self.active != Some(started.id) {
            return false;
        }
        self.cancel = started.cancel.clone();
        true
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.active == Some(id)
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    /// Forgets the task and hands back its cancel token, if one was recorded.
    pub fn take_cancel(&mut self) -> Option<CancellationToken> {
        let token = self.cancel.take();
        self.active = None;
        token
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub login: TaskState,
    pub signup: TaskState,
    pub probe: TaskState,
    pub chat_reply: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Login => &self.login,
            TaskKind::Signup => &self.signup,
            TaskKind::Probe => &self.probe,
            TaskKind::ChatReply => &self.chat_reply,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Login => &mut self.login,
            TaskKind::Signup => &mut self.signup,
            TaskKind::Probe => &mut self.probe,
            TaskKind::ChatReply => &mut self.chat_reply,
        }
    }

    pub fn is_any_running(&self) -> bool {
        TaskKind::ALL
            .iter()
            .any(|kind| self.state(*kind).is_running())
    }
}
