use clausewise_core::{Attachment, ChatMessage};

use crate::effects::UiEffect;
use crate::state::AppState;

/// Appends the user's message and schedules the assistant reply.
///
/// Blank input without an attachment is ignored, as is anything sent while a
/// reply is still pending.
pub fn send(app: &mut AppState, text: &str, attachment: Option<Attachment>) -> Vec<UiEffect> {
    if app.awaiting_reply() {
        return vec![];
    }
    let Some(message) = ChatMessage::from_user(text, attachment.as_ref()) else {
        return vec![];
    };

    app.chat.messages.push(message);
    let task = app.task_seq.next_id();
    app.tasks.chat_reply.begin(task);
    vec![UiEffect::ScheduleChatReply { task, attachment }]
}

pub fn handle_reply(app: &mut AppState, reply: Option<ChatMessage>) {
    if let Some(reply) = reply
        && app.workflow.hosts_chat()
    {
        app.chat.messages.push(reply);
    }
}
