//! Plain-text rendering of the thread view and its error boundary.

use chat_core::{ErrorBoundary, MessageType, Thread, ThreadView};
use chrono::{DateTime, Utc};

pub fn thread_view(view: &ThreadView, now: DateTime<Utc>) -> String {
    let mut out = header(&view.thread, now);
    out.push('\n');

    if view.messages.is_empty() {
        out.push_str("No messages yet. Start the conversation!\n");
        return out;
    }

    for message in &view.messages {
        let sender = match message.kind {
            MessageType::User => "You",
            MessageType::Bot => "Bot",
        };
        out.push_str(&format!(
            "[{}] {sender}: {}\n",
            message.created_at.format("%Y-%m-%d %H:%M"),
            message.content
        ));
        if message.is_editable() {
            out.push_str(&format!("    edit: {}\n", message.id));
        }
    }
    out
}

fn header(thread: &Thread, now: DateTime<Utc>) -> String {
    match thread.last_edited(now) {
        Some(edited) => format!("# {}  ({edited})\n", thread.title),
        None => format!("# {}\n", thread.title),
    }
}

pub fn thread_list(threads: &[Thread]) -> String {
    if threads.is_empty() {
        return "No threads yet.\n".to_string();
    }
    threads
        .iter()
        .map(|t| format!("{}  {}\n", t.id, t.title))
        .collect()
}

pub fn boundary(boundary: &ErrorBoundary) -> String {
    format!(
        "{}\n{}\n{}: {}\n",
        boundary.heading, boundary.detail, boundary.recovery_label, boundary.recovery_href
    )
}
