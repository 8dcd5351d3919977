use crate::api::{ChatMode, HistoryEntry};

/// Fixed reply shown when a chat request fails for any reason.
pub const ERROR_REPLY: &str = "An error occurred, please retry.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

/// Transcript and input state for one interactive chat session.
///
/// At most one request is outstanding at a time: `loading` is set by
/// [`ChatSession::take_submission`] and cleared by [`ChatSession::resolve`],
/// and a submission attempt while loading is a no-op.
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// Cursor position in `input`, in characters.
    pub cursor: usize,
    pub mode: ChatMode,
    pub loading: bool,
}

fn now_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

impl ChatSession {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            cursor: 0,
            mode,
            loading: false,
        }
    }

    /// Accept the current input as a new user turn.
    ///
    /// Returns `None` without touching any state when the trimmed input is
    /// empty or a request is already in flight. Otherwise clears the input
    /// buffer (before the request outcome is known), appends the user
    /// message, sets `loading`, and returns the text to send.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.loading {
            return None;
        }
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.input.clear();
        self.cursor = 0;
        self.loading = true;
        self.messages.push(ChatMessage {
            role: Role::User,
            content: text.clone(),
            timestamp: now_timestamp(),
        });
        Some(text)
    }

    /// Record the outcome of the in-flight request. Appends the assistant
    /// reply on success and the fixed error bubble on failure; always clears
    /// `loading`.
    pub fn resolve(&mut self, result: anyhow::Result<String>) {
        let content = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("chat request failed: {}", e);
                ERROR_REPLY.to_string()
            }
        };
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content,
            timestamp: now_timestamp(),
        });
        self.loading = false;
    }

    /// Replace the transcript with entries loaded from the server.
    pub fn apply_history(&mut self, entries: Vec<HistoryEntry>) {
        self.messages = entries
            .into_iter()
            .map(|entry| match entry {
                HistoryEntry::User { text, timestamp } => ChatMessage {
                    role: Role::User,
                    content: text,
                    timestamp,
                },
                HistoryEntry::Assistant { text, timestamp } => ChatMessage {
                    role: Role::Assistant,
                    content: text,
                    timestamp,
                },
            })
            .collect();
    }

    /// Empty the transcript. Called only after the server confirmed the
    /// clear; a failed clear leaves the transcript untouched.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }
}
