use crate::api::{ChatApi, ChatMode};
use crate::session::ChatSession;

/// TUI application state: the chat session plus view state the renderer and
/// event loop share.
pub struct App {
    pub should_quit: bool,
    pub session: ChatSession,
    pub api: ChatApi,

    // Transcript view state
    pub scroll: u16,
    /// Inner height of the transcript area, updated during render.
    pub chat_height: u16,
    /// Inner width of the transcript area, updated during render.
    pub chat_width: u16,

    /// 0-2 for the "Thinking..." ellipsis animation.
    pub animation_frame: u8,

    /// The one in-flight chat request, if any. Doubles as the single-flight
    /// guard: no new submission is started while this is `Some`.
    pub pending: Option<tokio::task::JoinHandle<anyhow::Result<String>>>,
}

impl App {
    pub fn new(api: ChatApi, mode: ChatMode) -> Self {
        Self {
            should_quit: false,
            session: ChatSession::new(mode),
            api,
            scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            pending: None,
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    /// Scroll the transcript so the newest message (or the "Thinking..."
    /// indicator) is visible. Recomputes wrapped line counts from the chat
    /// area dimensions stored during the last render.
    pub fn scroll_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in &self.session.messages {
            total_lines = total_lines.saturating_add(1); // Role line ("You:" or "AI:")
            for line in msg.content.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                let wrapped = if char_count == 0 {
                    1 // Empty line still takes one line
                } else {
                    u16::try_from((char_count / wrap_width) + 1).unwrap_or(u16::MAX)
                };
                total_lines = total_lines.saturating_add(wrapped);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.session.loading {
            total_lines = total_lines.saturating_add(2); // "AI:" + "Thinking..."
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.scroll = total_lines.saturating_sub(visible_height);
        } else {
            self.scroll = 0;
        }
    }

    /// Resolve the in-flight request if it has finished. Runs on every loop
    /// iteration; a panicked task resolves through the error path so
    /// `loading` is always cleared.
    pub async fn poll_pending(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .map(|task| task.is_finished())
            .unwrap_or(false);
        if !finished {
            return;
        }

        if let Some(task) = self.pending.take() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(anyhow::anyhow!("chat task failed: {}", e)),
            };
            self.session.resolve(result);
            self.scroll_to_bottom();
        }
    }
}
