use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Conversation mode. Single-turn requests carry no server-side context;
/// multi-turn requests continue the stored conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Single,
    Multi,
}

impl ChatMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ChatMode::Single => "/api/single_chat",
            ChatMode::Multi => "/api/multi_chat",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Single => "single",
            ChatMode::Multi => "multi",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "single" => Some(ChatMode::Single),
            "multi" => Some(ChatMode::Multi),
            _ => None,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            ChatMode::Single => ChatMode::Multi,
            ChatMode::Multi => ChatMode::Single,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct AskAnswer {
    result: String,
}

#[derive(Deserialize)]
struct AskResponse {
    answer: AskAnswer,
}

#[derive(Deserialize)]
struct RawHistoryEntry {
    user: Option<String>,
    assistant: Option<String>,
    timestamp: String,
}

#[derive(Deserialize)]
struct HistoryResponse {
    history: Vec<RawHistoryEntry>,
}

/// One stored conversation turn. Exactly one side is present per entry;
/// the wire format (`{user?, assistant?, timestamp}`) is validated on read
/// and an entry claiming both or neither side is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    User { text: String, timestamp: String },
    Assistant { text: String, timestamp: String },
}

fn tag_entry(raw: RawHistoryEntry) -> Result<HistoryEntry> {
    match (raw.user, raw.assistant) {
        (Some(text), None) => Ok(HistoryEntry::User {
            text,
            timestamp: raw.timestamp,
        }),
        (None, Some(text)) => Ok(HistoryEntry::Assistant {
            text,
            timestamp: raw.timestamp,
        }),
        (Some(_), Some(_)) => Err(anyhow!(
            "malformed history entry at {}: both user and assistant set",
            raw.timestamp
        )),
        (None, None) => Err(anyhow!(
            "malformed history entry at {}: neither user nor assistant set",
            raw.timestamp
        )),
    }
}

/// HTTP client for the chat backend. Covers the transcript endpoints
/// (`/api/single_chat`, `/api/multi_chat`, `/api/clear`, `/api/history`)
/// and the one-shot `/ask` endpoint.
#[derive(Clone)]
pub struct ChatApi {
    client: Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat message and return the assistant reply.
    pub async fn send(&self, mode: ChatMode, message: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, mode.endpoint());

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "chat request failed with status: {}. Is the backend running at {}?",
                response.status(),
                self.base_url
            ));
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.response)
    }

    /// One-shot question against `/ask`; returns `answer.result`.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let url = format!("{}/ask", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "ask request failed with status: {}",
                response.status()
            ));
        }

        let body: AskResponse = response.json().await?;
        Ok(body.answer.result)
    }

    /// Clear the server-side conversation history.
    pub async fn clear(&self) -> Result<()> {
        let url = format!("{}/api/clear", self.base_url);

        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "clear request failed with status: {}",
                response.status()
            ));
        }

        Ok(())
    }

    /// Fetch the stored conversation history, oldest first.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let url = format!("{}/api/history", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "history request failed with status: {}",
                response.status()
            ));
        }

        let body: HistoryResponse = response.json().await?;
        body.history.into_iter().map(tag_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_endpoint() {
        assert_eq!(ChatMode::Single.endpoint(), "/api/single_chat");
        assert_eq!(ChatMode::Multi.endpoint(), "/api/multi_chat");
    }

    #[test]
    fn mode_round_trips_through_str() {
        assert_eq!(ChatMode::from_str("single"), Some(ChatMode::Single));
        assert_eq!(ChatMode::from_str("multi"), Some(ChatMode::Multi));
        assert_eq!(ChatMode::from_str("bogus"), None);
        assert_eq!(ChatMode::Single.toggle(), ChatMode::Multi);
        assert_eq!(ChatMode::Multi.toggle(), ChatMode::Single);
    }

    #[test]
    fn history_entries_are_tagged_by_role() {
        let body: HistoryResponse = serde_json::from_str(
            r#"{"history": [
                {"user": "hi", "timestamp": "t1"},
                {"assistant": "hello", "timestamp": "t2"}
            ]}"#,
        )
        .unwrap();

        let entries: Vec<HistoryEntry> = body
            .history
            .into_iter()
            .map(tag_entry)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            entries,
            vec![
                HistoryEntry::User {
                    text: "hi".to_string(),
                    timestamp: "t1".to_string()
                },
                HistoryEntry::Assistant {
                    text: "hello".to_string(),
                    timestamp: "t2".to_string()
                },
            ]
        );
    }

    #[test]
    fn history_entry_with_both_sides_is_rejected() {
        let raw = RawHistoryEntry {
            user: Some("hi".to_string()),
            assistant: Some("hello".to_string()),
            timestamp: "t1".to_string(),
        };
        assert!(tag_entry(raw).is_err());
    }

    #[test]
    fn history_entry_with_neither_side_is_rejected() {
        let raw = RawHistoryEntry {
            user: None,
            assistant: None,
            timestamp: "t1".to_string(),
        };
        assert!(tag_entry(raw).is_err());
    }

    #[test]
    fn chat_response_parses_wire_shape() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"response": "hello", "type": "single"}"#).unwrap();
        assert_eq!(body.response, "hello");
    }

    #[test]
    fn ask_response_parses_nested_result() {
        let body: AskResponse =
            serde_json::from_str(r#"{"answer": {"result": "X is Y"}}"#).unwrap();
        assert_eq!(body.answer.result, "X is Y");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ChatApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
    }
}
