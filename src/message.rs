use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a message came from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Status and error notes produced by the client itself.
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }
}

/// Ordered chat history for one session.
///
/// Messages can only be appended. Insertion order is both the display order
/// and the history sent to the server.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Encodes the whole history as `{"messages": [{"role", "content"}, ...]}`.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&ChatRequest { messages: &self.messages })
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

/// Request body posted to the assistant endpoint.
#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub messages: &'a [Message],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
        assert_eq!(Role::System.to_string(), "system");
    }

    #[test]
    fn payload_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("Where should I go in May?"));
        transcript.push(Message::assistant("Lisbon."));
        transcript.push(Message::system("Network error: timed out"));
        transcript.push(Message::user("Why?"));

        let payload = transcript.to_payload().unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            concat!(
                r#"{"messages":["#,
                r#"{"role":"user","content":"Where should I go in May?"},"#,
                r#"{"role":"assistant","content":"Lisbon."},"#,
                r#"{"role":"system","content":"Network error: timed out"},"#,
                r#"{"role":"user","content":"Why?"}"#,
                r#"]}"#
            )
        );
    }

    #[test]
    fn payload_is_stable_across_calls() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("a \"quoted\" line\nand a newline"));
        transcript.push(Message::assistant("ok"));
        assert_eq!(transcript.to_payload().unwrap(), transcript.to_payload().unwrap());
    }

    #[test]
    fn empty_transcript_payload() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.to_payload().unwrap(), br#"{"messages":[]}"#);
    }
}
