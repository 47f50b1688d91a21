//! Classification of endpoint replies.
//!
//! The body is parsed once as JSON and routed by which key it carries, so a
//! body can never count as both a reply and an error.

use crate::error::TransportError;
use crate::message::Message;
use crate::transport::HttpResponse;
use serde_json::Value;

/// What a single send produced, before it is turned into a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Reply(String),
    ServerError { error: String, details: Option<String> },
    NoData,
    Unparseable(String),
    Network(String),
    Encode(String),
}

impl Outcome {
    pub fn from_body(body: &[u8]) -> Self {
        if body.is_empty() {
            return Outcome::NoData;
        }

        if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
            if let Some(Value::String(response)) = map.get("response") {
                return Outcome::Reply(response.clone());
            }
            if let Some(Value::String(error)) = map.get("error") {
                match map.get("details") {
                    Some(Value::String(details)) => {
                        return Outcome::ServerError { error: error.clone(), details: Some(details.clone()) };
                    }
                    None | Some(Value::Null) => return Outcome::ServerError { error: error.clone(), details: None },
                    // Any other `details` type does not fit the error shape.
                    Some(_) => {}
                }
            }
        }

        Outcome::Unparseable(String::from_utf8_lossy(body).into_owned())
    }

    /// Maps the result of one transport call. Status codes are ignored; the
    /// body alone decides.
    pub fn from_transport(result: Result<HttpResponse, TransportError>) -> Self {
        match result {
            Ok(res) => Self::from_body(&res.body),
            Err(e) => Outcome::Network(e.to_string()),
        }
    }

    pub fn into_message(self) -> Message {
        match self {
            Outcome::Reply(text) => Message::assistant(text),
            Outcome::ServerError { error, details: Some(details) } => {
                Message::system(format!("Error: {} - {}", error, details))
            }
            Outcome::ServerError { error, details: None } => Message::system(format!("Error: {}", error)),
            Outcome::NoData => Message::system("No data received from server."),
            Outcome::Unparseable(raw) => Message::system(format!("Failed to parse response: {}", raw)),
            Outcome::Network(description) => Message::system(format!("Network error: {}", description)),
            Outcome::Encode(description) => Message::system(format!("Failed to encode payload: {}", description)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use std::time::Duration;

    #[test]
    fn response_key_is_a_reply() {
        let outcome = Outcome::from_body(br#"{"response":"Paris is lovely in spring."}"#);
        assert_eq!(outcome, Outcome::Reply("Paris is lovely in spring.".into()));
        let message = outcome.into_message();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "Paris is lovely in spring.");
    }

    #[test]
    fn error_with_details() {
        let message = Outcome::from_body(br#"{"error":"rate_limited","details":"try later"}"#).into_message();
        assert_eq!(message.role, Role::System);
        assert_eq!(message.content, "Error: rate_limited - try later");
    }

    #[test]
    fn error_without_details() {
        let message = Outcome::from_body(br#"{"error":"bad_request"}"#).into_message();
        assert_eq!(message.content, "Error: bad_request");

        let message = Outcome::from_body(br#"{"error":"bad_request","details":null}"#).into_message();
        assert_eq!(message.content, "Error: bad_request");
    }

    #[test]
    fn response_wins_over_error() {
        let outcome = Outcome::from_body(br#"{"error":"ignored","response":"Rome"}"#);
        assert_eq!(outcome, Outcome::Reply("Rome".into()));
    }

    #[test]
    fn error_with_non_string_details_is_unparseable() {
        let message = Outcome::from_body(br#"{"error":"x","details":5}"#).into_message();
        assert_eq!(message.role, Role::System);
        assert_eq!(message.content, r#"Failed to parse response: {"error":"x","details":5}"#);

        let outcome = Outcome::from_body(br#"{"error":"x","details":{"retry":true}}"#);
        assert!(matches!(outcome, Outcome::Unparseable(_)));
    }

    #[test]
    fn non_string_fields_are_unparseable() {
        let body = br#"{"response":42}"#;
        assert_eq!(Outcome::from_body(body), Outcome::Unparseable(r#"{"response":42}"#.into()));
        assert!(matches!(Outcome::from_body(br#"{"error":["x"]}"#), Outcome::Unparseable(_)));
        assert!(matches!(Outcome::from_body(br#"["response"]"#), Outcome::Unparseable(_)));
    }

    #[test]
    fn garbage_keeps_raw_text() {
        let message = Outcome::from_body(b"not json").into_message();
        assert_eq!(message.role, Role::System);
        assert_eq!(message.content, "Failed to parse response: not json");
    }

    #[test]
    fn empty_body_is_no_data() {
        assert_eq!(Outcome::from_body(b""), Outcome::NoData);
        assert_eq!(Outcome::NoData.into_message().content, "No data received from server.");
    }

    #[test]
    fn whitespace_body_keeps_raw_text() {
        assert_eq!(Outcome::from_body(b" \n"), Outcome::Unparseable(" \n".into()));
        assert_eq!(
            Outcome::from_body(b" \n").into_message().content,
            "Failed to parse response:  \n"
        );
    }

    #[test]
    fn error_status_is_classified_by_body() {
        let res = HttpResponse {
            status: 429,
            headers: Vec::new(),
            body: br#"{"error":"rate_limited","details":"try later"}"#.to_vec(),
        };
        assert_eq!(
            Outcome::from_transport(Ok(res)),
            Outcome::ServerError { error: "rate_limited".into(), details: Some("try later".into()) }
        );
    }

    #[test]
    fn transport_failure_is_network_error() {
        let outcome = Outcome::from_transport(Err(TransportError::Timeout(Duration::from_secs(30))));
        assert!(matches!(outcome, Outcome::Network(_)));
        let message = outcome.into_message();
        assert_eq!(message.role, Role::System);
        assert!(message.content.starts_with("Network error: "));
        assert!(message.content.contains("30 seconds"));
    }
}
