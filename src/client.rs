//! The conversation client: one transcript, one pending input buffer and at
//! most one request in flight.
//!
//! Requests run on a worker thread. The worker never touches the transcript;
//! it hands its [`Outcome`] back over a channel and the owner applies it with
//! [`ConversationClient::poll`] or [`ConversationClient::wait`].

use crate::error::SendError;
use crate::message::{Message, Transcript};
use crate::reply::Outcome;
use crate::transport::{HttpRequest, Transport};
use reqwest::Url;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct ConversationClient {
    endpoint: Url,
    timeout: Duration,
    transport: Arc<dyn Transport>,
    transcript: Transcript,
    input: String,
    // Some while a request is in flight; this is the busy flag.
    pending: Option<Receiver<Outcome>>,
}

impl ConversationClient {
    pub fn new(endpoint: Url, timeout: Duration, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint,
            timeout,
            transport,
            transcript: Transcript::new(),
            input: String::new(),
            pending: None,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether [`submit`](Self::submit) would currently be accepted.
    pub fn can_send(&self) -> bool {
        !self.is_busy() && !self.input.trim().is_empty()
    }

    /// Sends the pending input buffer.
    pub fn submit(&mut self) -> Result<(), SendError> {
        let text = self.input.clone();
        self.send_message(&text)
    }

    /// Appends `text` (trimmed) as a user message and posts the whole
    /// transcript to the endpoint.
    ///
    /// Rejected sends change nothing. An accepted send adds the user message
    /// right away and exactly one outcome message once the request resolves.
    pub fn send_message(&mut self, text: &str) -> Result<(), SendError> {
        if self.is_busy() {
            tracing::debug!("send rejected, request already in flight");
            return Err(SendError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyInput);
        }

        self.transcript.push(Message::user(text));
        self.input.clear();

        let body = match self.transcript.to_payload() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode payload");
                self.transcript.push(Outcome::Encode(e.to_string()).into_message());
                return Ok(());
            }
        };
        tracing::debug!(payload = %String::from_utf8_lossy(&body), "request payload");

        let request = HttpRequest::post_json(self.endpoint.clone(), body, self.timeout);
        let transport = Arc::clone(&self.transport);
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("tourai-request".to_string())
            .spawn(move || {
                let outcome = execute(transport.as_ref(), request);
                // The client may have been dropped; nothing left to report to.
                let _ = tx.send(outcome);
            });

        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => {
                tracing::warn!(error = %e, "failed to start request worker");
                self.apply(Outcome::Network(e.to_string()));
            }
        }
        Ok(())
    }

    /// Applies the in-flight result if it has arrived. Returns the message
    /// that was appended.
    pub fn poll(&mut self) -> Option<&Message> {
        let outcome = match self.pending.as_ref()?.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => worker_lost(),
        };
        self.apply(outcome);
        self.transcript.last()
    }

    /// Blocks until the in-flight request resolves and applies its result.
    /// Returns `None` straight away when nothing is in flight.
    pub fn wait(&mut self) -> Option<&Message> {
        let outcome = self.pending.as_ref()?.recv().unwrap_or_else(|_| worker_lost());
        self.apply(outcome);
        self.transcript.last()
    }

    fn apply(&mut self, outcome: Outcome) {
        self.transcript.push(outcome.into_message());
        self.pending = None;
    }
}

fn execute(transport: &dyn Transport, request: HttpRequest) -> Outcome {
    let url = request.url.clone();
    let result = transport.request(request);
    match &result {
        Ok(res) => {
            tracing::debug!(status = res.status, headers = ?res.headers, "response received");
            tracing::debug!(body = %String::from_utf8_lossy(&res.body), "raw response");
        }
        Err(e) => tracing::warn!(%url, error = %e, "request failed"),
    }
    Outcome::from_transport(result)
}

fn worker_lost() -> Outcome {
    tracing::warn!("request worker exited without a result");
    Outcome::Network("the request was interrupted".to_string())
}
