use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to get any body back from the endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("The request timed out after {} seconds.", .0.as_secs())]
    Timeout(Duration),

    #[error("Could not connect to the server: {0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),
}

impl TransportError {
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Connect(root_cause(&err))
        } else {
            TransportError::Request(root_cause(&err))
        }
    }
}

// reqwest's top-level message is just "error sending request for url"; the
// useful part sits at the bottom of the source chain.
fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

/// Why a send was not accepted. A rejected send leaves the client untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("nothing to send")]
    EmptyInput,

    #[error("a request is already in flight")]
    Busy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("timeout must be at least one second")]
    InvalidTimeout,

    #[error("failed to access config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
