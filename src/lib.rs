pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod reply;
pub mod transport;

pub use client::ConversationClient;
pub use config::Config;
pub use error::{ConfigError, SendError, TransportError};
pub use message::{Message, Role, Transcript};
pub use reply::Outcome;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
