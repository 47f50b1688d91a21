use crate::error::TransportError;
use reqwest::blocking::Client;
use reqwest::{Method, Url};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// A JSON POST, the only shape the assistant endpoint accepts.
    pub fn post_json(url: Url, body: Vec<u8>, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            url,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
            timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Performs one HTTP exchange. Any status code counts as a response; only
/// failing to get a body back is an error.
pub trait Transport: Send + Sync {
    fn request(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn request(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeout = request.timeout;
        let mut builder = self
            .client
            .request(request.method, request.url)
            .timeout(timeout)
            .body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let res = builder.send().map_err(|e| TransportError::from_reqwest(e, timeout))?;

        let status = res.status().as_u16();
        let headers = res
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = res.bytes().map_err(|e| TransportError::from_reqwest(e, timeout))?.to_vec();

        Ok(HttpResponse { status, headers, body })
    }
}
