//! The network seam: execute one `HttpRequest`, return one `HttpResponse`.
//!
//! A transport reports what the wire said. Status interpretation, retries,
//! and logging belong to `RelationClient`.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok(HttpResponse)` and
/// reserve `Err` for failures that produced no response.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    max_body_bytes: u64,
}

impl UreqTransport {
    /// Agent honouring `config.timeout()` and `config.max_body_bytes`.
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self {
            agent,
            max_body_bytes: config.max_body_bytes,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.agent.get(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(from_ureq)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let success = (200..300).contains(&status);

        // The status line has arrived, so nothing below is a transport failure.
        let body = match response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
        {
            Ok(bytes) if success => String::from_utf8(bytes)
                .map_err(|e| ApiError::MalformedResponse(e.to_string()))?,
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if success => return Err(ApiError::MalformedResponse(e.to_string())),
            Err(_) => String::new(),
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn from_ureq(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout,
        ureq::Error::BadUri(msg) => ApiError::InvalidUrl(msg),
        ureq::Error::Http(e) => ApiError::InvalidUrl(e.to_string()),
        other => ApiError::Transport(other.to_string()),
    }
}
