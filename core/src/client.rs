//! `RelationClient`: typed accessors over the repository relation service.
//!
//! # Design
//! The client holds its base URL, its `ClientConfig`, and a shared
//! `Transport`; nothing changes after construction, so one instance can serve
//! any number of concurrent callers. Each accessor resolves to a target
//! (path plus optional query), runs it through `fetch_json`, and decodes the
//! body into the accessor's declared type.
//!
//! Request building (`build_request`, `relation_target`) and response
//! interpretation (`parse_*`) are pure, so they can be checked without a
//! network. Failures are logged once with `tracing::error!` and then returned
//! to the caller unchanged.

use std::fmt;
use std::sync::Arc;
use std::thread;

use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{Endpoint, Relation, RepoSize, ServiceInfo};

#[derive(Clone)]
pub struct RelationClient {
    base_url: String,
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for RelationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RelationClient {
    fn default() -> Self {
        Self::with_config(ClientConfig::default())
    }
}

impl RelationClient {
    /// Client for `base_url` with default settings. The URL is not validated
    /// here; a malformed one fails on the first request.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// GET request for `target`, a path with its query already encoded.
    pub fn build_request(&self, target: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{target}", self.base_url))
    }

    /// GET request for a relation query on `id`.
    pub fn build_related(&self, relation: Relation, id: &str) -> HttpRequest {
        self.build_request(&relation_target(relation, id))
    }

    // -----------------------------------------------------------------------
    // Fetch primitive
    // -----------------------------------------------------------------------

    /// GET `base_url + target` and return the body as an untyped JSON value.
    ///
    /// Non-2xx statuses and bodies that are not JSON become errors. On failure
    /// one `error!` event carrying the failure message is emitted before the
    /// error is returned.
    pub fn fetch_resource(&self, target: &str) -> Result<serde_json::Value, ApiError> {
        self.fetch_json(target)
    }

    /// Fetch `target` and decode the body as `T`. Every typed accessor goes
    /// through here.
    pub fn fetch_json<T: DeserializeOwned>(&self, target: &str) -> Result<T, ApiError> {
        let request = self.build_request(target);
        self.send(&request)
            .and_then(|response| decode(&response))
            .inspect_err(|err| report(&request, err))
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut attempt = 0;
        loop {
            debug!(method = request.method.as_str(), url = %request.url, attempt, "request");
            match self.transport.execute(request) {
                Ok(response) => return check_status(&request.url, response),
                Err(err) if err.is_transport() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff(attempt);
                    warn!(url = %request.url, attempt, error = %err, "retrying in {delay:?}");
                    thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Typed accessors
    // -----------------------------------------------------------------------

    /// `GET /`: service version and collector settings.
    pub fn root(&self) -> Result<ServiceInfo, ApiError> {
        self.fetch_json(&Endpoint::Root.path())
    }

    /// `GET /size`: node counts of the relation graph.
    pub fn size(&self) -> Result<RepoSize, ApiError> {
        self.fetch_json(&Endpoint::Size.path())
    }

    /// `GET /issue/list`: every known issue identifier.
    pub fn issues(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_json(&Endpoint::IssueList.path())
    }

    /// `GET /author/list`: every known author.
    pub fn authors(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_json(&Endpoint::AuthorList.path())
    }

    /// Entities of kind `relation.to_kind()` related to `id`, in the order
    /// the service returned them.
    pub fn related(&self, relation: Relation, id: &str) -> Result<Vec<String>, ApiError> {
        self.fetch_json(&relation_target(relation, id))
    }

    pub fn file_issues(&self, file: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::FileIssues, file)
    }

    pub fn file_commits(&self, file: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::FileCommits, file)
    }

    pub fn issue_files(&self, issue: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::IssueFiles, issue)
    }

    pub fn issue_commits(&self, issue: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::IssueCommits, issue)
    }

    pub fn commit_files(&self, commit: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::CommitFiles, commit)
    }

    pub fn commit_issues(&self, commit: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::CommitIssues, commit)
    }

    pub fn commit_authors(&self, commit: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::CommitAuthors, commit)
    }

    pub fn author_commits(&self, author: &str) -> Result<Vec<String>, ApiError> {
        self.related(Relation::AuthorCommits, author)
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    pub fn parse_ids(&self, url: &str, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        decode(&check_status(url, response)?)
    }

    pub fn parse_service_info(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<ServiceInfo, ApiError> {
        decode(&check_status(url, response)?)
    }

    pub fn parse_size(&self, url: &str, response: HttpResponse) -> Result<RepoSize, ApiError> {
        decode(&check_status(url, response)?)
    }
}

/// Path and query for a relation query: `{path}?{param}={id}` with `id`
/// form-urlencoded.
pub fn relation_target(relation: Relation, id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{}?{}={encoded}", relation.path(), relation.param())
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(url: &str, response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    match response.status {
        404 => Err(ApiError::NotFound {
            url: url.to_string(),
        }),
        status @ 500..=599 => Err(ApiError::Server {
            status,
            body: response.body,
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body,
        }),
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

fn report(request: &HttpRequest, err: &ApiError) {
    error!(url = %request.url, "request failed: {err}");
}
