//! Client for the repository relation service.
//!
//! # Overview
//! The service mines a repository's history and answers which files, issues,
//! commits, and authors are related to each other. `RelationClient` turns
//! typed calls such as `issue_files("ISSUE123")` into HTTP GETs against the
//! service's fixed endpoints and decodes the JSON bodies into typed results.
//!
//! # Design
//! - The relation table lives in `types` as data (`Relation`, `Endpoint`);
//!   the accessor surface is a thin layer over it.
//! - `RelationClient` is immutable after construction and safe to share
//!   between threads. Each call is an independent round-trip.
//! - The network is behind the `Transport` trait. `UreqTransport` is the
//!   default; tests substitute scripted transports.
//! - Timeout and bounded retry on transport failures come from
//!   `ClientConfig`. Failures are logged through `tracing` and returned as
//!   `ApiError`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{relation_target, RelationClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{EntityKind, Endpoint, GraphConf, Relation, RepoSize, ServiceInfo};
