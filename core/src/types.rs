//! Entity kinds, the relation table, and typed response DTOs.
//!
//! # Design
//! The relation contract is expressed as data: every `Relation` knows its
//! source and target `EntityKind`, and the URL path and query parameter are
//! derived from those two kinds. Accessor methods on `RelationClient` are thin
//! wrappers over this table, so adding a relation means adding one variant.
//!
//! The DTOs mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four node types in the repository relationship graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    File,
    Issue,
    Commit,
    Author,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::File,
        EntityKind::Issue,
        EntityKind::Commit,
        EntityKind::Author,
    ];

    /// Query parameter name carrying an identifier of this kind.
    pub fn param(self) -> &'static str {
        match self {
            EntityKind::File => "file",
            EntityKind::Issue => "issue",
            EntityKind::Commit => "commit",
            EntityKind::Author => "author",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            EntityKind::File => "files",
            EntityKind::Issue => "issues",
            EntityKind::Commit => "commits",
            EntityKind::Author => "authors",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

/// A directional relation query: given one entity of kind `from`, list the
/// related entities of kind `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    FileIssues,
    FileCommits,
    IssueFiles,
    IssueCommits,
    CommitFiles,
    CommitIssues,
    CommitAuthors,
    AuthorCommits,
}

impl Relation {
    pub const ALL: [Relation; 8] = [
        Relation::FileIssues,
        Relation::FileCommits,
        Relation::IssueFiles,
        Relation::IssueCommits,
        Relation::CommitFiles,
        Relation::CommitIssues,
        Relation::CommitAuthors,
        Relation::AuthorCommits,
    ];

    /// `(from, to)` pair for this relation.
    pub fn kinds(self) -> (EntityKind, EntityKind) {
        use EntityKind::*;
        match self {
            Relation::FileIssues => (File, Issue),
            Relation::FileCommits => (File, Commit),
            Relation::IssueFiles => (Issue, File),
            Relation::IssueCommits => (Issue, Commit),
            Relation::CommitFiles => (Commit, File),
            Relation::CommitIssues => (Commit, Issue),
            Relation::CommitAuthors => (Commit, Author),
            Relation::AuthorCommits => (Author, Commit),
        }
    }

    pub fn from_kind(self) -> EntityKind {
        self.kinds().0
    }

    pub fn to_kind(self) -> EntityKind {
        self.kinds().1
    }

    /// Look up the relation between two kinds, if the service supports it.
    pub fn between(from: EntityKind, to: EntityKind) -> Option<Relation> {
        Relation::ALL.into_iter().find(|r| r.kinds() == (from, to))
    }

    /// Path of the form `/{from}/-/{to}s`.
    pub fn path(self) -> String {
        let (from, to) = self.kinds();
        format!("/{}/-/{}", from.param(), to.plural())
    }

    /// Name of the query parameter carrying the source identifier.
    pub fn param(self) -> &'static str {
        self.from_kind().param()
    }
}

/// Every endpoint the service exposes. Each one is reachable through exactly
/// one accessor on `RelationClient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Root,
    Size,
    IssueList,
    AuthorList,
    Related(Relation),
}

impl Endpoint {
    pub const ALL: [Endpoint; 12] = [
        Endpoint::Root,
        Endpoint::Size,
        Endpoint::IssueList,
        Endpoint::AuthorList,
        Endpoint::Related(Relation::FileIssues),
        Endpoint::Related(Relation::FileCommits),
        Endpoint::Related(Relation::IssueFiles),
        Endpoint::Related(Relation::IssueCommits),
        Endpoint::Related(Relation::CommitFiles),
        Endpoint::Related(Relation::CommitIssues),
        Endpoint::Related(Relation::CommitAuthors),
        Endpoint::Related(Relation::AuthorCommits),
    ];

    pub fn path(self) -> String {
        match self {
            Endpoint::Root => "/".to_string(),
            Endpoint::Size => "/size".to_string(),
            Endpoint::IssueList => "/issue/list".to_string(),
            Endpoint::AuthorList => "/author/list".to_string(),
            Endpoint::Related(relation) => relation.path(),
        }
    }

    /// Query parameter name, `None` for parameterless endpoints.
    pub fn param(self) -> Option<&'static str> {
        match self {
            Endpoint::Related(relation) => Some(relation.param()),
            _ => None,
        }
    }
}

/// Collector settings the service reports alongside its version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraphConf {
    #[serde(default)]
    pub repo_path: String,
    #[serde(default)]
    pub depth: i64,
    #[serde(default)]
    pub issue_regex: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_conf: Option<GraphConf>,
}

/// Body of `GET /size`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoSize {
    pub file_size: u64,
    pub commit_size: u64,
    pub issue_size: u64,
}
