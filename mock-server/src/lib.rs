use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::{get, MethodRouter},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConf {
    pub repo_path: String,
    pub depth: i64,
    pub issue_regex: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSize {
    pub file_size: u64,
    pub commit_size: u64,
    pub issue_size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Desc {
    pub version: String,
    pub graph_conf: GraphConf,
}

/// In-memory relation data served by the mock.
///
/// `relations` is keyed by route path (`/file/-/issues`), then by the source
/// identifier as the service sees it after query decoding.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub graph_conf: GraphConf,
    pub size: GraphSize,
    pub issues: Vec<String>,
    pub authors: Vec<String>,
    pub relations: HashMap<String, HashMap<String, Vec<String>>>,
}

impl Fixture {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn insert(&mut self, path: &str, id: &str, related: &[&str]) {
        self.relations
            .entry(path.to_string())
            .or_default()
            .insert(id.to_string(), related.iter().map(|s| s.to_string()).collect());
    }

    /// Small deterministic repository used by tests and the binary.
    pub fn sample() -> Self {
        let mut fixture = Fixture {
            graph_conf: GraphConf {
                repo_path: ".".to_string(),
                depth: 10240,
                issue_regex: r"(#\d+)".to_string(),
            },
            size: GraphSize {
                file_size: 4,
                commit_size: 3,
                issue_size: 2,
            },
            issues: vec!["ISSUE123".to_string(), "#7".to_string()],
            authors: vec!["alice".to_string(), "bob smith".to_string()],
            relations: HashMap::new(),
        };

        fixture.insert("/file/-/issues", "a.txt", &["ISSUE123"]);
        fixture.insert("/file/-/issues", "docs/read me.md", &["#7"]);
        fixture.insert("/file/-/commits", "a.txt", &["c1", "c3"]);
        fixture.insert("/file/-/commits", "docs/read me.md", &["c2"]);
        fixture.insert("/file/-/commits", "src/a&b=c.rs", &["c3"]);

        fixture.insert("/issue/-/files", "ISSUE123", &["a.txt", "b.txt"]);
        fixture.insert("/issue/-/files", "#7", &["docs/read me.md"]);
        fixture.insert("/issue/-/commits", "ISSUE123", &["c1"]);
        fixture.insert("/issue/-/commits", "#7", &["c2"]);

        fixture.insert("/commit/-/files", "c1", &["a.txt", "b.txt"]);
        fixture.insert("/commit/-/files", "c2", &["docs/read me.md"]);
        fixture.insert("/commit/-/files", "c3", &["a.txt", "src/a&b=c.rs"]);
        fixture.insert("/commit/-/issues", "c1", &["ISSUE123"]);
        fixture.insert("/commit/-/issues", "c2", &["#7"]);
        fixture.insert("/commit/-/authors", "c1", &["alice"]);
        fixture.insert("/commit/-/authors", "c2", &["bob smith"]);
        fixture.insert("/commit/-/authors", "c3", &["alice"]);

        fixture.insert("/author/-/commits", "alice", &["c1", "c3"]);
        fixture.insert("/author/-/commits", "bob smith", &["c2"]);

        fixture
    }

    fn related(&self, path: &str, id: &str) -> Vec<String> {
        match self.relations.get(path).and_then(|ids| ids.get(id)) {
            Some(related) => related.clone(),
            None => {
                debug!(path, id, "no relation entry, answering empty");
                Vec::new()
            }
        }
    }
}

pub type Db = Arc<Fixture>;

#[derive(Deserialize)]
pub struct FileParams {
    pub file: String,
}

#[derive(Deserialize)]
pub struct IssueParams {
    pub issue: String,
}

#[derive(Deserialize)]
pub struct CommitParams {
    pub commit: String,
}

#[derive(Deserialize)]
pub struct AuthorParams {
    pub author: String,
}

trait IdParam {
    fn id(&self) -> &str;
}

impl IdParam for FileParams {
    fn id(&self) -> &str {
        &self.file
    }
}

impl IdParam for IssueParams {
    fn id(&self) -> &str {
        &self.issue
    }
}

impl IdParam for CommitParams {
    fn id(&self) -> &str {
        &self.commit
    }
}

impl IdParam for AuthorParams {
    fn id(&self) -> &str {
        &self.author
    }
}

pub fn app(fixture: Fixture) -> Router {
    let db: Db = Arc::new(fixture);
    Router::new()
        .nest(
            "/file",
            Router::new()
                .route("/-/issues", related::<FileParams>("/file/-/issues"))
                .route("/-/commits", related::<FileParams>("/file/-/commits")),
        )
        .nest(
            "/issue",
            Router::new()
                .route("/-/files", related::<IssueParams>("/issue/-/files"))
                .route("/-/commits", related::<IssueParams>("/issue/-/commits"))
                .route("/list", get(issue_list)),
        )
        .nest(
            "/commit",
            Router::new()
                .route("/-/files", related::<CommitParams>("/commit/-/files"))
                .route("/-/issues", related::<CommitParams>("/commit/-/issues"))
                .route("/-/authors", related::<CommitParams>("/commit/-/authors")),
        )
        .nest(
            "/author",
            Router::new()
                .route("/-/commits", related::<AuthorParams>("/author/-/commits"))
                .route("/list", get(author_list)),
        )
        .route("/size", get(size))
        .route("/", get(root))
        .with_state(db)
}

pub async fn run(listener: TcpListener, fixture: Fixture) -> Result<(), std::io::Error> {
    axum::serve(listener, app(fixture)).await
}

fn related<P>(path: &'static str) -> MethodRouter<Db>
where
    P: IdParam + DeserializeOwned + Send + 'static,
{
    get(move |State(db): State<Db>, Query(params): Query<P>| async move {
        Json(db.related(path, params.id()))
    })
}

async fn root(State(db): State<Db>) -> Json<Desc> {
    Json(Desc {
        version: VERSION.to_string(),
        graph_conf: db.graph_conf.clone(),
    })
}

async fn size(State(db): State<Db>) -> Json<GraphSize> {
    Json(db.size)
}

async fn issue_list(State(db): State<Db>) -> Json<Vec<String>> {
    Json(db.issues.clone())
}

async fn author_list(State(db): State<Db>) -> Json<Vec<String>> {
    Json(db.authors.clone())
}
