use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Desc, Fixture, GraphSize};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn get(uri: &str) -> axum::response::Response {
    app(Fixture::sample())
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

async fn get_ids(uri: &str) -> Vec<String> {
    let resp = get(uri).await;
    assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    body_json(resp).await
}

// --- metadata ---

#[tokio::test]
async fn root_reports_version_and_graph_conf() {
    let resp = get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let desc: Desc = body_json(resp).await;
    assert_eq!(desc.version, mock_server::VERSION);
    assert_eq!(desc.graph_conf.repo_path, ".");
}

#[tokio::test]
async fn size_reports_counts() {
    let resp = get("/size").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let size: GraphSize = body_json(resp).await;
    assert_eq!(size.file_size, 4);
    assert_eq!(size.commit_size, 3);
    assert_eq!(size.issue_size, 2);
}

// --- enumerations ---

#[tokio::test]
async fn issue_and_author_lists() {
    assert_eq!(get_ids("/issue/list").await, vec!["ISSUE123", "#7"]);
    assert_eq!(get_ids("/author/list").await, vec!["alice", "bob smith"]);
}

// --- relations ---

#[tokio::test]
async fn issue_files_returns_fixture_entry() {
    assert_eq!(
        get_ids("/issue/-/files?issue=ISSUE123").await,
        vec!["a.txt", "b.txt"]
    );
}

#[tokio::test]
async fn every_relation_route_is_mounted() {
    let cases = [
        ("/file/-/issues?file=a.txt", vec!["ISSUE123"]),
        ("/file/-/commits?file=a.txt", vec!["c1", "c3"]),
        ("/issue/-/commits?issue=ISSUE123", vec!["c1"]),
        ("/commit/-/files?commit=c2", vec!["docs/read me.md"]),
        ("/commit/-/issues?commit=c1", vec!["ISSUE123"]),
        ("/commit/-/authors?commit=c3", vec!["alice"]),
        ("/author/-/commits?author=alice", vec!["c1", "c3"]),
    ];
    for (uri, expected) in cases {
        assert_eq!(get_ids(uri).await, expected, "{uri}");
    }
}

#[tokio::test]
async fn encoded_ids_are_decoded_before_lookup() {
    assert_eq!(
        get_ids("/file/-/commits?file=docs%2Fread+me.md").await,
        vec!["c2"]
    );
    assert_eq!(
        get_ids("/file/-/commits?file=src%2Fa%26b%3Dc.rs").await,
        vec!["c3"]
    );
    assert_eq!(get_ids("/issue/-/files?issue=%237").await, vec!["docs/read me.md"]);
}

#[tokio::test]
async fn unknown_id_returns_empty_list() {
    assert!(get_ids("/commit/-/files?commit=deadbeef").await.is_empty());
}

#[tokio::test]
async fn missing_param_returns_400() {
    let resp = get("/issue/-/files").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_param_name_returns_400() {
    let resp = get("/author/-/commits?commit=c1").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let resp = get("/author/-/files?author=alice").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
