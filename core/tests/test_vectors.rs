//! Verify request building and response parsing against the JSON vectors in
//! `test-vectors/`.
//!
//! Each case names an endpoint, an optional identifier, the request the client
//! must build, a simulated response, and either the parsed result or the
//! expected error kind. Results are compared as JSON values so field order in
//! the vectors does not matter.

use relation_core::{
    relation_target, ApiError, Endpoint, HttpMethod, HttpResponse, Relation, RelationClient,
};

const BASE_URL: &str = "http://localhost:9410";

fn client() -> RelationClient {
    RelationClient::new(BASE_URL)
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_endpoint(s: &str) -> Endpoint {
    match s {
        "root" => Endpoint::Root,
        "size" => Endpoint::Size,
        "issue_list" => Endpoint::IssueList,
        "author_list" => Endpoint::AuthorList,
        "file_issues" => Endpoint::Related(Relation::FileIssues),
        "file_commits" => Endpoint::Related(Relation::FileCommits),
        "issue_files" => Endpoint::Related(Relation::IssueFiles),
        "issue_commits" => Endpoint::Related(Relation::IssueCommits),
        "commit_files" => Endpoint::Related(Relation::CommitFiles),
        "commit_issues" => Endpoint::Related(Relation::CommitIssues),
        "commit_authors" => Endpoint::Related(Relation::CommitAuthors),
        "author_commits" => Endpoint::Related(Relation::AuthorCommits),
        other => panic!("unknown endpoint: {other}"),
    }
}

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::NotFound { .. } => "NotFound",
        ApiError::Server { .. } => "Server",
        ApiError::HttpError { .. } => "HttpError",
        ApiError::Transport(_) => "Transport",
        ApiError::Timeout => "Timeout",
        ApiError::InvalidUrl(_) => "InvalidUrl",
        ApiError::MalformedResponse(_) => "MalformedResponse",
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    let cases = vectors["cases"].as_array().unwrap();
    assert!(!cases.is_empty());

    for case in cases {
        let name = case["name"].as_str().unwrap();
        let endpoint = parse_endpoint(case["endpoint"].as_str().unwrap());
        let expected_req = &case["expected_request"];

        // Verify build
        let target = match (endpoint, case.get("input_id")) {
            (Endpoint::Related(relation), Some(id)) => {
                relation_target(relation, id.as_str().unwrap())
            }
            (Endpoint::Related(_), None) => panic!("{name}: relation case without input_id"),
            (_, _) => endpoint.path(),
        };
        let req = c.build_request(&target);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result: Result<serde_json::Value, ApiError> = match endpoint {
            Endpoint::Root => c
                .parse_service_info(&req.url, response)
                .map(|v| serde_json::to_value(v).unwrap()),
            Endpoint::Size => c
                .parse_size(&req.url, response)
                .map(|v| serde_json::to_value(v).unwrap()),
            _ => c
                .parse_ids(&req.url, response)
                .map(|v| serde_json::to_value(v).unwrap()),
        };

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(error_kind(&err), expected_error.as_str().unwrap(), "{name}: error kind");
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}

#[test]
fn vectors_cover_every_endpoint() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for endpoint in Endpoint::ALL {
        let covered = vectors["cases"]
            .as_array()
            .unwrap()
            .iter()
            .any(|case| parse_endpoint(case["endpoint"].as_str().unwrap()) == endpoint);
        assert!(covered, "no vector for {endpoint:?}");
    }
}
