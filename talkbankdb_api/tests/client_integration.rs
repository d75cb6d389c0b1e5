use std::time::Duration;

use serde_json::json;
use talkbankdb_api::types::PathTree;
use talkbankdb_api::{
    Client, CredentialPrompt, Error, QuerySpec, StaticCredentials, ValidationOutcome,
};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn fixture_tree() -> PathTree {
    let value = serde_json::from_str(&load_fixture("path_trees.json")).unwrap();
    PathTree::from_response(value).unwrap()
}

fn macwhinney_query() -> QuerySpec {
    QuerySpec::new("childes").with_corpus_path(&["childes", "Eng-NA", "MacWhinney", "010411a"])
}

#[tokio::test]
async fn get_transcripts_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("transcripts.json");

    Mock::given(method("POST"))
        .and(path("/getTranscriptSummary"))
        .and(body_partial_json(json!({
            "queryVals": {
                "corpusName": "childes",
                "corpora": [["childes", "Eng-NA", "MacWhinney", "010411a"]],
                "respType": "JSON"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri())
        .unwrap()
        .with_path_tree(fixture_tree());
    let table = client.get_transcripts(&macwhinney_query()).await.unwrap();

    assert_eq!(
        table.col_headings,
        vec![
            "path",
            "filename",
            "languages",
            "media",
            "date",
            "pid",
            "designType",
            "activityType",
            "groupType"
        ]
    );
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "path"), Some("childes/Eng-NA/MacWhinney"));
    assert_eq!(table.get(0, "filename"), Some("010411a"));
    assert_eq!(table.get(0, "languages"), Some("eng"));
    assert_eq!(table.get(0, "designType"), Some("long"));
    assert!(table
        .data
        .iter()
        .all(|row| row.len() == table.col_headings.len()));
}

#[tokio::test]
async fn path_tree_is_fetched_once_per_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getPathTrees"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("path_trees.json")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/getTokenSummary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"colHeadings": ["word"], "data": [["ball"]]})),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    client.get_tokens(&macwhinney_query()).await.unwrap();
    let table = client.get_tokens(&macwhinney_query()).await.unwrap();
    assert_eq!(table.column("word").unwrap(), vec!["ball"]);
}

#[tokio::test]
async fn valid_path_uses_fetched_tree() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getPathTrees"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("path_trees.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    assert_eq!(
        client
            .valid_path(&["childes", "childes", "Clinical"])
            .await
            .unwrap(),
        ValidationOutcome::Invalid { depth: 1 }
    );
    assert!(client
        .valid_path(&["childes", "Clinical", "Feldman"])
        .await
        .unwrap()
        .is_valid());
}

#[tokio::test]
async fn get_path_trees_unwraps_resp_msg() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getPathTrees"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("path_trees.json")))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let tree = client.get_path_trees().await.unwrap();
    assert_eq!(
        tree.corpus_names().collect::<Vec<_>>(),
        vec!["aphasia", "childes"]
    );
    assert!(tree.node(&["aphasia", "English", "Protocol", "ACWT"]).is_some());
}

#[tokio::test]
async fn rejected_credentials_surface_service_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getTranscriptSummary"))
        .and(body_partial_json(json!({
            "queryVals": {
                "auth": true,
                "nsAuth": [{"path": "aphasia", "userID": "jdoe", "pswd": "wrong"}]
            }
        })))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid password for aphasia"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri())
        .unwrap()
        .with_path_tree(fixture_tree())
        .with_credentials(StaticCredentials::single("aphasia", "jdoe", "wrong"));
    let query = QuerySpec::new("aphasia")
        .with_corpus_path(&["aphasia", "English", "Protocol"])
        .with_auth(true);

    match client.get_transcripts(&query).await {
        Err(Error::Authentication(msg)) => assert_eq!(msg, "Invalid password for aphasia"),
        other => panic!("expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn refused_login_in_reply_body_is_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getTokenSummary"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"respMsg": "Login failed for aphasia"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri())
        .unwrap()
        .with_credentials(StaticCredentials::single("aphasia", "jdoe", "wrong"));
    let query = QuerySpec::new("aphasia").with_auth(true);

    match client.get_tokens(&query).await {
        Err(Error::Authentication(msg)) => assert_eq!(msg, "Login failed for aphasia"),
        other => panic!("expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn cancelled_prompt_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri())
        .unwrap()
        .with_path_tree(fixture_tree())
        .with_credentials(|| CredentialPrompt::Cancelled);
    let query = QuerySpec::new("aphasia").with_auth(true);

    let result = client.get_utterances(&query).await;
    assert!(matches!(result, Err(Error::RequestCancelled(_))));
}

#[tokio::test]
async fn server_error_reports_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getNgrams"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    match client.get_ngrams(&QuerySpec::new("childes")).await {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/cql"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_cql(&QuerySpec::new("childes")).await;
    assert!(matches!(result, Err(Error::MalformedResponse(_))));
}

#[tokio::test]
async fn wrong_shape_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getParticipantSummary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"respMsg": "No results"})))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri()).unwrap();
    let result = client.get_participants(&QuerySpec::new("childes")).await;
    assert!(matches!(result, Err(Error::MalformedResponse(_))));
}

#[tokio::test]
async fn slow_response_exceeds_deadline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/getTokenTypes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"colHeadings": [], "data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri())
        .unwrap()
        .with_deadline(Duration::from_millis(50));
    let result = client.get_token_types(&QuerySpec::new("childes")).await;
    assert!(matches!(result, Err(Error::RequestCancelled(_))));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let client = Client::with_base_url("http://127.0.0.1:9").unwrap();
    let result = client.get_transcripts(&QuerySpec::new("childes")).await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
