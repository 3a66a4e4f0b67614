//! Client requests against a local HTTP stub.

use panda_client::{Column, ColumnSchema, DataObject, DatasetMeta, PandaClient, PandaError};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// (method, path and query, body)
type Captured = Arc<Mutex<Vec<(String, String, String)>>>;

/// Serve one canned response per connection, capturing each request.
async fn stub(responses: Vec<(u16, &'static str)>) -> (String, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let root = format!("http://{}/api/1.0", listener.local_addr().unwrap());
    let captured: Captured = Default::default();

    let requests = captured.clone();
    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();

            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let header_end = loop {
                let n = stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "connection closed before headers");
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
            let length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .map(|(_, value)| value.trim().parse::<usize>().unwrap())
                .unwrap_or(0);
            while buf.len() < header_end + length {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            let mut line = head.split_whitespace();
            requests.lock().unwrap().push((
                line.next().unwrap().to_string(),
                line.next().unwrap().to_string(),
                String::from_utf8_lossy(&buf[header_end..]).to_string(),
            ));

            let response = format!(
                "HTTP/1.1 {status} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
    });

    (root, captured)
}

fn client(root: &str) -> PandaClient {
    PandaClient::new(root, "me@example.com", SecretString::new(Box::from("k1")))
}

fn schema() -> ColumnSchema {
    ColumnSchema::new([
        Column::new("name", "unicode", true),
        Column::new("dob", "date", false),
    ])
}

fn meta() -> DatasetMeta {
    DatasetMeta {
        name: "Warrants".to_string(),
        description: "Test dataset".to_string(),
    }
}

#[tokio::test]
async fn test_ensure_dataset_creates_on_404() {
    let (root, captured) = stub(vec![(404, ""), (201, "{}")]).await;

    let created = client(&root)
        .ensure_dataset("warrants", &meta(), &schema())
        .await
        .unwrap();

    assert!(created);
    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);

    let (method, target, _) = &requests[0];
    assert_eq!(method, "GET");
    assert_eq!(target, "/api/1.0/dataset/warrants/?email=me%40example.com&api_key=k1");

    let (method, target, body) = &requests[1];
    assert_eq!(method, "PUT");
    assert_eq!(
        target,
        "/api/1.0/dataset/warrants/?email=me%40example.com&api_key=k1\
         &columns=name%2Cdob&column_types=unicode%2Cdate&typed_columns=true%2Cfalse"
    );
    let body: Value = serde_json::from_str(body).unwrap();
    assert_eq!(body, json!({"name": "Warrants", "description": "Test dataset"}));
}

#[tokio::test]
async fn test_ensure_dataset_skips_existing() {
    let (root, captured) = stub(vec![(200, "{}")]).await;

    let created = client(&root)
        .ensure_dataset("warrants", &meta(), &schema())
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_put_object_sends_single_object_upload() {
    let (root, captured) = stub(vec![(200, "{}")]).await;
    let object = DataObject {
        external_id: "W1-Doe-John".to_string(),
        data: vec![Some("Doe, John".to_string()), None],
    };

    client(&root).put_object("warrants", &object).await.unwrap();

    let requests = captured.lock().unwrap().clone();
    let (method, target, body) = &requests[0];
    assert_eq!(method, "PUT");
    assert_eq!(target, "/api/1.0/dataset/warrants/data/?email=me%40example.com&api_key=k1");
    let body: Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        body,
        json!({"objects": [{"external_id": "W1-Doe-John", "data": ["Doe, John", null]}]})
    );
}

#[tokio::test]
async fn test_error_status_is_api_error() {
    let (root, _) = stub(vec![(500, "server error")]).await;

    let err = client(&root).dataset_exists("warrants").await.unwrap_err();

    match err {
        PandaError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "server error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_upload_is_api_error() {
    let (root, _) = stub(vec![(400, "bad data")]).await;
    let object = DataObject {
        external_id: "W1".to_string(),
        data: vec![],
    };

    let err = client(&root).put_object("warrants", &object).await.unwrap_err();
    assert!(matches!(err, PandaError::Api { status: 400, .. }));
}
