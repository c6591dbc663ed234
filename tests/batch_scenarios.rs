//! End-to-end behavior of the batch manager: real HTTP client against a mock
//! service, plus a gated client for ordering and removal while in flight.

use async_trait::async_trait;
use document_intake::upload::{
    AnalysisClient, Analysis, BatchManager, HttpAnalysisClient, ResultRecord, SelectedFile,
    UploadPart, UploadResponse, UploadState,
};
use document_intake::TransportError;
use serde_json::json;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, b"%PDF-1.4 test".to_vec())
}

async fn manager_for(server: &MockServer) -> BatchManager {
    let client = HttpAnalysisClient::new(format!("{}/upload", server.uri()), Duration::from_secs(5))
        .unwrap();
    BatchManager::new(Arc::new(client), Handle::current())
}

async fn respond_with(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_file_success() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        json!({ "results": [ {
            "filename": "a.pdf",
            "status": "success",
            "analysis": { "classification": { "document_type": { "primary_category": "Invoice" } } }
        } ] }),
    )
    .await;
    let mut manager = manager_for(&server).await;

    let file = pdf("a.pdf");
    let id = file.id;
    manager.add_files(vec![file]);
    manager.settle().await;

    let status = manager.status(id).unwrap();
    assert_eq!(status.state(), UploadState::Success);
    assert_eq!(
        status.analysis().and_then(|a| a.primary_category()),
        Some("Invoice")
    );
    assert!(manager.all_uploaded());
}

#[tokio::test]
async fn test_partial_failure_in_one_batch() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        json!({ "results": [
            { "filename": "a.pdf", "status": "success", "analysis": {} },
            { "filename": "b.pdf", "status": "error", "error": "unsupported format" }
        ] }),
    )
    .await;
    let mut manager = manager_for(&server).await;

    let (a, b) = (pdf("a.pdf"), pdf("b.pdf"));
    let (a_id, b_id) = (a.id, b.id);
    manager.add_files(vec![a, b]);
    manager.settle().await;

    assert_eq!(manager.state_of(a_id), Some(UploadState::Success));
    let b_status = manager.status(b_id).unwrap();
    assert_eq!(b_status.state(), UploadState::Error);
    assert_eq!(b_status.message(), Some("unsupported format"));
    assert!(!manager.all_uploaded());
}

#[tokio::test]
async fn test_connection_error_fails_whole_batch() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpAnalysisClient::new(
        format!("http://127.0.0.1:{}/upload", port),
        Duration::from_secs(5),
    )
    .unwrap();
    let mut manager = BatchManager::new(Arc::new(client), Handle::current());

    let (c, d) = (pdf("c.pdf"), pdf("d.pdf"));
    let ids = [c.id, d.id];
    manager.add_files(vec![c, d]);
    manager.settle().await;

    for id in ids {
        let status = manager.status(id).unwrap();
        assert_eq!(status.state(), UploadState::Error);
        assert!(status
            .message()
            .unwrap()
            .starts_with("Failed to send request"));
    }
    assert_eq!(manager.summary().uploading, 0);
}

#[tokio::test]
async fn test_server_error_status_fails_whole_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let mut manager = manager_for(&server).await;

    let file = pdf("a.pdf");
    let id = file.id;
    manager.add_files(vec![file]);
    manager.settle().await;

    assert_eq!(
        manager.status(id).unwrap().message(),
        Some("Upload failed with status: 500")
    );
}

#[tokio::test]
async fn test_duplicate_names_resolve_together() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        json!({ "results": [ { "filename": "a.pdf", "status": "success", "analysis": { "document_id": "DOC9" } } ] }),
    )
    .await;
    let mut manager = manager_for(&server).await;

    let (first, second) = (pdf("a.pdf"), pdf("a.pdf"));
    let ids = [first.id, second.id];
    manager.add_files(vec![first, second]);
    manager.settle().await;

    assert_eq!(manager.len(), 2);
    assert_eq!(manager.status(ids[0]), manager.status(ids[1]));
    assert_eq!(manager.state_of(ids[0]), Some(UploadState::Success));
}

#[tokio::test]
async fn test_missing_result_is_reported() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        json!({ "results": [ { "filename": "a.pdf", "status": "success", "analysis": {} } ] }),
    )
    .await;
    let mut manager = manager_for(&server).await;

    let (a, b) = (pdf("a.pdf"), pdf("b.pdf"));
    let b_id = b.id;
    manager.add_files(vec![a, b]);
    manager.settle().await;

    assert_eq!(
        manager.status(b_id).unwrap().message(),
        Some("No result returned for b.pdf")
    );
}

/// Holds each batch until the test releases it, keyed by the first file name.
#[derive(Default)]
struct GatedClient {
    gates: Mutex<HashMap<String, oneshot::Receiver<UploadResponse>>>,
}

impl GatedClient {
    fn gate(&self, name: &str) -> oneshot::Sender<UploadResponse> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(name.to_string(), rx);
        tx
    }
}

#[async_trait]
impl AnalysisClient for GatedClient {
    async fn analyze(&self, parts: Vec<UploadPart>) -> Result<UploadResponse, TransportError> {
        let gate = self.gates.lock().unwrap().remove(&parts[0].name);
        match gate {
            Some(rx) => rx.await.map_err(|_| TransportError::Timeout),
            None => Err(TransportError::Status(404)),
        }
    }
}

fn success(name: &str) -> UploadResponse {
    UploadResponse {
        message: None,
        results: vec![ResultRecord::success(name, Analysis::default())],
    }
}

async fn wait_for_batch(manager: &mut BatchManager) {
    while manager.poll() == 0 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_overlapping_batches_settle_in_any_order() {
    let client = Arc::new(GatedClient::default());
    let release_a = client.gate("a.pdf");
    let release_b = client.gate("b.pdf");
    let mut manager = BatchManager::new(client.clone(), Handle::current());

    let (a, b) = (pdf("a.pdf"), pdf("b.pdf"));
    let (a_id, b_id) = (a.id, b.id);
    manager.add_files(vec![a]);
    manager.add_files(vec![b]);
    assert_eq!(manager.in_flight(), 2);

    release_b.send(success("b.pdf")).unwrap();
    wait_for_batch(&mut manager).await;
    assert_eq!(manager.state_of(b_id), Some(UploadState::Success));
    assert_eq!(manager.state_of(a_id), Some(UploadState::Uploading));
    assert!(!manager.all_uploaded());

    release_a.send(success("a.pdf")).unwrap();
    manager.settle().await;
    assert_eq!(manager.state_of(a_id), Some(UploadState::Success));
    assert!(manager.all_uploaded());
    assert_eq!(manager.in_flight(), 0);
}

#[tokio::test]
async fn test_removed_file_is_not_resurrected() {
    let client = Arc::new(GatedClient::default());
    let release = client.gate("a.pdf");
    let mut manager = BatchManager::new(client.clone(), Handle::current());

    let file = pdf("a.pdf");
    let id = file.id;
    manager.add_files(vec![file]);
    let removed = manager.remove(id).unwrap();
    assert_eq!(removed.name, "a.pdf");
    assert_eq!(manager.in_flight(), 1);

    release.send(success("a.pdf")).unwrap();
    manager.settle().await;

    assert!(manager.status(id).is_none());
    assert!(manager.is_empty());
    assert!(!manager.all_uploaded());
}
