use super::client::AnalysisClient;
use super::protocol::{UploadPart, UploadResponse};
use super::reconcile::{reconcile, BatchMember};
use super::types::{BatchSummary, FileId, SelectedFile, UploadState, UploadStatus};
use crate::error::{IntakeError, Result, TransportError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

pub type BatchId = u64;

/// Completion message sent by a submission task back to the manager.
struct BatchOutcome {
    batch: BatchId,
    members: Vec<BatchMember>,
    result: std::result::Result<UploadResponse, TransportError>,
}

/// Owns the working set and the per-file status map.
///
/// Network calls run as tasks on the given runtime and only report back
/// through a channel; every state change happens on the thread that owns the
/// manager, inside [`BatchManager::poll`] or [`BatchManager::settle`].
pub struct BatchManager {
    client: Arc<dyn AnalysisClient>,
    runtime: Handle,
    files: Vec<SelectedFile>,
    statuses: HashMap<FileId, UploadStatus>,
    outcome_sender: UnboundedSender<BatchOutcome>,
    outcome_receiver: UnboundedReceiver<BatchOutcome>,
    in_flight: usize,
    next_batch: BatchId,
}

impl BatchManager {
    pub fn new(client: Arc<dyn AnalysisClient>, runtime: Handle) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel();
        Self {
            client,
            runtime,
            files: Vec::new(),
            statuses: HashMap::new(),
            outcome_sender,
            outcome_receiver,
            in_flight: 0,
            next_batch: 1,
        }
    }

    /// Appends the files, marks them uploading and submits them as one batch.
    /// Files whose content was already handed to a batch are skipped; a file
    /// carrying an id already in the working set gets a fresh one. Returns
    /// `None` when nothing is left to submit.
    pub fn add_files(&mut self, new_files: Vec<SelectedFile>) -> Option<BatchId> {
        let mut parts = Vec::with_capacity(new_files.len());
        let mut members = Vec::with_capacity(new_files.len());

        for mut file in new_files {
            let Some(content) = file.content.take() else {
                warn!("Skipping {} ({}): content already submitted", file.name, file.id);
                continue;
            };
            if self.files.iter().any(|existing| existing.id == file.id) {
                let fresh = FileId::new();
                debug!("File {} already listed, re-keyed as {}", file.id, fresh);
                file.id = fresh;
            }

            self.statuses.insert(file.id, UploadStatus::Uploading);
            parts.push(UploadPart {
                name: file.name.clone(),
                media_type: file.media_type.clone(),
                content,
            });
            members.push(BatchMember {
                id: file.id,
                name: file.name.clone(),
            });
            self.files.push(file);
        }

        if members.is_empty() {
            return None;
        }
        Some(self.submit_batch(members, parts))
    }

    fn submit_batch(&mut self, members: Vec<BatchMember>, parts: Vec<UploadPart>) -> BatchId {
        let batch = self.next_batch;
        self.next_batch += 1;
        self.in_flight += 1;

        info!("Submitting batch {} with {} file(s)", batch, members.len());

        let client = Arc::clone(&self.client);
        let sender = self.outcome_sender.clone();
        self.runtime.spawn(async move {
            let result = client.analyze(parts).await;
            let outcome = BatchOutcome {
                batch,
                members,
                result,
            };
            if sender.send(outcome).is_err() {
                debug!("Batch {} finished after its manager was dropped", batch);
            }
        });

        batch
    }

    /// Applies every batch outcome that has already arrived. Returns the
    /// number of batches applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.apply(outcome);
            applied += 1;
        }
        applied
    }

    /// Waits until no batch is in flight.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.outcome_receiver.recv().await {
                Some(outcome) => self.apply(outcome),
                None => break,
            }
        }
    }

    fn apply(&mut self, outcome: BatchOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match &outcome.result {
            Ok(response) => info!(
                "Batch {} returned {} result(s)",
                outcome.batch,
                response.results.len()
            ),
            Err(err) => warn!("Batch {} failed: {}", outcome.batch, err),
        }

        for (id, status) in reconcile(&outcome.members, outcome.result) {
            match self.statuses.get_mut(&id) {
                Some(current) if current.is_terminal() => {
                    debug!("File {} already settled, keeping {:?}", id, current.state());
                }
                Some(current) => {
                    debug!("File {} -> {:?}", id, status.state());
                    *current = status;
                }
                None => debug!("Dropping result for removed file {}", id),
            }
        }
    }

    /// Removes the file at `index` together with its own status entry. A batch
    /// still carrying the file is not cancelled; its result is dropped.
    pub fn remove_file(&mut self, index: usize) -> Result<SelectedFile> {
        if index >= self.files.len() {
            return Err(IntakeError::IndexOutOfBounds {
                index,
                len: self.files.len(),
            });
        }
        let file = self.files.remove(index);
        self.statuses.remove(&file.id);
        debug!("Removed {} ({})", file.name, file.id);
        Ok(file)
    }

    pub fn remove(&mut self, id: FileId) -> Result<SelectedFile> {
        let index = self
            .files
            .iter()
            .position(|file| file.id == id)
            .ok_or(IntakeError::UnknownFile(id))?;
        self.remove_file(index)
    }

    pub fn all_uploaded(&self) -> bool {
        !self.files.is_empty()
            && self
                .files
                .iter()
                .all(|file| self.state_of(file.id) == Some(UploadState::Success))
    }

    /// Final confirmation of a fully uploaded working set. Only logs.
    pub fn confirm(&self) -> Result<usize> {
        if !self.all_uploaded() {
            return Err(IntakeError::NotReady);
        }
        info!(
            "All {} file(s) uploaded successfully, submitting",
            self.files.len()
        );
        Ok(self.files.len())
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn status(&self, id: FileId) -> Option<&UploadStatus> {
        self.statuses.get(&id)
    }

    pub fn state_of(&self, id: FileId) -> Option<UploadState> {
        self.status(id).map(UploadStatus::state)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SelectedFile, Option<&UploadStatus>)> {
        self.files
            .iter()
            .map(move |file| (file, self.statuses.get(&file.id)))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.files.len(),
            ..BatchSummary::default()
        };
        for file in &self.files {
            match self.state_of(file.id) {
                Some(UploadState::Uploading) => summary.uploading += 1,
                Some(UploadState::Success) => summary.successful += 1,
                Some(UploadState::Error) => summary.failed += 1,
                _ => {}
            }
        }
        summary
    }
}
