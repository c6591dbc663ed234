use super::protocol::{normalize_filename, RecordStatus, ResultRecord, UploadResponse};
use super::types::{Analysis, FileId, UploadStatus};
use crate::error::TransportError;
use std::collections::{HashMap, VecDeque};
use tracing::warn;

/// A file as a member of one submitted batch.
#[derive(Debug, Clone)]
pub struct BatchMember {
    pub id: FileId,
    pub name: String,
}

/// Maps the outcome of one batch onto a terminal status for every member,
/// in member order.
pub fn reconcile(
    members: &[BatchMember],
    outcome: Result<UploadResponse, TransportError>,
) -> Vec<(FileId, UploadStatus)> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            let message = err.to_string();
            return members
                .iter()
                .map(|member| (member.id, UploadStatus::Error(message.clone())))
                .collect();
        }
    };

    let mut by_name: HashMap<String, VecDeque<ResultRecord>> = HashMap::new();
    for record in response.results {
        by_name
            .entry(normalize_filename(&record.filename))
            .or_default()
            .push_back(record);
    }

    // Last status handed out per name, reused once that name runs out of records.
    let mut last: HashMap<String, UploadStatus> = HashMap::new();
    let mut updates = Vec::with_capacity(members.len());
    let mut unanswered = Vec::new();

    for member in members {
        let key = normalize_filename(&member.name);
        let next = by_name.get_mut(&key).and_then(VecDeque::pop_front);
        let status = match next {
            Some(record) => {
                let status = record_status(record);
                last.insert(key, status.clone());
                status
            }
            None => match last.get(&key) {
                Some(status) => status.clone(),
                None => {
                    unanswered.push(member.name.as_str());
                    UploadStatus::Error(format!("No result returned for {}", member.name))
                }
            },
        };
        updates.push((member.id, status));
    }

    if !unanswered.is_empty() {
        warn!(
            "No result returned for {} of {} file(s): {}",
            unanswered.len(),
            members.len(),
            unanswered.join(", ")
        );
    }

    for record in by_name.into_values().flatten() {
        warn!("Ignoring result for unknown file '{}'", record.filename);
    }

    updates
}

fn record_status(record: ResultRecord) -> UploadStatus {
    match record.status {
        RecordStatus::Success => UploadStatus::Success(record.analysis.unwrap_or_default()),
        RecordStatus::Error => UploadStatus::Error(
            record
                .error
                .unwrap_or_else(|| "Analysis failed".to_string()),
        ),
    }
}
