use bytes::Bytes;
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identity of one selected file. Generated at selection time, so two files
/// with the same name are still distinct entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct SelectedFile {
    pub id: FileId,
    pub name: String,
    pub size: u64,
    pub media_type: String,
    /// Released once the file has been handed to a batch.
    #[derivative(Debug = "ignore")]
    pub(crate) content: Option<Bytes>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content = content.into();
        let media_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            id: FileId::new(),
            size: content.len() as u64,
            media_type,
            name,
            content: Some(content),
        }
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

/// Payload-free projection of [`UploadStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Pending,
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success(Analysis),
    Error(String),
}

impl UploadStatus {
    pub fn state(&self) -> UploadState {
        match self {
            UploadStatus::Pending => UploadState::Pending,
            UploadStatus::Uploading => UploadState::Uploading,
            UploadStatus::Success(_) => UploadState::Success,
            UploadStatus::Error(_) => UploadState::Error,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            UploadStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            UploadStatus::Success(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Success(_) | UploadStatus::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Spinner,
    Check,
    Alert,
}

pub fn status_icon(state: UploadState) -> Option<StatusIcon> {
    match state {
        UploadState::Uploading => Some(StatusIcon::Spinner),
        UploadState::Success => Some(StatusIcon::Check),
        UploadState::Error => Some(StatusIcon::Alert),
        UploadState::Pending => None,
    }
}

/// Result payload returned by the analysis service. The content is opaque;
/// the accessors read the fields the service is known to produce and return
/// `None` when they are missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Analysis(Value);

impl Analysis {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn document_id(&self) -> Option<&str> {
        self.str_at("/document_id")
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.str_at("/classification/document_type/primary_category")
    }

    pub fn sub_category(&self) -> Option<&str> {
        self.str_at("/classification/document_type/sub_category")
    }

    pub fn confidence_score(&self) -> Option<f64> {
        self.0
            .pointer("/classification/document_type/confidence_score")
            .and_then(Value::as_f64)
    }

    pub fn summary(&self) -> Option<&str> {
        self.str_at("/summary")
    }

    pub fn page_count(&self) -> Option<u64> {
        self.0.pointer("/metadata/page_count").and_then(Value::as_u64)
    }

    fn str_at(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }
}

/// Counts over the current working set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub uploading: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn settled(&self) -> usize {
        self.successful + self.failed
    }

    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.settled() as f32 / self.total as f32
        }
    }
}
