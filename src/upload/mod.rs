mod client;
mod manager;
mod protocol;
mod reconcile;
mod selection;
mod types;

pub use client::{AnalysisClient, HttpAnalysisClient};
pub use manager::{BatchId, BatchManager};
pub use protocol::{
    normalize_filename, RecordStatus, ResultRecord, UploadPart, UploadResponse, FILES_FIELD,
};
pub use reconcile::{reconcile, BatchMember};
pub use selection::collect_paths;
pub use types::{
    status_icon, Analysis, BatchSummary, FileId, SelectedFile, StatusIcon, UploadState,
    UploadStatus,
};
