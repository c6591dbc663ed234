//! Document intake: batch upload of selected files to an analysis service
//! and reconciliation of the per-file results.

pub mod config;
pub mod error;
pub mod upload;
pub mod utils;

pub use config::IntakeConfig;
pub use error::{IntakeError, TransportError};
pub use upload::{
    AnalysisClient, BatchManager, FileId, HttpAnalysisClient, SelectedFile, UploadState,
    UploadStatus,
};
