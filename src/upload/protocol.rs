use super::types::Analysis;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Multipart field carrying each file of a batch.
pub const FILES_FIELD: &str = "files[]";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub results: Vec<ResultRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    pub filename: String,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    pub fn success(filename: impl Into<String>, analysis: Analysis) -> Self {
        Self {
            filename: filename.into(),
            status: RecordStatus::Success,
            analysis: Some(analysis),
            error: None,
        }
    }

    pub fn failure(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            status: RecordStatus::Error,
            analysis: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Success,
    Error,
}

/// One file as sent over the wire.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub name: String,
    pub media_type: String,
    pub content: bytes::Bytes,
}

/// Mirrors the sanitising the analysis service applies to uploaded names,
/// so that result records can be matched back to the files that produced
/// them.
pub fn normalize_filename(name: &str) -> String {
    // Compatibility decomposition splits accented letters into base + mark,
    // so the ASCII filter below keeps the base letter.
    let decomposed: String = name.nfkd().collect();
    let joined = decomposed
        .replace(|c: char| c == '/' || c == '\\', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}
