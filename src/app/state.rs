use document_intake::upload::BatchSummary;

#[derive(Default)]
pub struct ViewState {
    pub show_details: bool,
    pub is_dragging: bool,
    pub error_message: Option<String>,
    pub confirmed: bool,
}

pub fn status_text(summary: &BatchSummary) -> String {
    if summary.total == 0 {
        return String::new();
    }
    if summary.uploading > 0 {
        format!(
            "Progress: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
            summary.settled(),
            summary.total,
            summary.successful,
            summary.failed
        )
    } else {
        format!(
            "Final Status: {}/{} files | ✅ Success: {} | ❌ Failed: {}",
            summary.settled(),
            summary.total,
            summary.successful,
            summary.failed
        )
    }
}
