mod app;

use app::IntakeApp;
use document_intake::upload::{BatchManager, HttpAnalysisClient};
use document_intake::utils::logging;
use document_intake::IntakeConfig;
use eframe::CreationContext;
use std::sync::Arc;
use tracing::{error, warn};

fn main() {
    let (config, load_error) = match IntakeConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (IntakeConfig::default(), Some(e)),
    };
    logging::init(&config.log_filter);
    if let Some(e) = load_error {
        warn!("Falling back to default configuration: {}", e);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            return;
        }
    };

    let client = match HttpAnalysisClient::new(config.endpoint.clone(), config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };
    let manager = BatchManager::new(Arc::new(client), runtime.handle().clone());

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 600.0])
            .with_min_inner_size([400.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Document Intake",
        options,
        Box::new(move |cc: &CreationContext| Box::new(IntakeApp::new(cc, manager, config))),
    ) {
        error!("Window closed with error: {}", e);
    }
}
