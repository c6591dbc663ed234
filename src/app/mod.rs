mod state;
mod ui;

use bytes::Bytes;
use document_intake::upload::{collect_paths, BatchManager, SelectedFile};
use document_intake::IntakeConfig;
use eframe::{egui, App};
use state::ViewState;
use std::path::PathBuf;
use tracing::info;

pub struct IntakeApp {
    manager: BatchManager,
    config: IntakeConfig,
    view: ViewState,
}

impl IntakeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, manager: BatchManager, config: IntakeConfig) -> Self {
        info!("Initializing document intake, endpoint {}", config.endpoint);
        Self {
            manager,
            config,
            view: ViewState::default(),
        }
    }

    /// Entry point for both the picker dialog and dropped paths.
    pub fn add_paths(&mut self, paths: Vec<PathBuf>) {
        let files = collect_paths(&paths, &self.config);
        if files.is_empty() {
            self.view.error_message = Some("No readable files in selection".to_string());
            return;
        }
        self.view.error_message = None;
        self.view.confirmed = false;
        self.manager.add_files(files);
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovering, dropped) = ctx.input(|i| {
            (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone())
        });
        self.view.is_dragging = hovering;

        if dropped.is_empty() {
            return;
        }

        let mut paths = Vec::new();
        let mut in_memory = Vec::new();
        for file in dropped {
            if let Some(path) = file.path {
                paths.push(path);
            } else if let Some(content) = file.bytes {
                in_memory.push(SelectedFile::new(file.name, Bytes::copy_from_slice(&content)));
            }
        }

        if !paths.is_empty() {
            self.add_paths(paths);
        }
        if !in_memory.is_empty() {
            self.view.confirmed = false;
            self.manager.add_files(in_memory);
        }
    }

    pub fn submit(&mut self) {
        match self.manager.confirm() {
            Ok(_) => self.view.confirmed = true,
            Err(e) => self.view.error_message = Some(e.to_string()),
        }
    }

    pub fn remove_file(&mut self, index: usize) {
        if let Err(e) = self.manager.remove_file(index) {
            self.view.error_message = Some(e.to_string());
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);

        if self.manager.poll() > 0 {
            ctx.request_repaint();
        }
        if self.manager.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl App for IntakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
