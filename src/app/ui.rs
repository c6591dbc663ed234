use super::state::status_text;
use super::IntakeApp;
use document_intake::upload::{status_icon, StatusIcon, UploadStatus};
use document_intake::utils::file_size::format_size;
use egui::{Align, Color32, RichText};
use rfd::FileDialog;

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

impl IntakeApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let total_height = ui.available_height();
            let footer_height = 40.0;
            let footer_margin = 15.0;
            let content_height = total_height - footer_height - footer_margin;

            egui::ScrollArea::vertical()
                .max_height(content_height)
                .show(ui, |ui| {
                    ui.add_space(20.0);
                    ui.vertical_centered(|ui| {
                        ui.heading("Document Intake");
                        ui.add_space(5.0);
                        ui.label(
                            RichText::new("Upload documents for classification and field extraction")
                                .color(ui.visuals().text_color().gamma_multiply(0.7)),
                        );
                    });

                    ui.add_space(20.0);
                    self.render_drop_zone(ui);

                    if !self.manager.is_empty() {
                        ui.add_space(20.0);
                        self.render_file_list(ui);

                        ui.add_space(10.0);
                        self.render_progress(ui);

                        ui.add_space(10.0);
                        self.render_details(ui);
                    }

                    if self.manager.all_uploaded() {
                        ui.add_space(20.0);
                        ui.vertical_centered(|ui| {
                            let button = egui::Button::new("✔ Submit").min_size(egui::vec2(200.0, 40.0));
                            if ui.add(button).clicked() {
                                self.submit();
                            }
                            if self.view.confirmed {
                                ui.colored_label(SUCCESS, "All files submitted");
                            }
                        });
                    }

                    ui.add_space(20.0);
                });

            ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
                ui.add_space(footer_margin);
                self.render_footer(ui);
            });
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let stroke_color = if self.view.is_dragging { ACCENT } else { MUTED };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.5, stroke_color))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.add_space(10.0);
                    ui.label("Drag and drop files here or");
                    ui.add_space(5.0);
                    if ui.button("📁 Select Files").clicked() {
                        if let Some(paths) = FileDialog::new()
                            .add_filter("Documents", self.config.accepted_extensions.as_slice())
                            .pick_files()
                        {
                            self.add_paths(paths);
                        }
                    }
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Supports PDF, Images, and Text files")
                            .small()
                            .color(MUTED),
                    );
                    ui.add_space(10.0);
                });
            });
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        let mut remove_index = None;

        ui.group(|ui| {
            for (index, (file, status)) in self.manager.entries().enumerate() {
                ui.horizontal(|ui| {
                    match status.map(|s| status_icon(s.state())) {
                        Some(Some(StatusIcon::Spinner)) => {
                            ui.add(egui::Spinner::new());
                        }
                        Some(Some(StatusIcon::Check)) => {
                            ui.colored_label(SUCCESS, "✔");
                        }
                        Some(Some(StatusIcon::Alert)) => {
                            ui.colored_label(FAILURE, "⚠");
                        }
                        _ => {
                            ui.label(" ");
                        }
                    }

                    ui.label(&file.name);
                    ui.label(RichText::new(format_size(file.size)).small().color(MUTED));

                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        if ui.small_button("×").clicked() {
                            remove_index = Some(index);
                        }
                    });
                });

                if let Some(message) = status.and_then(UploadStatus::message) {
                    ui.colored_label(FAILURE, message);
                }
                ui.add_space(4.0);
            }
        });

        if let Some(index) = remove_index {
            self.remove_file(index);
        }
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        let summary = self.manager.summary();
        ui.group(|ui| {
            let progress_bar = egui::ProgressBar::new(summary.progress())
                .show_percentage()
                .animate(self.manager.is_busy())
                .fill(ACCENT);
            ui.add(progress_bar);
            ui.label(status_text(&summary));
        });
    }

    fn render_details(&mut self, ui: &mut egui::Ui) {
        if ui
            .button(if self.view.show_details {
                "Hide Details"
            } else {
                "Show Details"
            })
            .clicked()
        {
            self.view.show_details = !self.view.show_details;
        }

        if !self.view.show_details {
            return;
        }

        egui::ScrollArea::vertical()
            .id_source("details")
            .max_height(200.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .show(ui, |ui| {
                        ui.add_space(8.0);
                        for (file, status) in self.manager.entries() {
                            let Some(analysis) = status.and_then(UploadStatus::analysis) else {
                                continue;
                            };
                            ui.label(RichText::new(&file.name).strong());
                            let category = match (analysis.primary_category(), analysis.sub_category()) {
                                (Some(primary), Some(sub)) => format!("{} / {}", primary, sub),
                                (Some(primary), None) => primary.to_string(),
                                _ => "Unclassified".to_string(),
                            };
                            ui.label(format!("Type: {}", category));
                            if let Some(score) = analysis.confidence_score() {
                                ui.label(format!("Confidence Score: {:.1}%", score * 100.0));
                            }
                            if let Some(pages) = analysis.page_count() {
                                ui.label(format!("Pages: {}", pages));
                            }
                            if let Some(summary) = analysis.summary() {
                                ui.label(RichText::new(summary).italics());
                            }
                            ui.add_space(6.0);
                        }
                        ui.add_space(8.0);
                    });
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new(format!("Endpoint: {}", self.config.endpoint)).small().color(MUTED));

        if let Some(error) = &self.view.error_message {
            ui.add_space(5.0);
            ui.vertical_centered(|ui| {
                ui.colored_label(FAILURE, error);
            });
        }
    }
}
