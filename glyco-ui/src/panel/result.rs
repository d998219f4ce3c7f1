// Result panel: headline, probability segments, raw JSON and the copy button.

use egui::{Color32, RichText};
use glyco_core::{Clipboard, PredictionFormController, PredictionView, ProbabilitySegment, ResultView};

const WARNING_COLOR: Color32 = Color32::from_rgb(185, 28, 28);
const OK_COLOR: Color32 = Color32::from_rgb(21, 128, 61);
const BAR_COLOR: Color32 = Color32::from_rgb(37, 99, 235);
const SEGMENT_FILL: Color32 = Color32::from_rgb(238, 246, 255);
const MUTED_TEXT: Color32 = Color32::from_rgb(71, 85, 105);

/// Copies through egui's platform clipboard integration.
pub struct EguiClipboard<'a>(pub &'a egui::Context);

impl Clipboard for EguiClipboard<'_> {
    fn copy_text(&mut self, text: &str) {
        self.0.copy_text(text.to_string());
    }
}

/// Draw the current result. Returns true when the copy button was clicked.
pub fn show_result(ui: &mut egui::Ui, controller: &PredictionFormController) -> bool {
    match controller.result() {
        ResultView::Empty => false,
        ResultView::Error { message } => {
            ui.colored_label(WARNING_COLOR, format!("Error: {message}"));
            false
        }
        ResultView::Prediction(view) => {
            show_prediction(ui, view, controller.copy_label()).clicked()
        }
    }
}

/// Returns the copy button's response.
fn show_prediction(ui: &mut egui::Ui, view: &PredictionView, copy_label: &str) -> egui::Response {
    let tone = if view.outcome.is_warning() {
        WARNING_COLOR
    } else {
        OK_COLOR
    };
    ui.label(RichText::new(view.headline()).color(tone).strong());

    if !view.segments.is_empty() {
        ui.add_space(8.0);
        ui.columns(view.segments.len(), |columns| {
            for (column, segment) in columns.iter_mut().zip(&view.segments) {
                show_segment(column, segment);
            }
        });
    }

    ui.add_space(10.0);
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.label(RichText::new(&view.json).monospace());
    });

    ui.add_space(8.0);
    ui.button(copy_label)
}

fn show_segment(ui: &mut egui::Ui, segment: &ProbabilitySegment) {
    egui::Frame::new()
        .fill(SEGMENT_FILL)
        .corner_radius(6.0)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.label(RichText::new(&segment.percent).strong());
            ui.add(
                egui::ProgressBar::new(segment.fill)
                    .desired_height(6.0)
                    .fill(BAR_COLOR),
            );
            ui.label(
                RichText::new(segment.class_label())
                    .small()
                    .color(MUTED_TEXT),
            );
        });
}
