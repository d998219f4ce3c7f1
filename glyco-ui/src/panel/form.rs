// Input form: one text box per field plus the submit/reset buttons.
// Values stay as typed; the controller validates on submit.

use egui::{Color32, RichText};
use glyco_core::{Field, FieldKind, PredictionFormController};
use tracing::debug;

const INVALID_COLOR: Color32 = Color32::from_rgb(185, 28, 28);

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Reset,
}

pub fn show_form(ui: &mut egui::Ui, controller: &mut PredictionFormController) -> FormAction {
    let invalid_field = controller.validation().and_then(|err| err.field());

    egui::Grid::new("prediction_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for field in Field::ALL {
                let label = RichText::new(field.label());
                if invalid_field == Some(field) {
                    ui.label(label.color(INVALID_COLOR));
                } else {
                    ui.label(label);
                }

                let hint = match field.kind() {
                    FieldKind::Integer => "category code",
                    FieldKind::Float => "measurement",
                };
                ui.add(
                    egui::TextEdit::singleline(controller.fields_mut().value_mut(field))
                        .hint_text(hint)
                        .desired_width(160.0),
                );
                ui.end_row();
            }
        });

    // native validity feedback
    if let Some(err) = controller.validation() {
        ui.colored_label(INVALID_COLOR, err.to_string());
    }

    let controls = controller.controls();
    let mut action = FormAction::None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(controls.submit_enabled, egui::Button::new(controls.submit_label))
            .clicked()
        {
            action = FormAction::Submit;
        }
        if ui
            .add_enabled(controls.reset_enabled, egui::Button::new("Reset"))
            .clicked()
        {
            action = FormAction::Reset;
        }
    });

    if action != FormAction::None {
        debug!(?action, "form action");
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyco_core::FormError;

    fn run_form(controller: &mut PredictionFormController) -> FormAction {
        let ctx = egui::Context::default();
        let mut action = FormAction::None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                action = show_form(ui, controller);
            });
        });
        action
    }

    #[test]
    fn idle_frame_has_no_action() {
        let mut controller = PredictionFormController::new();
        assert_eq!(run_form(&mut controller), FormAction::None);
    }

    #[test]
    fn drawing_keeps_validation_feedback() {
        let mut controller = PredictionFormController::new();
        let err = controller.submit().unwrap_err();
        run_form(&mut controller);
        assert_eq!(controller.validation(), Some(&err));
        assert!(matches!(err, FormError::Missing { field: Field::Gender }));
    }
}
