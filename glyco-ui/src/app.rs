// Desktop host for the prediction form controller.
// Requests run on a tokio runtime; outcomes come back over a channel and are
// applied on the UI thread, so the controller is only ever touched here.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

use glyco_client::PredictClient;
use glyco_core::{PredictionFormController, PredictionReply, SubmitError};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::panel::{show_form, show_result, EguiClipboard, FormAction};

type SubmissionOutcome = (Uuid, Result<PredictionReply, SubmitError>);

pub struct PredictionApp {
    controller: PredictionFormController,
    client: PredictClient,
    runtime: Runtime,
    outcome_tx: Sender<SubmissionOutcome>,
    outcome_rx: Receiver<SubmissionOutcome>,
}

impl PredictionApp {
    pub fn new(client: PredictClient, runtime: Runtime) -> Self {
        info!(url = %client.predict_url(), "prediction window ready");
        let (outcome_tx, outcome_rx) = channel();
        Self {
            controller: PredictionFormController::new(),
            client,
            runtime,
            outcome_tx,
            outcome_rx,
        }
    }

    fn submit(&mut self, ctx: &egui::Context) {
        let submission = match self.controller.submit() {
            Ok(submission) => submission,
            Err(err) => {
                debug!(%err, "submission blocked");
                return;
            }
        };

        let client = self.client.clone();
        let tx = self.outcome_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let outcome = client.send(&submission.request).await;
            if tx.send((submission.id, outcome)).is_err() {
                warn!(id = %submission.id, "window closed before the prediction arrived");
            }
            ctx.request_repaint();
        });
    }

    fn drain_outcomes(&mut self) {
        while let Ok((id, outcome)) = self.outcome_rx.try_recv() {
            self.controller.complete(id, outcome);
        }
    }
}

impl eframe::App for PredictionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_outcomes();
        self.controller.tick(Instant::now());

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Diabetes prediction");
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                match show_form(ui, &mut self.controller) {
                    FormAction::Submit => self.submit(ctx),
                    FormAction::Reset => self.controller.reset(Instant::now()),
                    FormAction::None => {}
                }

                ui.separator();

                if show_result(ui, &self.controller) {
                    self.controller
                        .copy_json(Instant::now(), &mut EguiClipboard(ctx));
                }
            });
        });

        if let Some(deadline) = self.controller.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}
