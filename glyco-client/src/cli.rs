//! `glyco` command line: submit a prediction from flags and print the result panel as text.
//!
//! ```bash
//! glyco predict --gender 0 --hypertension 0 --heart-disease 0 --smoking-history 0 \
//!     --bmi 27.32 --hba1c-level 6.6 --blood-glucose-level 140 --age-category 2
//! glyco --base-url http://10.0.0.5:8000 sample --json
//! glyco check
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glyco_core::{FormFields, PredictionFormController, ResultView};
use tracing::info;

use crate::{load_config, submit_with, ClientConfig, PredictClient};

/// Feature values of the reference sample used to smoke-test a deployed model.
pub const SAMPLE_VALUES: [&str; 8] = ["0", "0", "0", "0", "27.32", "6.6", "140.0", "2"];

/// Command-line client for the diabetes prediction service
#[derive(Parser, Debug)]
#[command(name = "glyco")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one prediction request built from flags
    Predict(PredictArgs),

    /// Submit the built-in reference sample
    Sample {
        /// Print only the raw JSON reply
        #[arg(long)]
        json: bool,
    },

    /// Check that the prediction service answers
    Check,
}

/// Where the prediction service lives.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// JSON config file with base_url / predict_path / timeout_secs
    #[arg(long, global = true, env = "GLYCO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the prediction service
    #[arg(long, global = true, env = "GLYCO_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "GLYCO_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl ConnectionArgs {
    pub fn resolve(&self) -> Result<ClientConfig> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };
        Ok(base.with_overrides(self.base_url.clone(), self.timeout_secs))
    }
}

/// Raw field text; coercion and validity checks happen in the controller.
#[derive(Args, Debug, Clone, Default)]
pub struct PredictArgs {
    /// Gender category code
    #[arg(long, allow_hyphen_values = true)]
    pub gender: Option<String>,

    /// Hypertension flag (0/1)
    #[arg(long, allow_hyphen_values = true)]
    pub hypertension: Option<String>,

    /// Heart disease flag (0/1)
    #[arg(long, allow_hyphen_values = true)]
    pub heart_disease: Option<String>,

    /// Smoking history category code
    #[arg(long, allow_hyphen_values = true)]
    pub smoking_history: Option<String>,

    /// Body mass index
    #[arg(long, allow_hyphen_values = true)]
    pub bmi: Option<String>,

    /// HbA1c level
    #[arg(long, allow_hyphen_values = true)]
    pub hba1c_level: Option<String>,

    /// Blood glucose level
    #[arg(long, allow_hyphen_values = true)]
    pub blood_glucose_level: Option<String>,

    /// Age category code
    #[arg(long, allow_hyphen_values = true)]
    pub age_category: Option<String>,

    /// Print only the raw JSON reply
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    /// Unset flags become empty inputs, which the form rejects.
    pub fn to_fields(&self) -> FormFields {
        FormFields::from_values(
            [
                &self.gender,
                &self.hypertension,
                &self.heart_disease,
                &self.smoking_history,
                &self.bmi,
                &self.hba1c_level,
                &self.blood_glucose_level,
                &self.age_category,
            ]
            .map(|v| v.clone().unwrap_or_default()),
        )
    }
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let config = self.connection.resolve()?;
        let client = PredictClient::new(&config).context("configure prediction client")?;

        match &self.command {
            Commands::Predict(args) => submit(&client, args.to_fields(), args.json).await,
            Commands::Sample { json } => {
                submit(&client, FormFields::from_values(SAMPLE_VALUES), *json).await
            }
            Commands::Check => {
                let status = client
                    .check()
                    .await
                    .with_context(|| format!("reach {}", client.base_url()))?;
                println!("{} answered with HTTP {status}", client.base_url());
                Ok(())
            }
        }
    }
}

async fn submit(client: &PredictClient, fields: FormFields, json_only: bool) -> Result<()> {
    info!(url = %client.predict_url(), "submitting from command line");
    let mut controller = PredictionFormController::with_fields(fields);
    submit_with(&mut controller, client)
        .await
        .context("form is not ready to submit")?;

    match controller.result() {
        ResultView::Error { message } => anyhow::bail!("{message}"),
        ResultView::Prediction(view) if json_only => println!("{}", view.json),
        view => println!("{}", view.to_text()),
    }
    Ok(())
}
