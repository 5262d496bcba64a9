use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use his_core::config::{census_path_from_env_value, clinician_from_env_value};
use his_core::constants::{CENSUS_PATH_ENV_VAR, CLINICIAN_ENV_VAR};
use his_core::{
    CoreConfig, Form, FormSession, MedicalRecordForm, PatientInfo, RecordAction, RecordSeed,
    RecordType, SocialHistory, SocialHistoryAction, SocialHistoryForm, TracingHost, WardBoard,
};
use his_types::Sex;

/// A scripted editing session.
///
/// The script names the form, the data it is opened with and the actions to replay, for
/// example:
///
/// ```json
/// {
///   "form": "social_history",
///   "patient_sex": "female",
///   "actions": [
///     { "action": "set_smoking_status", "value": "current" },
///     { "action": "set_cigarettes_per_day", "value": 20 },
///     { "action": "set_smoking_years", "value": 10 },
///     { "action": "recalculate_pack_years" }
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
enum Script {
    SocialHistory {
        #[serde(default)]
        patient_sex: Sex,
        #[serde(default)]
        history: SocialHistory,
        actions: Vec<SocialHistoryAction>,
    },
    MedicalRecord {
        /// Inpatient on the configured census.
        inpatient_id: String,
        #[serde(default)]
        record_type: RecordType,
        #[serde(default)]
        seed: RecordSeed,
        actions: Vec<RecordAction>,
    },
}

/// Main entry point for the HIS session runner
///
/// Replays a scripted list of edits against one form, saves the draft through a logging
/// host and prints the saved snapshot as JSON on stdout.
///
/// The script is read from the file named by the first argument, or from stdin.
///
/// # Environment Variables
/// - `HIS_CLINICIAN`: clinician stamped on new medical records (default: "当前医生")
/// - `HIS_CENSUS_PATH`: census YAML used to look up inpatients (default: bundled sample)
/// - `RUST_LOG`: log filter
///
/// # Returns
/// * `Ok(())` - If every action was accepted
/// * `Err(anyhow::Error)` - If the script cannot be read or an action is rejected
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("his=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CoreConfig::new(
        &clinician_from_env_value(std::env::var(CLINICIAN_ENV_VAR).ok()),
        census_path_from_env_value(std::env::var(CENSUS_PATH_ENV_VAR).ok()),
    )?;

    let script_text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read script {path}"))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read script from stdin")?;
            text
        }
    };
    let script: Script = serde_json::from_str(&script_text).context("invalid session script")?;

    let snapshot = match script {
        Script::SocialHistory {
            patient_sex,
            history,
            actions,
        } => {
            let form = SocialHistoryForm::new(patient_sex, history);
            serde_json::to_value(replay(form, actions)?)?
        }
        Script::MedicalRecord {
            inpatient_id,
            record_type,
            seed,
            actions,
        } => {
            let board = WardBoard::from_config(&config)?;
            let Some(inpatient) = board.inpatient(&inpatient_id) else {
                bail!("unknown inpatient {inpatient_id}");
            };
            let form = MedicalRecordForm::open(
                PatientInfo::from(inpatient),
                record_type,
                seed,
                &config,
                chrono::Local::now().naive_local(),
            );
            let form = replay(form, actions)?;
            tracing::info!("summary:\n{}", form.summary());
            serde_json::to_value(form)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Dispatch every action in order, then save and close.
///
/// Stops at the first rejected action.
fn replay<F>(form: F, actions: Vec<F::Action>) -> anyhow::Result<F>
where
    F: Form + Serialize,
    F::Action: Debug,
{
    let mut session = FormSession::new(form, TracingHost);
    let total = actions.len();
    let mut changed = 0usize;

    for (step, action) in actions.into_iter().enumerate() {
        let description = format!("{action:?}");
        if session
            .dispatch(action)
            .with_context(|| format!("action {} of {total} rejected: {description}", step + 1))?
        {
            changed += 1;
        }
    }

    tracing::info!(total, changed, "script replayed");
    session.save();
    let (draft, _host) = session.close();
    Ok(draft)
}
