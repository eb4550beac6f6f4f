//! rtp: train a remaining-time model from a JSON event log, or predict with one.
//!
//! Defaults come from the JSON config at `--config` / RTP_CONFIG_PATH.
//! Predictions go to stdout as one JSON line per trace; logs go to stderr.

use clap::{Parser, Subcommand};
use remaining_time::{
    config::PredictorConfig,
    eventlog::{EventLog, DEFAULT_ACTIVITY_KEY},
    logging::{PredictionRecord, StructuredLogger},
    model::persist,
    predictor::{self, Variant},
};
use std::path::{Path, PathBuf};
use tracing::info;

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "rtp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Predictor config (JSON); missing file means defaults
    #[arg(long, global = true, env = "RTP_CONFIG_PATH", default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a model on an event log and write the model file
    Train {
        /// Event log (JSON)
        log: PathBuf,
        /// Output model file; defaults to `model_path` from the config
        model: Option<PathBuf>,
        /// elasticnet or keras_rnn; defaults to `variant` from the config
        variant: Option<Variant>,
    },
    /// Predict the remaining time of every trace in a log
    Predict {
        /// Model file written by `train`
        model: PathBuf,
        /// Event log (JSON)
        log: PathBuf,
    },
}

fn run_train(config: &PredictorConfig, log_path: &Path, model: Option<PathBuf>, variant: Option<Variant>) -> CliResult<()> {
    let model_path = model.unwrap_or_else(|| config.model_path.clone());
    let variant = variant.unwrap_or(config.variant);

    let log = EventLog::from_json_file(log_path)?;
    info!(traces = log.len(), %variant, "training");
    let bundle = predictor::train(&log, variant, &config.train)?;
    persist::save(&bundle, &model_path)?;
    info!(model_id = %bundle.model_id, path = %model_path.display(), "training complete");
    Ok(())
}

fn run_predict(model_path: &Path, log_path: &Path) -> CliResult<()> {
    let bundle = persist::load(model_path)?;
    let log = EventLog::from_json_file(log_path)?;
    let prediction = predictor::test(&bundle, &log)?;

    let ts = chrono::Utc::now().to_rfc3339();
    let model_id = bundle.model_id.to_string();
    let mut out = std::io::stdout().lock();
    for (i, (trace, remaining)) in log.iter().zip(prediction.values()).enumerate() {
        let record = PredictionRecord {
            ts: ts.clone(),
            model_id: model_id.clone(),
            variant: bundle.variant().as_str(),
            trace: i,
            remaining_seconds: remaining,
            case_id: trace.attributes.get(DEFAULT_ACTIVITY_KEY).map(|v| v.to_string()),
        };
        StructuredLogger::emit_json(&record, &mut out)?;
    }
    info!(traces = log.len(), "prediction complete");
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = PredictorConfig::load(&cli.config);

    StructuredLogger::init(config.log.json, &config.log.level);

    match cli.command {
        Commands::Train { log, model, variant } => run_train(&config, &log, model, variant),
        Commands::Predict { model, log } => run_predict(&model, &log),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn train_parses_variant_by_name() {
        let cli = Cli::try_parse_from(["rtp", "train", "log.json", "m.json", "keras_rnn"]).unwrap();
        match cli.command {
            Commands::Train { log, model, variant } => {
                assert_eq!(log, PathBuf::from("log.json"));
                assert_eq!(model, Some(PathBuf::from("m.json")));
                assert_eq!(variant, Some(Variant::SequenceModel));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Cli::try_parse_from(["rtp", "train", "log.json", "m.json", "svr"]).is_err());
    }

    #[test]
    fn predict_needs_model_and_log() {
        assert!(Cli::try_parse_from(["rtp", "predict", "m.json"]).is_err());
        let cli = Cli::try_parse_from(["rtp", "--config", "c.json", "predict", "m.json", "l.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("c.json"));
        assert!(matches!(cli.command, Commands::Predict { .. }));
    }
}
