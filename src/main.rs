//! Trains the ensemble from the configured dataset, then classifies one patient
//! read from a JSON file (first argument) or stdin.

use anyhow::Context;
use disease_risk::{
    config::{OutputFormat, RiskConfig},
    dataset::Dataset,
    logging::StructuredLogger,
    risk::render_table,
    service::RiskService,
    training::Trainer,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

fn read_patient(path: Option<String>) -> anyhow::Result<serde_json::Value> {
    let value = match path {
        Some(p) => {
            let data = std::fs::read_to_string(&p).with_context(|| format!("reading {}", p))?;
            serde_json::from_str(&data).with_context(|| format!("parsing {}", p))?
        }
        None => serde_json::from_reader(std::io::stdin().lock()).context("parsing stdin")?,
    };
    Ok(value)
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("RISK_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = RiskConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(dataset = ?config.dataset_path, "disease-risk starting");

    let dataset = Dataset::from_path(&config.dataset_path)
        .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;
    let service = RiskService::new(Trainer::from_config(&config));
    let report = service.retrain(&dataset)?;
    for l in &report.labels {
        info!(
            label = %l.label,
            accuracy = %format!("{:.2}%", l.test_accuracy * 100.0),
            "held-out accuracy"
        );
    }

    let patient = read_patient(std::env::args().nth(1))?;
    let result = service.predict_json(&patient)?;
    let records = result.to_records();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match config.output {
        OutputFormat::Json => StructuredLogger::emit_json(&records, &mut out)?,
        OutputFormat::Table => out.write_all(render_table(&records).as_bytes())?,
    }
    Ok(())
}
