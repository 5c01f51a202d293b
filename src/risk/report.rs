//! Presentation of prediction results: percent probabilities rounded to two
//! decimals, and a console table.

use super::engine::{PredictionResult, RiskBucket};
use crate::features::Label;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRecord {
    pub label: Label,
    pub name: &'static str,
    /// Percent, 0–100, two decimals
    pub probability: f64,
    pub risk: RiskBucket,
}

/// Probability in [0, 1] to a percentage rounded to two decimals.
pub fn to_percent(p: f64) -> f64 {
    (p.clamp(0.0, 1.0) * 10_000.0).round() / 100.0
}

impl PredictionResult {
    /// Records in label order.
    pub fn to_records(&self) -> Vec<RiskRecord> {
        self.entries()
            .iter()
            .map(|e| RiskRecord {
                label: e.label,
                name: e.label.display_name(),
                probability: to_percent(e.probability),
                risk: e.bucket,
            })
            .collect()
    }
}

/// Fixed-width table, highest probability first.
pub fn render_table(records: &[RiskRecord]) -> String {
    let mut sorted: Vec<&RiskRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));

    let mut out = String::new();
    let rule = "=".repeat(48);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{:<20} | {:>7} | {}", "Condition", "Risk %", "Level");
    let _ = writeln!(out, "{}", rule);
    for r in sorted {
        let _ = writeln!(
            out,
            "{:<20} | {:>6.2}% | {}",
            r.name,
            r.probability,
            r.risk.as_str().replace('_', " ")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(to_percent(0.123456), 12.35);
        assert_eq!(to_percent(0.0), 0.0);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.99999), 100.0);
    }

    #[test]
    fn table_sorts_by_probability() {
        let records = vec![
            RiskRecord {
                label: Label::Diabetes,
                name: Label::Diabetes.display_name(),
                probability: 12.5,
                risk: RiskBucket::Low,
            },
            RiskRecord {
                label: Label::Obesity,
                name: Label::Obesity.display_name(),
                probability: 81.25,
                risk: RiskBucket::VeryHigh,
            },
        ];
        let table = render_table(&records);
        let obesity = table.find("Obesity").unwrap();
        let diabetes = table.find("Diabetes").unwrap();
        assert!(obesity < diabetes);
        assert!(table.contains(" 81.25% | very high"));
    }

    #[test]
    fn record_serialises_label_and_bucket() {
        let r = RiskRecord {
            label: Label::HeartDisease,
            name: Label::HeartDisease.display_name(),
            probability: 42.0,
            risk: RiskBucket::Medium,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["label"], "heart_disease");
        assert_eq!(v["risk"], "medium");
        assert_eq!(v["probability"], 42.0);
    }
}
