//! Validated patient feature vector.

use super::schema::{Feature, FEATURE_COUNT};
use crate::error::SchemaError;
use serde_json::Value;

/// All 14 schema fields, each finite, flags in {0, 1}. Ordered by [`Feature::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build from values already in schema order.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Result<Self, SchemaError> {
        for feature in Feature::ALL {
            check_value(feature, values[feature.index()])?;
        }
        Ok(Self { values })
    }

    /// Parse a JSON object keyed by feature name (or web form alias).
    /// Numeric strings are accepted; anything else non-numeric is rejected.
    pub fn from_json(input: &Value) -> Result<Self, SchemaError> {
        let obj = input.as_object().ok_or(SchemaError::NotAnObject)?;
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];

        for (key, raw) in obj {
            let feature =
                Feature::from_key(key).ok_or_else(|| SchemaError::UnknownField(key.clone()))?;
            let slot = &mut slots[feature.index()];
            if slot.is_some() {
                return Err(SchemaError::DuplicateField(feature.name()));
            }
            let value = numeric(feature, raw)?;
            check_value(feature, value)?;
            *slot = Some(value);
        }

        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] =
                slots[feature.index()].ok_or(SchemaError::MissingField(feature.name()))?;
        }
        Ok(Self { values })
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

fn numeric(feature: Feature, raw: &Value) -> Result<f64, SchemaError> {
    let non_numeric = || SchemaError::NonNumeric {
        field: feature.name(),
        value: raw.to_string(),
    };
    match raw {
        Value::Number(n) => n.as_f64().ok_or_else(non_numeric),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| non_numeric()),
        _ => Err(non_numeric()),
    }
}

fn check_value(feature: Feature, value: f64) -> Result<(), SchemaError> {
    if !value.is_finite() {
        return Err(SchemaError::NonFinite(feature.name()));
    }
    if feature.is_binary() && value != 0.0 && value != 1.0 {
        return Err(SchemaError::NotBinary {
            field: feature.name(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patient() -> Value {
        json!({
            "age": 45, "gender": 0, "bmi": 27.5,
            "blood_pressure_sys": 130, "blood_pressure_dia": 85,
            "cholesterol": 200, "glucose": 95,
            "smoking_years": 0, "alcohol_consumption": 2,
            "physical_activity": 3, "sleep_hours": 7,
            "family_history_diabetes": 0, "family_history_heart": 1,
            "stress_level": 4
        })
    }

    #[test]
    fn parses_canonical_keys_in_schema_order() {
        let fv = FeatureVector::from_json(&patient()).unwrap();
        assert_eq!(fv.get(Feature::Age), 45.0);
        assert_eq!(fv.get(Feature::Bmi), 27.5);
        assert_eq!(fv.as_slice()[Feature::StressLevel.index()], 4.0);
    }

    #[test]
    fn missing_bmi_is_rejected() {
        let mut p = patient();
        p.as_object_mut().unwrap().remove("bmi");
        assert_eq!(
            FeatureVector::from_json(&p),
            Err(SchemaError::MissingField("bmi"))
        );
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        let mut p = patient();
        p["glucose"] = json!("high");
        assert!(matches!(
            FeatureVector::from_json(&p),
            Err(SchemaError::NonNumeric { field: "glucose", .. })
        ));
        p["glucose"] = json!(null);
        assert!(matches!(
            FeatureVector::from_json(&p),
            Err(SchemaError::NonNumeric { field: "glucose", .. })
        ));
    }

    #[test]
    fn form_aliases_and_numeric_strings_are_accepted() {
        let form = json!({
            "age": "45", "gender": "0", "bmi": "27.5",
            "bp_sys": "130", "bp_dia": "85",
            "cholesterol": "200", "glucose": "95",
            "smoking": "0", "alcohol": "2", "activity": "3", "sleep": "7",
            "family_diabetes": "0", "family_heart": "1", "stress": "4"
        });
        let fv = FeatureVector::from_json(&form).unwrap();
        assert_eq!(fv, FeatureVector::from_json(&patient()).unwrap());
    }

    #[test]
    fn alias_and_name_together_is_duplicate() {
        let mut p = patient();
        p["stress"] = json!(5);
        assert_eq!(
            FeatureVector::from_json(&p),
            Err(SchemaError::DuplicateField("stress_level"))
        );
    }

    #[test]
    fn flags_must_be_binary() {
        let mut p = patient();
        p["gender"] = json!(2);
        assert!(matches!(
            FeatureVector::from_json(&p),
            Err(SchemaError::NotBinary { field: "gender", .. })
        ));
    }

    #[test]
    fn unknown_keys_and_non_objects_are_rejected() {
        let mut p = patient();
        p["weight"] = json!(80);
        assert_eq!(
            FeatureVector::from_json(&p),
            Err(SchemaError::UnknownField("weight".into()))
        );
        assert_eq!(
            FeatureVector::from_json(&json!([1, 2])),
            Err(SchemaError::NotAnObject)
        );
    }

    #[test]
    fn from_values_checks_finiteness() {
        let mut values = [1.0; FEATURE_COUNT];
        values[Feature::Age.index()] = f64::NAN;
        assert_eq!(
            FeatureVector::from_values(values),
            Err(SchemaError::NonFinite("age"))
        );
    }
}
