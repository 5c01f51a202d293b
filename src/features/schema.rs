//! Fixed patient feature schema and disease label set.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEATURE_COUNT: usize = 14;
pub const LABEL_COUNT: usize = 5;

/// One named input of the patient schema. Declaration order is the column order
/// every scaler and classifier is fitted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Age,
    Gender,
    Bmi,
    BloodPressureSys,
    BloodPressureDia,
    Cholesterol,
    Glucose,
    SmokingYears,
    AlcoholConsumption,
    PhysicalActivity,
    SleepHours,
    FamilyHistoryDiabetes,
    FamilyHistoryHeart,
    StressLevel,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Age,
        Feature::Gender,
        Feature::Bmi,
        Feature::BloodPressureSys,
        Feature::BloodPressureDia,
        Feature::Cholesterol,
        Feature::Glucose,
        Feature::SmokingYears,
        Feature::AlcoholConsumption,
        Feature::PhysicalActivity,
        Feature::SleepHours,
        Feature::FamilyHistoryDiabetes,
        Feature::FamilyHistoryHeart,
        Feature::StressLevel,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column / JSON key name.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Age => "age",
            Feature::Gender => "gender",
            Feature::Bmi => "bmi",
            Feature::BloodPressureSys => "blood_pressure_sys",
            Feature::BloodPressureDia => "blood_pressure_dia",
            Feature::Cholesterol => "cholesterol",
            Feature::Glucose => "glucose",
            Feature::SmokingYears => "smoking_years",
            Feature::AlcoholConsumption => "alcohol_consumption",
            Feature::PhysicalActivity => "physical_activity",
            Feature::SleepHours => "sleep_hours",
            Feature::FamilyHistoryDiabetes => "family_history_diabetes",
            Feature::FamilyHistoryHeart => "family_history_heart",
            Feature::StressLevel => "stress_level",
        }
    }

    /// Short key used by the web form for the same field, if it differs.
    pub fn form_alias(self) -> Option<&'static str> {
        match self {
            Feature::BloodPressureSys => Some("bp_sys"),
            Feature::BloodPressureDia => Some("bp_dia"),
            Feature::SmokingYears => Some("smoking"),
            Feature::AlcoholConsumption => Some("alcohol"),
            Feature::PhysicalActivity => Some("activity"),
            Feature::SleepHours => Some("sleep"),
            Feature::FamilyHistoryDiabetes => Some("family_diabetes"),
            Feature::FamilyHistoryHeart => Some("family_heart"),
            Feature::StressLevel => Some("stress"),
            _ => None,
        }
    }

    /// Resolve a canonical name or a form alias.
    pub fn from_key(key: &str) -> Option<Feature> {
        Feature::ALL
            .into_iter()
            .find(|f| f.name() == key || f.form_alias() == Some(key))
    }

    /// Flags restricted to {0, 1}.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Feature::Gender | Feature::FamilyHistoryDiabetes | Feature::FamilyHistoryHeart
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One independently modeled disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Diabetes,
    Hypertension,
    HeartDisease,
    Obesity,
    Depression,
}

impl Label {
    pub const ALL: [Label; LABEL_COUNT] = [
        Label::Diabetes,
        Label::Hypertension,
        Label::HeartDisease,
        Label::Obesity,
        Label::Depression,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Diabetes => "diabetes",
            Label::Hypertension => "hypertension",
            Label::HeartDisease => "heart_disease",
            Label::Obesity => "obesity",
            Label::Depression => "depression",
        }
    }

    /// Binary outcome column in the training dataset.
    pub fn outcome_column(self) -> &'static str {
        match self {
            Label::Diabetes => "has_diabetes",
            Label::Hypertension => "has_hypertension",
            Label::HeartDisease => "has_heart_disease",
            Label::Obesity => "has_obesity",
            Label::Depression => "has_depression",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Label::Diabetes => "Diabetes",
            Label::Hypertension => "Hypertension",
            Label::HeartDisease => "Heart disease",
            Label::Obesity => "Obesity",
            Label::Depression => "Depression",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_indices_follow_declaration_order() {
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
        for (i, l) in Label::ALL.iter().enumerate() {
            assert_eq!(l.index(), i);
        }
    }

    #[test]
    fn from_key_resolves_names_and_aliases() {
        assert_eq!(Feature::from_key("bmi"), Some(Feature::Bmi));
        assert_eq!(Feature::from_key("bp_sys"), Some(Feature::BloodPressureSys));
        assert_eq!(Feature::from_key("stress"), Some(Feature::StressLevel));
        assert_eq!(Feature::from_key("weight"), None);
    }

    #[test]
    fn only_flags_are_binary() {
        let binary: Vec<_> = Feature::ALL.into_iter().filter(|f| f.is_binary()).collect();
        assert_eq!(
            binary,
            vec![
                Feature::Gender,
                Feature::FamilyHistoryDiabetes,
                Feature::FamilyHistoryHeart
            ]
        );
    }
}
