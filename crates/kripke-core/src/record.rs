// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Record → Subject Mapping
// ─────────────────────────────────────────────────────────────────────
//! Translation of one named-field record (one row of the lung cancer
//! dataset) into a `Subject`.
//!
//! Numeric coercion: trimmed integer parse, real-valued text truncated,
//! anything else (including a missing column) becomes 0.

use std::collections::{BTreeMap, HashMap};

use kripke_types::Subject;

/// Source of named string fields.
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<'a> FieldSource for HashMap<&'a str, &'a str> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).copied()
    }
}

pub const ID_COLUMN: &str = "Patient Id";
pub const AGE_COLUMN: &str = "Age";
pub const GENDER_COLUMN: &str = "Gender";
pub const LABEL_COLUMN: &str = "Level";
pub const SMOKING_COLUMN: &str = "Smoking";
pub const PASSIVE_SMOKER_COLUMN: &str = "Passive Smoker";

/// Dataset column → attribute name.
pub const ATTRIBUTE_COLUMNS: [(&str, &str); 14] = [
    ("Air Pollution", "air_pollution_exposure"),
    ("Alcohol use", "alcohol_use"),
    ("Dust Allergy", "dust_allergy"),
    ("OccuPational Hazards", "occupational_exposure"),
    ("Chest Pain", "chest_pain"),
    ("Coughing of Blood", "coughing_blood"),
    ("Fatigue", "fatigue"),
    ("Weight Loss", "weight_loss"),
    ("Shortness of Breath", "shortness_of_breath"),
    ("Wheezing", "wheezing"),
    ("Swallowing Difficulty", "swallowing_difficulty"),
    ("Frequent Cold", "frequent_cold"),
    ("Dry Cough", "dry_cough"),
    ("Snoring", "snoring"),
];

/// Integer value of a field; invalid or missing → 0.
pub fn coerce_int(raw: Option<&str>) -> i64 {
    let Some(text) = raw.map(str::trim) else {
        return 0;
    };
    if let Ok(v) = text.parse::<i64>() {
        return v;
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

/// Build a subject from a dataset row.
///
/// Gender code 1 maps to "M", everything else to "F". Smoking and
/// passive smoking only become attributes when at least 1.
pub fn subject_from_record(record: &impl FieldSource) -> Subject {
    let id = record.field(ID_COLUMN).unwrap_or_default().trim().to_string();
    let age = u32::try_from(coerce_int(record.field(AGE_COLUMN))).unwrap_or(0);
    let gender = if coerce_int(record.field(GENDER_COLUMN)) == 1 {
        "M"
    } else {
        "F"
    };

    let mut builder = Subject::builder(id, age, gender);
    for (column, attribute) in ATTRIBUTE_COLUMNS {
        builder = builder.attribute(attribute, coerce_int(record.field(column)) as f64);
    }

    let smoking = coerce_int(record.field(SMOKING_COLUMN));
    if smoking >= 1 {
        builder = builder.attribute("smoking_history", smoking as f64);
    }
    let passive = coerce_int(record.field(PASSIVE_SMOKER_COLUMN));
    if passive >= 1 {
        builder = builder.attribute("passive_smoke_exposure", passive as f64);
    }

    builder.build()
}

/// Raw ground-truth label of the row, if the column exists.
pub fn ground_truth_label(record: &impl FieldSource) -> Option<String> {
    record.field(LABEL_COLUMN).map(str::to_string)
}
