// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Subject Model
// ─────────────────────────────────────────────────────────────────────
//! The evaluated entity: one subject per input record.
//!
//! A `Subject` is immutable once built. Lookups on absent data answer
//! `false` / `None` so that proposition predicates stay total.

use serde::{Deserialize, Serialize};

/// A named, severity-scored attribute (symptom, exposure, habit).
///
/// Integer scales from tabular data are stored as whole-valued `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub severity: f64,
}

impl Attribute {
    pub fn new(name: impl Into<String>, severity: impl Into<f64>) -> Self {
        Self {
            name: name.into(),
            severity: severity.into(),
        }
    }
}

/// A numeric laboratory measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub name: String,
    pub value: f64,
}

/// An imaging observation (e.g. "lung" mass, "pleural_effusion").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingFinding {
    pub name: String,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    id: String,
    age: u32,
    gender: String,
    attributes: Vec<Attribute>,
    lab_results: Vec<LabResult>,
    findings: Vec<ImagingFinding>,
}

impl Subject {
    pub fn builder(id: impl Into<String>, age: u32, gender: impl Into<String>) -> SubjectBuilder {
        SubjectBuilder {
            subject: Subject {
                id: id.into(),
                age,
                gender: gender.into(),
                attributes: Vec::new(),
                lab_results: Vec::new(),
                findings: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Case-insensitive gender check ("M", "f", ...).
    pub fn is_gender(&self, code: &str) -> bool {
        self.gender.trim().eq_ignore_ascii_case(code)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// First attribute with this name, if any.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// True iff some attribute named `name` has severity >= `min_severity`.
    pub fn has_attribute(&self, name: &str, min_severity: f64) -> bool {
        self.attributes
            .iter()
            .any(|a| a.name == name && a.severity >= min_severity)
    }

    pub fn lab_value(&self, name: &str) -> Option<f64> {
        self.lab_results
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value)
    }

    pub fn has_finding(&self, name: &str) -> bool {
        self.findings.iter().any(|f| f.name == name && f.present)
    }
}

/// Assembles a `Subject`; the subject is frozen by `build()`.
#[derive(Debug, Clone)]
pub struct SubjectBuilder {
    subject: Subject,
}

impl SubjectBuilder {
    pub fn attribute(mut self, name: impl Into<String>, severity: impl Into<f64>) -> Self {
        self.subject.attributes.push(Attribute::new(name, severity));
        self
    }

    pub fn lab_result(mut self, name: impl Into<String>, value: f64) -> Self {
        self.subject.lab_results.push(LabResult {
            name: name.into(),
            value,
        });
        self
    }

    pub fn finding(mut self, name: impl Into<String>, present: bool) -> Self {
        self.subject.findings.push(ImagingFinding {
            name: name.into(),
            present,
        });
        self
    }

    pub fn build(self) -> Subject {
        self.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Subject {
        Subject::builder("P1", 62, "M")
            .attribute("chest_pain", 6)
            .attribute("smoking_history", 8)
            .lab_result("oxygen_saturation", 93.5)
            .finding("lung", true)
            .finding("lymph_nodes", false)
            .build()
    }

    #[test]
    fn test_accessors() {
        let s = sample();
        assert_eq!(s.id(), "P1");
        assert_eq!(s.age(), 62);
        assert_eq!(s.gender(), "M");
        assert_eq!(s.attributes().len(), 2);
    }

    #[test]
    fn test_has_attribute_threshold() {
        let s = sample();
        assert!(s.has_attribute("chest_pain", 5.0));
        assert!(s.has_attribute("chest_pain", 6.0));
        assert!(!s.has_attribute("chest_pain", 7.0));
        assert!(!s.has_attribute("wheezing", 1.0));
    }

    #[test]
    fn test_absent_lab_is_none() {
        let s = sample();
        assert_eq!(s.lab_value("oxygen_saturation"), Some(93.5));
        assert_eq!(s.lab_value("wbc_count"), None);
    }

    #[test]
    fn test_findings_require_presence() {
        let s = sample();
        assert!(s.has_finding("lung"));
        assert!(!s.has_finding("lymph_nodes"));
        assert!(!s.has_finding("pleural_effusion"));
    }

    #[test]
    fn test_gender_case_insensitive() {
        let s = Subject::builder("P2", 40, "f").build();
        assert!(s.is_gender("F"));
        assert!(!s.is_gender("M"));
    }
}
