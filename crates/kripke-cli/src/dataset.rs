// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — CSV Dataset Loader
// ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use kripke_core::record::{ground_truth_label, subject_from_record};
use kripke_core::LabeledSubject;

/// Load every row of a CSV file as a labelled subject.
///
/// Rows that cannot be read at the CSV level are skipped with a
/// warning; field-level problems are absorbed by the record mapping.
pub fn load_subjects(path: &Path, limit: Option<usize>) -> Result<Vec<LabeledSubject>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV headers: {}", path.display()))?
        .clone();

    let mut subjects = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        if limit.is_some_and(|n| subjects.len() >= n) {
            break;
        }
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                log::warn!("skipping CSV row {}: {e}", idx + 2);
                continue;
            }
        };
        let record: HashMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        subjects.push(LabeledSubject::new(
            subject_from_record(&record),
            ground_truth_label(&record),
        ));
    }

    log::info!("loaded {} subjects from {}", subjects.len(), path.display());
    Ok(subjects)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_subjects() {
        let file = write_csv(
            "Patient Id,Age,Gender,Smoking,Chest Pain,Level\n\
             P1,33,1,4,6,Medium\n\
             P2,21,2,0,0,Low\n",
        );
        let subjects = load_subjects(file.path(), None).unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].subject.id(), "P1");
        assert_eq!(subjects[0].subject.gender(), "M");
        assert!(subjects[0].subject.has_attribute("smoking_history", 4.0));
        assert_eq!(subjects[1].label.as_deref(), Some("Low"));
    }

    #[test]
    fn test_limit() {
        let file = write_csv(
            "Patient Id,Age,Gender,Level\n\
             A,30,1,Low\n\
             B,40,2,High\n\
             C,50,1,Medium\n",
        );
        let subjects = load_subjects(file.path(), Some(2)).unwrap();
        assert_eq!(subjects.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_subjects(&dir.path().join("kripke.csv"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV file"));
    }
}
