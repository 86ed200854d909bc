// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied: PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Kripke risk engine.
//!
//! Exposes `EngineConfig` and `ModalEngine` (built on the lung-disease
//! frame) so the GUI and batch layers can select the modal backend
//! alongside the other reasoners.
//!
//! # FFI Safety
//!
//! - Frame construction errors and invalid configs → `ValueError`.
//! - Subjects are copied out of Python objects before evaluation; no
//!   Python reference is held while the engine runs.
//!
//! Install: `pip install -e crates/kripke-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from kripke_engine import ModalEngine
//!
//! engine = ModalEngine()
//! engine.classify({"id": "P1", "age": 62, "gender": "M",
//!                  "attributes": {"smoking_history": 8, "chest_pain": 6}})
//! ```

use std::collections::HashMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use kripke_core::{lung_disease_frame, subject_from_record, ModalEvaluator, RiskBackend};
use kripke_types::{
    Assessment, EngineConfig, KripkeError, RankedWorld, Subject, WorldEvaluation, WorldId,
};

fn to_py_err(e: KripkeError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Read a subject from a dict with keys `id`, `age`, `gender` and the
/// optional maps `attributes`, `lab_results`, `findings`.
fn subject_from_dict(dict: &Bound<'_, PyDict>) -> PyResult<Subject> {
    let id: String = match dict.get_item("id")? {
        Some(v) => v.str()?.to_string(),
        None => String::new(),
    };
    let age: u32 = match dict.get_item("age")? {
        Some(v) => v.extract()?,
        None => 0,
    };
    let gender: String = match dict.get_item("gender")? {
        Some(v) => v.extract()?,
        None => String::new(),
    };

    let mut builder = Subject::builder(id, age, gender);
    if let Some(attrs) = dict.get_item("attributes")? {
        let attrs: HashMap<String, f64> = attrs.extract()?;
        let mut attrs: Vec<_> = attrs.into_iter().collect();
        attrs.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, severity) in attrs {
            builder = builder.attribute(name, severity);
        }
    }
    if let Some(labs) = dict.get_item("lab_results")? {
        let labs: HashMap<String, f64> = labs.extract()?;
        for (name, value) in labs {
            builder = builder.lab_result(name, value);
        }
    }
    if let Some(findings) = dict.get_item("findings")? {
        let findings: HashMap<String, bool> = findings.extract()?;
        for (name, present) in findings {
            builder = builder.finding(name, present);
        }
    }
    Ok(builder.build())
}

/// Read a subject from a raw dataset row (column name → any value).
fn subject_from_row(row: &Bound<'_, PyDict>) -> PyResult<Subject> {
    let mut record: HashMap<String, String> = HashMap::with_capacity(row.len());
    for (key, value) in row.iter() {
        record.insert(key.str()?.to_string(), value.str()?.to_string());
    }
    Ok(subject_from_record(&record))
}

fn ranked_to_dict<'py>(py: Python<'py>, r: &RankedWorld) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("world", r.world_id.index())?;
    dict.set_item("risk_level", r.risk.as_str())?;
    dict.set_item("description", &r.world.description)?;
    dict.set_item("match_score", r.match_score)?;
    dict.set_item("match_percentage", r.match_percentage)?;
    dict.set_item("match_propositions", r.matched.iter().collect::<Vec<_>>())?;
    dict.set_item("is_possible", r.is_possible)?;
    Ok(dict)
}

fn evaluation_to_dict<'py>(py: Python<'py>, e: &WorldEvaluation) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("world", e.world_id.index())?;
    dict.set_item("risk_level", e.world.risk.as_str())?;
    dict.set_item("active", e.active.iter().collect::<Vec<_>>())?;
    dict.set_item("world_propositions", e.world_propositions.iter().collect::<Vec<_>>())?;
    dict.set_item("matched", e.matched.iter().collect::<Vec<_>>())?;
    dict.set_item("match_score", e.match_score)?;
    dict.set_item("match_percentage", e.match_percentage)?;
    dict.set_item("is_possible", e.is_possible)?;
    Ok(dict)
}

fn assessment_to_dict<'py>(py: Python<'py>, a: &Assessment) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("backend", &a.backend)?;
    dict.set_item("risk_level", a.risk.map(|r| r.as_str()))?;
    dict.set_item("confidence", a.confidence)?;
    dict.set_item("evidence", a.evidence.clone())?;
    Ok(dict)
}

// ─── PyEngineConfig ─────────────────────────────────────────────────

/// Python-visible ranking policy.
#[pyclass(name = "EngineConfig")]
#[derive(Clone)]
struct PyEngineConfig {
    inner: EngineConfig,
}

#[pymethods]
impl PyEngineConfig {
    #[new]
    #[pyo3(signature = (possible_threshold = 2, top_n = 3, fallback_to_all = true))]
    fn new(possible_threshold: usize, top_n: usize, fallback_to_all: bool) -> PyResult<Self> {
        let config = EngineConfig {
            possible_threshold,
            top_n,
            fallback_to_all,
        };
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = EngineConfig::from_json(json).map_err(to_py_err)?;
        config.validate().map_err(to_py_err)?;
        Ok(Self { inner: config })
    }

    #[getter]
    fn possible_threshold(&self) -> usize {
        self.inner.possible_threshold
    }

    #[getter]
    fn top_n(&self) -> usize {
        self.inner.top_n
    }

    #[getter]
    fn fallback_to_all(&self) -> bool {
        self.inner.fallback_to_all
    }

    fn __repr__(&self) -> String {
        format!(
            "EngineConfig(possible_threshold={}, top_n={}, fallback_to_all={})",
            self.inner.possible_threshold, self.inner.top_n, self.inner.fallback_to_all
        )
    }
}

// ─── ModalEngine ────────────────────────────────────────────────────

/// Kripke-semantics classifier over the lung-disease frame.
#[pyclass(name = "ModalEngine")]
struct PyModalEngine {
    inner: ModalEvaluator,
}

#[pymethods]
impl PyModalEngine {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PyEngineConfig>) -> PyResult<Self> {
        let frame = lung_disease_frame().map_err(to_py_err)?;
        let config = config.map(|c| c.inner).unwrap_or_default();
        let inner = ModalEvaluator::new(frame.into(), config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Ranked worlds for a subject dict.
    #[pyo3(signature = (subject, top_n = None))]
    fn rank<'py>(
        &self,
        py: Python<'py>,
        subject: &Bound<'py, PyDict>,
        top_n: Option<usize>,
    ) -> PyResult<Bound<'py, PyList>> {
        let subject = subject_from_dict(subject)?;
        let ranked = match top_n {
            Some(top_n) => self.inner.rank(&subject, top_n),
            None => self.inner.rank_default(&subject),
        };
        let items = ranked
            .iter()
            .map(|r| ranked_to_dict(py, r))
            .collect::<PyResult<Vec<_>>>()?;
        PyList::new(py, items)
    }

    /// Ranked worlds for a raw dataset row.
    #[pyo3(signature = (row, top_n = None))]
    fn rank_record<'py>(
        &self,
        py: Python<'py>,
        row: &Bound<'py, PyDict>,
        top_n: Option<usize>,
    ) -> PyResult<Bound<'py, PyList>> {
        let subject = subject_from_row(row)?;
        let ranked = match top_n {
            Some(top_n) => self.inner.rank(&subject, top_n),
            None => self.inner.rank_default(&subject),
        };
        let items = ranked
            .iter()
            .map(|r| ranked_to_dict(py, r))
            .collect::<PyResult<Vec<_>>>()?;
        PyList::new(py, items)
    }

    /// Full per-world evaluation.
    fn evaluate<'py>(
        &self,
        py: Python<'py>,
        subject: &Bound<'py, PyDict>,
    ) -> PyResult<Bound<'py, PyList>> {
        let subject = subject_from_dict(subject)?;
        let items = self
            .inner
            .evaluate(&subject)
            .iter()
            .map(|e| evaluation_to_dict(py, e))
            .collect::<PyResult<Vec<_>>>()?;
        PyList::new(py, items)
    }

    /// Predicted risk label ("Low" / "Medium" / "High") or None.
    fn classify(&self, subject: &Bound<'_, PyDict>) -> PyResult<Option<&'static str>> {
        let subject = subject_from_dict(subject)?;
        Ok(self.inner.classify(&subject).map(|r| r.as_str()))
    }

    /// Backend-neutral assessment dict.
    fn assess<'py>(
        &self,
        py: Python<'py>,
        subject: &Bound<'py, PyDict>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let subject = subject_from_dict(subject)?;
        assessment_to_dict(py, &self.inner.assess(&subject))
    }

    fn believes(&self, world: usize, name: &str) -> bool {
        self.inner.believes(WorldId(world), name)
    }

    fn knows(&self, world: usize, name: &str) -> bool {
        self.inner.knows(WorldId(world), name)
    }

    fn possibly(&self, world: usize, name: &str) -> bool {
        self.inner.possibly(WorldId(world), name)
    }

    fn necessarily(&self, world: usize, name: &str) -> bool {
        self.inner.necessarily(WorldId(world), name)
    }

    /// `(index, risk_level, description)` for every world.
    fn worlds(&self) -> Vec<(usize, &'static str, String)> {
        self.inner
            .frame()
            .world_ids()
            .zip(self.inner.frame().worlds())
            .map(|(id, w)| (id.index(), w.risk.as_str(), w.description.clone()))
            .collect()
    }

    fn proposition_names(&self) -> Vec<String> {
        self.inner
            .frame()
            .registry()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    #[getter]
    fn backend_name(&self) -> String {
        self.inner.name().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "ModalEngine(worlds={}, propositions={}, threshold={})",
            self.inner.frame().len(),
            self.inner.frame().proposition_count(),
            self.inner.config().possible_threshold
        )
    }
}

// ─── Module Registration ────────────────────────────────────────────

/// Kripke risk engine: modal reasoning backend for Python callers.
///
/// - `EngineConfig`: ranking policy
/// - `ModalEngine`: lung-disease modal classifier
#[pymodule]
fn kripke_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEngineConfig>()?;
    m.add_class::<PyModalEngine>()?;
    Ok(())
}
