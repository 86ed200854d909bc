// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Lung Disease Knowledge Base
// ─────────────────────────────────────────────────────────────────────
//! Reference frame for lung-disease risk: three worlds (Low, Medium,
//! High), their accessibility, their valuations, and the proposition
//! vocabulary extracted from patient records.

use std::sync::Arc;

use kripke_types::{KripkeResult, PossibleWorld, RiskLevel};

use crate::frame::KripkeFrame;
use crate::proposition::{Proposition, PropositionRegistry};

pub fn low_risk_world() -> PossibleWorld {
    PossibleWorld::new(RiskLevel::Low, "Low risk of lung disease")
}

pub fn medium_risk_world() -> PossibleWorld {
    PossibleWorld::new(RiskLevel::Medium, "Medium risk of lung disease")
}

pub fn high_risk_world() -> PossibleWorld {
    PossibleWorld::new(RiskLevel::High, "High risk of lung disease")
}

/// Age bands, gender, symptoms, risk factors, lab thresholds and
/// imaging findings.
pub fn lung_disease_propositions() -> PropositionRegistry {
    let mut registry = PropositionRegistry::new();

    // Age and gender
    registry.register_fn("young", "Patient is young (age < 30)", |p| p.age() < 30);
    registry.register_fn("middle_aged", "Patient is middle-aged (30-50)", |p| {
        (30..=50).contains(&p.age())
    });
    registry.register_fn("senior", "Patient is senior (age > 50)", |p| p.age() > 50);
    registry.register_fn("male", "Patient is male", |p| p.is_gender("M"));
    registry.register_fn("female", "Patient is female", |p| p.is_gender("F"));

    // Symptoms
    registry.register_fn("severe_cough", "Has severe cough (severity >= 7)", |p| {
        p.has_attribute("cough", 7.0)
    });
    registry.register_fn("coughing_blood", "Has coughing of blood", |p| {
        p.has_attribute("coughing_blood", 1.0)
    });
    registry.register_fn("chest_pain", "Has chest pain (severity >= 5)", |p| {
        p.has_attribute("chest_pain", 5.0)
    });
    registry.register_fn(
        "shortness_of_breath",
        "Has shortness of breath (severity >= 6)",
        |p| p.has_attribute("shortness_of_breath", 6.0),
    );
    registry.register_fn("fatigue", "Has fatigue (severity >= 6)", |p| {
        p.has_attribute("fatigue", 6.0)
    });
    registry.register_fn("weight_loss", "Has unexplained weight loss", |p| {
        p.has_attribute("weight_loss", 1.0)
    });
    registry.register_fn("wheezing", "Has wheezing", |p| p.has_attribute("wheezing", 1.0));

    // Risk factors
    registry.register_fn("smoker", "Current or former smoker", |p| {
        p.has_attribute("smoking_history", 1.0)
    });
    registry.register_fn("heavy_smoker", "Heavy smoker (smoking severity >= 8)", |p| {
        p.has_attribute("smoking_history", 8.0)
    });
    registry.register_fn("passive_smoker", "Exposed to passive smoking", |p| {
        p.has_attribute("passive_smoke_exposure", 1.0)
    });
    registry.register_fn("occupational_hazards", "Exposed to occupational hazards", |p| {
        p.has_attribute("occupational_exposure", 1.0)
    });
    registry.register_fn("air_pollution", "High exposure to air pollution", |p| {
        p.has_attribute("air_pollution_exposure", 6.0)
    });

    // Lab tests
    registry.register_fn("low_oxygen", "Low blood oxygen saturation (< 95%)", |p| {
        p.lab_value("oxygen_saturation").is_some_and(|v| v < 95.0)
    });
    registry.register_fn("high_wbc", "High white blood cell count (> 11,000)", |p| {
        p.lab_value("wbc_count").is_some_and(|v| v > 11_000.0)
    });

    // Imaging
    registry.register_fn("lung_mass_mri", "MRI shows lung mass", |p| p.has_finding("lung"));
    registry.register_fn("pleural_effusion_mri", "MRI shows pleural effusion", |p| {
        p.has_finding("pleural_effusion")
    });
    registry.register_fn("lymph_nodes_mri", "MRI shows enlarged lymph nodes", |p| {
        p.has_finding("lymph_nodes")
    });

    registry
}

/// The three-world lung-disease frame.
///
/// Accessibility: Low → {Low, Medium}, Medium → {Medium, Low, High},
/// High → {High, Medium}.
pub fn lung_disease_frame() -> KripkeResult<KripkeFrame> {
    let low = low_risk_world();
    let medium = medium_risk_world();
    let high = high_risk_world();

    KripkeFrame::builder()
        .worlds([low.clone(), medium.clone(), high.clone()])
        .accessible(&low, [low.clone(), medium.clone()])
        .accessible(&medium, [medium.clone(), low.clone(), high.clone()])
        .accessible(&high, [high.clone(), medium.clone()])
        .valuation(&low, ["young", "middle_aged", "female"])
        .valuation(
            &medium,
            [
                "middle_aged",
                "senior",
                "male",
                "chest_pain",
                "shortness_of_breath",
                "smoker",
                "passive_smoker",
            ],
        )
        .valuation(
            &high,
            [
                "senior",
                "male",
                "heavy_smoker",
                "coughing_blood",
                "chest_pain",
                "shortness_of_breath",
                "weight_loss",
                "occupational_hazards",
                "lung_mass_mri",
                "low_oxygen",
            ],
        )
        .registry(lung_disease_propositions())
        .build()
}

pub fn shared_lung_disease_frame() -> KripkeResult<Arc<KripkeFrame>> {
    lung_disease_frame().map(Arc::new)
}
