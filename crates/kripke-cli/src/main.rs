// ─────────────────────────────────────────────────────────────────────
// Kripke Risk Engine — Batch Classification CLI
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Lung-disease risk assessment over a CSV dataset using Kripke
//! semantics.
//!
//! Usage:
//!   kripke classify --input lung_cancer.csv [--config engine.json] [--demo]
//!   kripke structure
//!
//! `RUST_LOG` controls log verbosity (default `info`).

mod dataset;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kripke_core::{
    shared_lung_disease_frame, BatchReport, ClassificationDriver, ModalEvaluator,
};
use kripke_types::{EngineConfig, Subject};

/// Propositions probed by the modal demonstration.
const DEMO_PROPOSITIONS: [&str; 4] = [
    "coughing_blood",
    "chest_pain",
    "shortness_of_breath",
    "young",
];

/// Subjects printed in detail before the summary.
const DEFAULT_PREVIEW: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "kripke")]
#[command(about = "Lung disease risk assessment using Kripke semantics")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every row of a CSV dataset and report accuracy
    Classify {
        /// Path to the CSV dataset
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Engine config as a JSON file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Override the ranking depth
        #[arg(long)]
        top_n: Option<usize>,

        /// Limit the number of rows processed
        #[arg(long, short = 'l')]
        limit: Option<usize>,

        /// Number of subjects printed in detail
        #[arg(long, default_value_t = DEFAULT_PREVIEW)]
        preview: usize,

        /// Print the modal operator demonstration for the first subject
        #[arg(long)]
        demo: bool,

        /// Emit the batch report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print worlds, accessibility and valuations of the frame
    Structure,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Classify {
            input,
            config,
            top_n,
            limit,
            preview,
            demo,
            json,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(top_n) = top_n {
                config.top_n = top_n;
            }
            let evaluator = ModalEvaluator::new(shared_lung_disease_frame()?, config)?;
            run_classify(&evaluator, &input, limit, preview, demo, json)
        }
        Command::Structure => {
            let evaluator = ModalEvaluator::with_defaults(shared_lung_disease_frame()?);
            print_structure(&evaluator);
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = EngineConfig::from_json(&json)?;
    config.validate()?;
    Ok(config)
}

fn run_classify(
    evaluator: &ModalEvaluator,
    input: &std::path::Path,
    limit: Option<usize>,
    preview: usize,
    demo: bool,
    json: bool,
) -> Result<()> {
    let subjects = dataset::load_subjects(input, limit)?;
    let report = ClassificationDriver::new(evaluator).classify_batch(&subjects);

    if json {
        println!("{}", report_json(&report)?);
        return Ok(());
    }

    println!("LUNG DISEASE RISK ASSESSMENT USING KRIPKE SEMANTICS");
    println!("{}", "=".repeat(60));
    print_preview(&report, preview);

    match report.accuracy() {
        Some(accuracy) => println!(
            "\nOverall Accuracy: {accuracy:.1}% ({}/{})",
            report.correct(),
            report.scored()
        ),
        None => println!("\nNo subject carried a usable ground-truth label"),
    }
    if report.unlabeled() > 0 {
        println!("Unscored subjects: {}", report.unlabeled());
    }

    if demo {
        if let Some(first) = subjects.first() {
            demonstrate_modal_operators(evaluator, &first.subject);
        }
    }
    Ok(())
}

fn print_preview(report: &BatchReport, preview: usize) {
    for r in report.reports().iter().take(preview) {
        println!("\nPatient: {}", r.subject_id);
        println!("  Age: {}, Gender: {}", r.age, r.gender);
        println!(
            "  Predicted: {}",
            r.predicted.map_or("Unknown", |p| p.as_str())
        );
        println!("  Actual: {}", r.actual.map_or("Unknown", |a| a.as_str()));
        match r.correct {
            Some(true) => println!("  Correct: yes"),
            Some(false) => println!("  Correct: no"),
            None => println!("  Correct: n/a"),
        }
        println!("  Top predictions:");
        for pred in r.top_predictions.iter().take(2) {
            println!("    - {}: {:.1}% match", pred.risk, pred.match_percentage);
            if !pred.matched.is_empty() {
                let names: Vec<&str> = pred.matched.iter().map(String::as_str).collect();
                println!("      Matching propositions: {}", names.join(", "));
            }
        }
    }
}

fn report_json(report: &BatchReport) -> Result<String> {
    let reports: Vec<serde_json::Value> = report
        .reports()
        .iter()
        .map(|r| {
            serde_json::json!({
                "subject_id": r.subject_id,
                "age": r.age,
                "gender": r.gender,
                "predicted": r.predicted,
                "actual": r.actual,
                "correct": r.correct,
                "top_predictions": r.top_predictions,
            })
        })
        .collect();
    let body = serde_json::json!({
        "accuracy": report.accuracy(),
        "correct": report.correct(),
        "scored": report.scored(),
        "unlabeled": report.unlabeled(),
        "reports": reports,
    });
    Ok(serde_json::to_string_pretty(&body)?)
}

fn demonstrate_modal_operators(evaluator: &ModalEvaluator, subject: &Subject) {
    println!("\n{}", "=".repeat(60));
    println!("MODAL LOGIC DEMONSTRATION");
    println!("{}", "=".repeat(60));

    let frame = evaluator.frame();
    let Some(current) = evaluator.most_likely_world(subject) else {
        println!("Could not determine likely world");
        return;
    };
    let Some(world) = frame.world(current) else {
        return;
    };

    println!("\nPatient {} is most likely in: {}", subject.id(), world.description);
    println!("Risk Level: {}", world.risk);
    println!("\nModal Analysis:");
    println!("{}", "-".repeat(40));

    for name in DEMO_PROPOSITIONS {
        let Some(proposition) = frame.registry().get(name) else {
            continue;
        };
        let profile = evaluator.modal_profile(current, name);
        println!("\nProposition: {name} ({})", proposition.description());
        println!("  True for patient: {}", proposition.holds(subject));
        println!("  Believes in current world: {}", profile.believes);
        println!("  Known (true in all accessible worlds): {}", profile.knows);
        println!("  Possible (true in some accessible world): {}", profile.possibly);
        println!("  Necessary: {}", profile.necessarily);
    }
}

fn print_structure(evaluator: &ModalEvaluator) {
    let frame = evaluator.frame();
    println!("KRIPKE MODEL STRUCTURE");
    println!("{}", "=".repeat(60));
    println!("\nNumber of worlds: {}", frame.len());
    println!("Number of propositions: {}", frame.proposition_count());

    println!("\nWorlds:");
    for (id, world) in frame.world_ids().zip(frame.worlds()) {
        let count = frame.valuation(id).map_or(0, |v| v.len());
        println!("  - {}: {} ({count} propositions)", world.risk, world.description);
    }

    println!("\nAccessibility Relations:");
    for (id, world) in frame.world_ids().zip(frame.worlds()) {
        let targets: Vec<&str> = frame
            .accessible_from(id)
            .into_iter()
            .flatten()
            .filter_map(|&t| frame.world(t))
            .map(|w| w.risk.as_str())
            .collect();
        println!("  {} → {}", world.risk, targets.join(", "));
    }

    println!("\nValuation:");
    for (id, world) in frame.world_ids().zip(frame.worlds()) {
        if let Some(props) = frame.valuation(id) {
            let names: Vec<&str> = props.iter().map(String::as_str).collect();
            println!("  {}: {}", world.risk, names.join(", "));
        }
    }
}
