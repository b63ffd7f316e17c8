//! The `jobfit simulate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use jobfit_core::parser::load_item_bank;
use jobfit_core::simulation::{simulate, SimulationReport};
use jobfit_core::FitPrediction;
use jobfit_predictors::select_predictor;

#[derive(Serialize)]
struct SimulationRun {
    #[serde(flatten)]
    report: SimulationReport,
    prediction: FitPrediction,
}

pub fn execute(
    config_path: Option<PathBuf>,
    dataset: Option<PathBuf>,
    role: String,
    skill: u8,
    runs: u32,
    seed: Option<u64>,
    format: String,
) -> Result<()> {
    anyhow::ensure!(
        format == "text" || format == "json",
        "unknown format '{format}' (expected text or json)"
    );
    anyhow::ensure!(runs >= 1, "--runs must be at least 1");

    let settings = super::load_settings(config_path, dataset)?;
    let bank = Arc::new(load_item_bank(&settings.dataset)?);
    let predictor = select_predictor(&settings.predictor);
    let trust_score = settings.assessment.default_trust_score;

    let mut results = Vec::with_capacity(runs as usize);
    for run in 0..runs {
        let run_seed = seed.map(|s| s.wrapping_add(u64::from(run)));
        let report = simulate(
            Arc::clone(&bank),
            &role,
            skill,
            settings.assessment.engine_config(),
            run_seed,
        )?;
        let prediction = predictor.predict(report.skill_score, trust_score);
        results.push(SimulationRun { report, prediction });
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_summary(&results);
    }
    Ok(())
}

fn print_summary(results: &[SimulationRun]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Run",
        "Questions",
        "Correct",
        "Raw",
        "Skill",
        "Job Fit",
        "Category",
    ]);

    for (i, run) in results.iter().enumerate() {
        let correct = run.report.answers.iter().filter(|a| a.correct).count();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(run.report.answers.len()),
            Cell::new(correct),
            Cell::new(format!("{:.2}", run.report.raw_score)),
            Cell::new(format!("{:.2}", run.report.skill_score)),
            Cell::new(format!("{:.2}", run.prediction.job_fit_score)),
            Cell::new(run.prediction.category_label()),
        ]);
    }

    println!("{table}");

    let mean_skill =
        results.iter().map(|r| r.report.skill_score).sum::<f64>() / results.len() as f64;
    println!("Mean skill score: {mean_skill:.2}");
}
