//! The `jobfit take` command: an interactive assessment on the terminal.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};

use jobfit_core::parser::load_item_bank;
use jobfit_core::store::{AssessmentResult, SubmitOutcome};
use jobfit_core::{ItemBank, SessionStore, SessionStoreConfig};
use jobfit_predictors::select_predictor;

pub fn execute(
    config_path: Option<PathBuf>,
    dataset: Option<PathBuf>,
    role: Option<String>,
    trust_score: Option<f64>,
) -> Result<()> {
    let settings = super::load_settings(config_path, dataset)?;
    let bank = Arc::new(load_item_bank(&settings.dataset)?);
    let store = SessionStore::new(
        bank,
        select_predictor(&settings.predictor),
        SessionStoreConfig {
            idle_ttl: None,
            ..settings.assessment.store_config()
        },
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    run_assessment(&store, role, trust_score, &mut input, &mut output)?;
    Ok(())
}

/// Drive one assessment over line-oriented input and output.
pub fn run_assessment<R: BufRead, W: Write>(
    store: &SessionStore,
    role: Option<String>,
    trust_score: Option<f64>,
    input: &mut R,
    output: &mut W,
) -> Result<AssessmentResult> {
    let role = match role {
        Some(role) => role,
        None => choose_role(store.bank(), input, output)?,
    };
    if !store.bank().contains_role(&role) {
        bail!(
            "unknown role '{role}' (available: {})",
            store.bank().roles().join(", ")
        );
    }

    let started = store.create(&role, trust_score)?;
    let max_questions = store.config().engine.max_questions;
    writeln!(output, "Assessment for {role}: up to {max_questions} questions.")?;

    let mut question = started.question;
    let mut asked = 1;
    loop {
        writeln!(
            output,
            "\nQ{asked} (difficulty {}): {}",
            question.difficulty, question.text
        )?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(output, "  {}) {option}", i + 1)?;
        }

        let answer = read_choice(&question.options, input, output)?;
        match store.submit(&started.session_id, question.id, question.is_correct(answer))? {
            SubmitOutcome::Next {
                question: next,
                raw_score,
                questions_asked,
            } => {
                writeln!(output, "Current raw score: {raw_score:.2}")?;
                question = next;
                asked = questions_asked + 1;
            }
            SubmitOutcome::Complete(result) => {
                print_result(&result, output)?;
                return Ok(result);
            }
        }
    }
}

fn choose_role<R: BufRead, W: Write>(
    bank: &ItemBank,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    writeln!(output, "Select a job role:")?;
    for (i, role) in bank.roles().iter().enumerate() {
        writeln!(output, "  {}) {role}", i + 1)?;
    }
    read_choice(bank.roles(), input, output).map(str::to_string)
}

/// Read until the line names one of `choices`, by 1-based number or by text.
fn read_choice<'a, R: BufRead, W: Write>(
    choices: &'a [String],
    input: &mut R,
    output: &mut W,
) -> Result<&'a str> {
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input ended before the assessment finished");
        }
        let line = line.trim();

        let by_number = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| choices.get(i));
        let by_text = choices.iter().find(|c| c.eq_ignore_ascii_case(line));
        if let Some(choice) = by_number.or(by_text) {
            return Ok(choice);
        }
        writeln!(output, "Please enter a number between 1 and {}.", choices.len())?;
    }
}

fn print_result<W: Write>(result: &AssessmentResult, output: &mut W) -> io::Result<()> {
    let p = &result.prediction;
    writeln!(output, "\nAssessment complete.")?;
    writeln!(output, "  Questions answered: {}", result.questions_asked)?;
    writeln!(output, "  Raw score:          {:.2}", result.raw_score)?;
    writeln!(output, "  Skill score:        {:.2}", p.skill_score)?;
    writeln!(output, "  Trust score:        {:.2}", p.trust_score)?;
    writeln!(output, "  Job-fit score:      {:.2}", p.job_fit_score)?;
    writeln!(output, "  Category:           {}", p.category_label())
}
