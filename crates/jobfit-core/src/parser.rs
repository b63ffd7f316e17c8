//! CSV item-bank parser.
//!
//! Loads questions from a delimited dataset file, validates every row, and
//! reports softer data-quality issues as warnings.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::ItemBank;
use crate::error::AssessmentError;
use crate::model::{Difficulty, Question, QuestionId};

/// Separator between answer choices in the `Options` column.
pub const OPTION_SEPARATOR: char = ';';

/// Intermediate row structure as it appears in the dataset.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Job_Role")]
    job_role: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Options")]
    options: String,
    #[serde(rename = "Answer")]
    answer: String,
    #[serde(rename = "Q_ID", default)]
    q_id: Option<f64>,
    #[serde(rename = "Difficulty_Level", default)]
    difficulty_level: Option<f64>,
    #[serde(rename = "Difficulty", default)]
    difficulty: Option<f64>,
}

/// Parse a dataset file into validated questions.
pub fn parse_dataset(path: &Path) -> Result<Vec<Question>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset: {}", path.display()))?;

    parse_dataset_str(&content, path)
}

/// Parse dataset content (useful for testing).
///
/// A missing or empty `Q_ID` is synthesized from the zero-based row index.
pub fn parse_dataset_str(content: &str, source_path: &Path) -> Result<Vec<Question>> {
    let mut reader = csv::ReaderBuilder::new()
        .quote(b'"')
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header row: {}", source_path.display()))?
        .clone();

    let mut questions = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("malformed CSV in {}", source_path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(index as u64 + 2);

        let row: CsvRow = record.deserialize(Some(&headers)).with_context(|| {
            format!("{}:{line}: invalid row", source_path.display())
        })?;

        let question = question_from_row(row, index as u64)
            .map_err(|e| anyhow::anyhow!("{}:{line}: {e}", source_path.display()))?;
        questions.push(question);
    }

    Ok(questions)
}

fn question_from_row(row: CsvRow, index: u64) -> Result<Question, String> {
    if row.job_role.is_empty() {
        return Err("Job_Role is empty".into());
    }
    if row.question.is_empty() {
        return Err("Question is empty".into());
    }

    // Difficulty_Level wins when a dataset carries both columns.
    let difficulty = row
        .difficulty_level
        .or(row.difficulty)
        .ok_or_else(|| "Difficulty_Level is missing".to_string())?;
    let difficulty = Difficulty::try_from(integral(difficulty, "difficulty")?)?;

    let id = match row.q_id {
        Some(raw) => {
            let id = integral(raw, "Q_ID")?;
            u64::try_from(id).map_err(|_| format!("Q_ID {raw} is negative"))?
        }
        None => index,
    };

    let options: Vec<String> = row
        .options
        .split(OPTION_SEPARATOR)
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();
    if options.is_empty() {
        return Err("Options is empty".into());
    }
    if !options.contains(&row.answer) {
        return Err(format!("answer '{}' is not one of the options", row.answer));
    }

    Ok(Question {
        id: QuestionId(id),
        role: row.job_role,
        text: row.question,
        options,
        correct_answer: row.answer,
        difficulty,
    })
}

/// Numeric columns may arrive as floats (`5.0`) when written by spreadsheet tools.
fn integral(value: f64, column: &str) -> Result<i64, String> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("{column} {value} is not an integer"));
    }
    Ok(value as i64)
}

/// Load and index a dataset, failing if it is missing, empty, or invalid.
pub fn load_item_bank(path: &Path) -> Result<ItemBank, AssessmentError> {
    let questions =
        parse_dataset(path).map_err(|e| AssessmentError::DataUnavailable(format!("{e:#}")))?;
    if questions.is_empty() {
        return Err(AssessmentError::DataUnavailable(format!(
            "dataset is empty: {}",
            path.display()
        )));
    }

    let bank = ItemBank::new(questions)?;
    tracing::info!(
        "loaded {} questions for {} role(s) from {}",
        bank.len(),
        bank.roles().len(),
        path.display()
    );
    Ok(bank)
}

/// A warning from item-bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The role (if applicable).
    pub role: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for issues that degrade assessments without breaking them.
pub fn validate_item_bank(bank: &ItemBank, max_questions: u32) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let no_exclusions = HashSet::new();

    for role in bank.roles() {
        let questions = bank.query_any(role, &no_exclusions);

        // Too few questions to reach the cap
        if questions.len() < max_questions as usize {
            warnings.push(ValidationWarning {
                role: Some(role.clone()),
                message: format!(
                    "only {} question(s); assessments will end before {max_questions}",
                    questions.len()
                ),
            });
        }

        // Missing tiers force the selection window to widen
        let tiers: HashSet<Difficulty> = questions.iter().map(|q| q.difficulty).collect();
        for tier in Difficulty::all().filter(|t| !tiers.contains(t)) {
            warnings.push(ValidationWarning {
                role: Some(role.clone()),
                message: format!("no questions at difficulty {tier}"),
            });
        }

        let mut seen_text: HashMap<&str, QuestionId> = HashMap::new();
        let mut sorted: Vec<_> = questions.iter().collect();
        sorted.sort_by_key(|q| q.id);
        for q in sorted {
            if q.options.len() < 2 {
                warnings.push(ValidationWarning {
                    role: Some(role.clone()),
                    message: format!("question {} has fewer than two options", q.id),
                });
            }
            if let Some(first) = seen_text.insert(q.text.as_str(), q.id) {
                warnings.push(ValidationWarning {
                    role: Some(role.clone()),
                    message: format!("question {} repeats the text of question {first}", q.id),
                });
            }
        }
    }

    warnings
}
