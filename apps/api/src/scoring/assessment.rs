//! Assessment scorer — grades a submitted MCQ answer list against the job's
//! question bank. Pure function, no I/O; the submission handler persists the
//! result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::scoring::round2;

/// One question from the job's assessment bank. Only the fields the grader
/// needs; prompt and option texts stay opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub correct_answer: i64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Per-question review, kept in the grade for recruiter-facing feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReview {
    /// Submitted 0-based option index; `None` when the question was skipped
    /// or the submitted value was not an index.
    pub submitted: Option<i64>,
    pub correct: i64,
    pub is_correct: bool,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentGrade {
    /// 0–100, two decimal places.
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    /// Whole-percent view of `score` for list displays.
    pub percentage: i64,
    pub breakdown: Vec<AnswerReview>,
}

/// Grades `answers` (JSON array of 0-based option indices) against
/// `questions` (JSON array of question records).
///
/// A short answer list is valid: unanswered questions count as wrong and
/// contribute 0. Either payload failing to be an array is the caller's
/// validation bug and comes back as `InvalidInput`.
pub fn grade_assessment(answers: &Value, questions: &Value) -> Result<AssessmentGrade, AppError> {
    let answers = answers
        .as_array()
        .ok_or_else(|| AppError::InvalidInput("answers must be an array".to_string()))?;
    let questions = questions
        .as_array()
        .ok_or_else(|| AppError::InvalidInput("questions must be an array".to_string()))?;

    let questions: Vec<QuestionRecord> = questions
        .iter()
        .map(|q| {
            serde_json::from_value(q.clone())
                .map_err(|e| AppError::InvalidInput(format!("malformed question record: {e}")))
        })
        .collect::<Result<_, _>>()?;

    let total_questions = questions.len();
    let mut correct_count = 0;
    let mut breakdown = Vec::with_capacity(total_questions);

    for (i, question) in questions.iter().enumerate() {
        let submitted = answers.get(i).and_then(Value::as_i64);
        let is_correct = submitted == Some(question.correct_answer);
        if is_correct {
            correct_count += 1;
        }
        breakdown.push(AnswerReview {
            submitted,
            correct: question.correct_answer,
            is_correct,
            category: question.category.clone(),
        });
    }

    let score = if total_questions == 0 {
        0.0
    } else {
        round2(correct_count as f64 / total_questions as f64 * 100.0)
    };

    Ok(AssessmentGrade {
        score,
        correct_count,
        total_questions,
        percentage: score.round() as i64,
        breakdown,
    })
}
