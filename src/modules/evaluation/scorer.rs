use log::warn;
use serde_json::Value;
use std::sync::Arc;

use crate::constants::MAX_SUMMARY_CHARS;
use crate::llm_client::TextGenerator;
use crate::modules::evaluation::{
    model::ScoreOutcome, prompts::build_evaluation_prompt, schema::EvaluationType,
};
use crate::utils::truncate_chars;

const WORDS_PER_POINT: f64 = 10.0;
const SHORT_CV_COMMENT: &str =
    "The CV is quite short. Add more detail about your experience, projects and skills.";
const MODERATE_CV_COMMENT: &str = "The CV covers the basics. Expanding on achievements and measurable results would strengthen it.";
const DETAILED_CV_COMMENT: &str =
    "The CV is detailed and describes experience and skills comprehensively.";

#[async_trait::async_trait]
pub trait CvScorer {
    /// Never fails; upstream problems degrade into a zero score.
    async fn score(&self, cv_text: &str) -> ScoreOutcome;
}

/// Deterministic score from word count.
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer;

pub fn heuristic_score(cv_text: &str) -> ScoreOutcome {
    let words = cv_text.split_whitespace().count();
    let score = (words as f64 / WORDS_PER_POINT).min(100.0);

    let comment = if score < 20.0 {
        SHORT_CV_COMMENT
    } else if score < 50.0 {
        MODERATE_CV_COMMENT
    } else {
        DETAILED_CV_COMMENT
    };

    ScoreOutcome {
        score,
        summary: comment.to_string(),
        recommendations: None,
        evaluation_type: EvaluationType::Heuristic,
    }
}

#[async_trait::async_trait]
impl CvScorer for HeuristicScorer {
    async fn score(&self, cv_text: &str) -> ScoreOutcome {
        heuristic_score(cv_text)
    }
}

/// Delegates scoring to a language model.
#[derive(Clone)]
pub struct AiScorer {
    generator: Arc<dyn TextGenerator + Send + Sync>,
}

impl AiScorer {
    pub fn new(generator: Arc<dyn TextGenerator + Send + Sync>) -> Self {
        Self { generator }
    }
}

#[async_trait::async_trait]
impl CvScorer for AiScorer {
    async fn score(&self, cv_text: &str) -> ScoreOutcome {
        let prompt = build_evaluation_prompt(cv_text);
        match self.generator.generate(&prompt).await {
            Ok(raw) => parse_ai_response(&raw),
            Err(e) => {
                warn!("AI scoring failed, storing degraded evaluation: {e}");
                degraded(format!("AI analysis failed: {e}"))
            }
        }
    }
}

/// Slice from the first `{` to the last `}`; the whole text when there is no such pair.
fn carve_json(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => &raw[start..=end],
        _ => raw,
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn score_field(value: Option<&Value>) -> f64 {
    let score = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 }
}

pub fn parse_ai_response(raw: &str) -> ScoreOutcome {
    let parsed = match serde_json::from_str::<Value>(carve_json(raw)) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("AI response JSON was not an object");
            return degraded(format!("AI response could not be parsed: {raw}"));
        }
        Err(e) => {
            warn!("AI response could not be parsed: {e}");
            return degraded(format!("AI response could not be parsed: {raw}"));
        }
    };

    let summary = text_field(parsed.get("summary")).unwrap_or_default();
    let recommendations = text_field(parsed.get("recommendations"))
        .map(|r| truncate_chars(&r, MAX_SUMMARY_CHARS));

    ScoreOutcome {
        score: score_field(parsed.get("score")),
        summary: truncate_chars(&summary, MAX_SUMMARY_CHARS),
        recommendations,
        evaluation_type: EvaluationType::AiAnalysis,
    }
}

fn degraded(context: String) -> ScoreOutcome {
    ScoreOutcome {
        score: 0.0,
        summary: truncate_chars(&context, MAX_SUMMARY_CHARS),
        recommendations: None,
        evaluation_type: EvaluationType::AiAnalysis,
    }
}
