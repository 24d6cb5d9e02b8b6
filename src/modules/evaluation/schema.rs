use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "evaluation_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    Heuristic,
    AiAnalysis,
}

#[derive(Debug, Clone, FromRow)]
pub struct EvaluationEntity {
    pub id: Uuid,
    pub cv_id: Uuid,
    pub user_id: Uuid,
    pub cv_filename: String,
    /// Extracted text at scoring time, capped.
    pub resume_text: String,
    pub score: f64,
    pub summary: String,
    pub recommendations: Option<String>,
    pub evaluation_type: EvaluationType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
