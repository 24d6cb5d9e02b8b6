use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::evaluation::schema::{EvaluationEntity, EvaluationType};

/// What a scorer produces for one CV text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub score: f64,
    pub summary: String,
    pub recommendations: Option<String>,
    pub evaluation_type: EvaluationType,
}

pub struct NewEvaluation {
    pub cv_id: Uuid,
    pub user_id: Uuid,
    pub cv_filename: String,
    pub resume_text: String,
    pub outcome: ScoreOutcome,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub cv_id: Uuid,
    pub cv_filename: String,
    pub score: f64,
    pub summary: String,
    pub recommendations: Option<String>,
    pub evaluation_type: EvaluationType,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<EvaluationEntity> for EvaluationResponse {
    fn from(entity: EvaluationEntity) -> Self {
        EvaluationResponse {
            id: entity.id,
            cv_id: entity.cv_id,
            cv_filename: entity.cv_filename,
            score: entity.score,
            summary: entity.summary,
            recommendations: entity.recommendations,
            evaluation_type: entity.evaluation_type,
            created_at: entity.created_at,
        }
    }
}
