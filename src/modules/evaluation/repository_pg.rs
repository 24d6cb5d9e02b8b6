use uuid::Uuid;

use crate::{
    api::error,
    modules::evaluation::{
        model::NewEvaluation, repository::EvaluationRepository, schema::EvaluationEntity,
    },
};

#[derive(Clone)]
pub struct EvaluationRepositoryPg {
    pool: sqlx::PgPool,
}

impl EvaluationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EvaluationRepository for EvaluationRepositoryPg {
    async fn find_by_cv(
        &self,
        cv_id: &Uuid,
    ) -> Result<Option<EvaluationEntity>, error::SystemError> {
        let evaluation =
            sqlx::query_as::<_, EvaluationEntity>("SELECT * FROM evaluations WHERE cv_id = $1")
                .bind(cv_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(evaluation)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<EvaluationEntity>, error::SystemError> {
        let evaluations = sqlx::query_as::<_, EvaluationEntity>(
            "SELECT * FROM evaluations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(evaluations)
    }

    async fn create(
        &self,
        evaluation: &NewEvaluation,
    ) -> Result<EvaluationEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let outcome = &evaluation.outcome;
        let entity = sqlx::query_as::<_, EvaluationEntity>(
            r#"
            INSERT INTO evaluations
                (id, cv_id, user_id, cv_filename, resume_text, score, summary, recommendations, evaluation_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(evaluation.cv_id)
        .bind(evaluation.user_id)
        .bind(&evaluation.cv_filename)
        .bind(&evaluation.resume_text)
        .bind(outcome.score)
        .bind(&outcome.summary)
        .bind(&outcome.recommendations)
        .bind(outcome.evaluation_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn delete_by_cv(&self, cv_id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM evaluations WHERE cv_id = $1")
            .bind(cv_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
