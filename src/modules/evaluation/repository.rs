use uuid::Uuid;

use crate::{
    api::error,
    modules::evaluation::{model::NewEvaluation, schema::EvaluationEntity},
};

#[async_trait::async_trait]
pub trait EvaluationRepository {
    async fn find_by_cv(&self, cv_id: &Uuid)
    -> Result<Option<EvaluationEntity>, error::SystemError>;

    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<EvaluationEntity>, error::SystemError>;

    /// Fails with a conflict when the CV already has an evaluation.
    async fn create(&self, evaluation: &NewEvaluation)
    -> Result<EvaluationEntity, error::SystemError>;

    async fn delete_by_cv(&self, cv_id: &Uuid) -> Result<bool, error::SystemError>;
}
