use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::constants::MAX_RESUME_TEXT_CHARS;
use crate::modules::cv_upload::{repository::CvUploadRepository, schema::CvUploadEntity};
use crate::modules::evaluation::{
    extractor::TextExtractor,
    model::{EvaluationResponse, NewEvaluation},
    repository::EvaluationRepository,
    scorer::CvScorer,
};
use crate::modules::user::{repository::UserRepository, schema::UserEntity};
use crate::utils::truncate_chars;

#[derive(Clone)]
pub struct EvaluationService {
    evaluation_repo: Arc<dyn EvaluationRepository + Send + Sync>,
    cv_repo: Arc<dyn CvUploadRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    extractor: Arc<dyn TextExtractor + Send + Sync>,
    scorer: Arc<dyn CvScorer + Send + Sync>,
}

impl EvaluationService {
    pub fn with_dependencies(
        evaluation_repo: Arc<dyn EvaluationRepository + Send + Sync>,
        cv_repo: Arc<dyn CvUploadRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        extractor: Arc<dyn TextExtractor + Send + Sync>,
        scorer: Arc<dyn CvScorer + Send + Sync>,
    ) -> Self {
        info!("EvaluationService initialized with dependencies");
        EvaluationService { evaluation_repo, cv_repo, user_repo, extractor, scorer }
    }

    async fn load_user(&self, user_id: &Uuid) -> Result<UserEntity, error::SystemError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    async fn load_cv(&self, cv_id: &Uuid) -> Result<CvUploadEntity, error::SystemError> {
        self.cv_repo
            .find_by_id(cv_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("CV not found"))
    }

    async fn extract_text(&self, storage_path: &str) -> Result<String, error::SystemError> {
        let extractor = self.extractor.clone();
        let path = PathBuf::from(storage_path);

        tokio::task::spawn_blocking(move || extractor.extract(&path)).await.map_err(|e| {
            log::error!("Text extraction task failed: {e}");
            error::SystemError::extraction("Document could not be parsed")
        })?
    }

    /// Scores an owned CV once; a second request for the same CV is a conflict.
    pub async fn analyze_cv(
        &self,
        user_id: Uuid,
        cv_id: Uuid,
    ) -> Result<EvaluationResponse, error::SystemError> {
        let user = self.load_user(&user_id).await?;
        let cv = self.load_cv(&cv_id).await?;

        if cv.user_id != user.id {
            return Err(error::SystemError::forbidden("You are not allowed to analyze this CV"));
        }

        if self.evaluation_repo.find_by_cv(&cv.id).await?.is_some() {
            return Err(error::SystemError::already_exists("CV has already been evaluated"));
        }

        let text = self.extract_text(&cv.storage_path).await?;
        let outcome = self.scorer.score(&text).await;

        let new_evaluation = NewEvaluation {
            cv_id: cv.id,
            user_id: user.id,
            cv_filename: cv.original_filename.clone(),
            resume_text: truncate_chars(&text, MAX_RESUME_TEXT_CHARS),
            outcome,
        };

        // The unique constraint catches a concurrent request that passed the check above.
        let evaluation = self.evaluation_repo.create(&new_evaluation).await.map_err(|e| {
            if e.is_conflict() {
                error::SystemError::already_exists("CV has already been evaluated")
            } else {
                e
            }
        })?;

        info!(
            "CV {} evaluated for user {} with score {:.1} ({:?})",
            cv.id, user.id, evaluation.score, evaluation.evaluation_type
        );
        Ok(EvaluationResponse::from(evaluation))
    }

    /// Evaluations of `target_id`; only admins may list someone else's.
    pub async fn list_for_user(
        &self,
        caller_id: Uuid,
        target_id: Uuid,
    ) -> Result<Vec<EvaluationResponse>, error::SystemError> {
        let caller = self.load_user(&caller_id).await?;

        if caller.id != target_id {
            if !caller.is_admin() {
                return Err(error::SystemError::forbidden(
                    "You are not allowed to view these evaluations",
                ));
            }
            self.load_user(&target_id).await?;
        }

        let evaluations = self.evaluation_repo.find_by_user(&target_id).await?;
        Ok(evaluations.into_iter().map(EvaluationResponse::from).collect())
    }

    pub async fn get_by_cv(
        &self,
        user_id: Uuid,
        cv_id: Uuid,
    ) -> Result<EvaluationResponse, error::SystemError> {
        let cv = self.load_cv(&cv_id).await?;

        if cv.user_id != user_id {
            return Err(error::SystemError::forbidden("You don't have access to this evaluation"));
        }

        let evaluation = self
            .evaluation_repo
            .find_by_cv(&cv.id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Evaluation not found"))?;

        Ok(EvaluationResponse::from(evaluation))
    }

    /// Removes only the evaluation; the CV stays. Owner or admin.
    pub async fn delete_by_cv(
        &self,
        caller_id: Uuid,
        cv_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let caller = self.load_user(&caller_id).await?;
        let cv = self.load_cv(&cv_id).await?;

        if cv.user_id != caller.id && !caller.is_admin() {
            return Err(error::SystemError::forbidden(
                "You are not allowed to delete this evaluation",
            ));
        }

        if !self.evaluation_repo.delete_by_cv(&cv.id).await? {
            return Err(error::SystemError::not_found("Evaluation not found"));
        }

        info!("Evaluation of CV {} deleted by user {}", cv.id, caller.id);
        Ok(())
    }
}
