use uuid::Uuid;

use crate::{
    api::error,
    modules::cv_upload::{model::NewCvUpload, schema::CvUploadEntity},
};

#[async_trait::async_trait]
pub trait CvUploadRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CvUploadEntity>, error::SystemError>;

    async fn find_by_user(&self, user_id: &Uuid)
    -> Result<Vec<CvUploadEntity>, error::SystemError>;

    async fn count_by_user(&self, user_id: &Uuid) -> Result<i64, error::SystemError>;

    async fn exists_by_user_and_filename(
        &self,
        user_id: &Uuid,
        original_filename: &str,
    ) -> Result<bool, error::SystemError>;

    /// Inserts the row only while the owner has fewer than `max_per_user` uploads.
    /// A duplicate `(user, original filename)` surfaces as a conflict.
    async fn create_within_quota(
        &self,
        cv: &NewCvUpload,
        max_per_user: i64,
    ) -> Result<CvUploadEntity, error::SystemError>;

    /// Deletes the row together with its evaluation.
    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
