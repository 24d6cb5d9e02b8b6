use uuid::Uuid;

use crate::{
    api::error,
    modules::cv_upload::{
        model::NewCvUpload, repository::CvUploadRepository, schema::CvUploadEntity,
    },
};

#[derive(Clone)]
pub struct CvUploadRepositoryPg {
    pool: sqlx::PgPool,
}

impl CvUploadRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CvUploadRepository for CvUploadRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CvUploadEntity>, error::SystemError> {
        let cv = sqlx::query_as::<_, CvUploadEntity>("SELECT * FROM cv_uploads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cv)
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<CvUploadEntity>, error::SystemError> {
        let cvs = sqlx::query_as::<_, CvUploadEntity>(
            "SELECT * FROM cv_uploads WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cvs)
    }

    async fn count_by_user(&self, user_id: &Uuid) -> Result<i64, error::SystemError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cv_uploads WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn exists_by_user_and_filename(
        &self,
        user_id: &Uuid,
        original_filename: &str,
    ) -> Result<bool, error::SystemError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM cv_uploads WHERE user_id = $1 AND original_filename = $2)",
        )
        .bind(user_id)
        .bind(original_filename)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_within_quota(
        &self,
        cv: &NewCvUpload,
        max_per_user: i64,
    ) -> Result<CvUploadEntity, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent uploads of the same user until commit.
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(cv.user_id)
            .fetch_optional(tx.as_mut())
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cv_uploads WHERE user_id = $1")
            .bind(cv.user_id)
            .fetch_one(tx.as_mut())
            .await?;

        if count >= max_per_user {
            return Err(error::SystemError::bad_request(format!(
                "A user can upload at most {max_per_user} CVs"
            )));
        }

        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let entity = sqlx::query_as::<_, CvUploadEntity>(
            r#"
            INSERT INTO cv_uploads (id, filename, original_filename, mime_type, file_size, storage_path, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&cv.filename)
        .bind(&cv.original_filename)
        .bind(&cv.mime_type)
        .bind(cv.file_size)
        .bind(&cv.storage_path)
        .bind(cv.user_id)
        .fetch_one(tx.as_mut())
        .await?;

        tx.commit().await?;

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM evaluations WHERE cv_id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?;

        let rows = sqlx::query("DELETE FROM cv_uploads WHERE id = $1")
            .bind(id)
            .execute(tx.as_mut())
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(rows > 0)
    }
}
