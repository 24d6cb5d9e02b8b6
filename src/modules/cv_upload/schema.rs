use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Metadata row for one stored CV file.
#[derive(Debug, Clone, FromRow)]
pub struct CvUploadEntity {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub storage_path: String,
    pub user_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CvUploadResponse {
    pub id: Uuid,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<CvUploadEntity> for CvUploadResponse {
    fn from(entity: CvUploadEntity) -> Self {
        CvUploadResponse {
            id: entity.id,
            original_filename: entity.original_filename,
            mime_type: entity.mime_type,
            file_size: entity.file_size,
            created_at: entity.created_at,
        }
    }
}
