use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::constants::{MAX_EXTENSION_CHARS, MAX_FILENAME_CHARS};
use crate::modules::cv_upload::{
    model::{NewCvUpload, UploadConfig},
    repository::CvUploadRepository,
    schema::{CvUploadEntity, CvUploadResponse},
};
use crate::modules::user::repository::UserRepository;

#[derive(Clone)]
pub struct CvUploadService {
    cv_repo: Arc<dyn CvUploadRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    config: UploadConfig,
}

impl CvUploadService {
    pub fn with_dependencies(
        cv_repo: Arc<dyn CvUploadRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        config: UploadConfig,
    ) -> Self {
        info!("CvUploadService storing files under {}", config.upload_dir.display());
        CvUploadService { cv_repo, user_repo, config }
    }

    pub fn max_file_size(&self) -> usize {
        self.config.max_file_size
    }

    /// Size, type, quota and duplicate-name checks, in that order.
    async fn validate_upload(
        &self,
        user_id: &Uuid,
        original_filename: &str,
        file_size: usize,
        mime_type: &str,
    ) -> Result<(), error::SystemError> {
        if original_filename.trim().is_empty()
            || original_filename.contains(['/', '\\'])
            || original_filename == ".."
        {
            return Err(error::SystemError::bad_request("Invalid file name"));
        }

        // Both the display name and the generated storage name live in VARCHAR(255) columns.
        let extension_len = Path::new(original_filename)
            .extension()
            .map_or(0, |ext| ext.to_string_lossy().chars().count());
        if original_filename.chars().count() > MAX_FILENAME_CHARS
            || extension_len > MAX_EXTENSION_CHARS
        {
            return Err(error::SystemError::bad_request(format!(
                "File name must be at most {MAX_FILENAME_CHARS} characters with an extension of at most {MAX_EXTENSION_CHARS}"
            )));
        }

        if file_size == 0 {
            return Err(error::SystemError::bad_request("Uploaded file is empty"));
        }

        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        if !self.config.allowed_mime_types.iter().any(|m| m == mime_type) {
            return Err(error::SystemError::bad_request(
                "Only PDF or Word documents can be uploaded",
            ));
        }

        let count = self.cv_repo.count_by_user(user_id).await?;
        if count >= self.config.max_files_per_user {
            return Err(error::SystemError::bad_request(format!(
                "A user can upload at most {} CVs",
                self.config.max_files_per_user
            )));
        }

        if self.cv_repo.exists_by_user_and_filename(user_id, original_filename).await? {
            return Err(error::SystemError::already_exists(
                "A CV with the same file name was already uploaded",
            ));
        }

        Ok(())
    }

    /// Storage name decoupled from the caller-supplied name.
    fn generate_filename(&self, original_filename: &str) -> String {
        let extension =
            Path::new(original_filename).extension().and_then(|ext| ext.to_str()).unwrap_or("");
        let uuid = Uuid::now_v7();
        if extension.is_empty() {
            uuid.to_string()
        } else {
            format!("{}.{}", uuid, extension.to_lowercase())
        }
    }

    async fn save_file(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, error::SystemError> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;

        let file_path = self.config.upload_dir.join(filename);
        if let Err(e) = tokio::fs::write(&file_path, bytes).await {
            remove_file_quietly(&file_path).await;
            return Err(error::SystemError::Io(e));
        }

        Ok(file_path)
    }

    pub async fn upload_cv(
        &self,
        user_id: Uuid,
        original_filename: String,
        bytes: Vec<u8>,
        mime_type: String,
    ) -> Result<CvUploadResponse, error::SystemError> {
        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let file_size = bytes.len();
        self.validate_upload(&user_id, &original_filename, file_size, &mime_type).await?;

        let filename = self.generate_filename(&original_filename);
        let storage_path = self.save_file(&filename, &bytes).await?;

        let new_cv = NewCvUpload {
            filename,
            original_filename,
            mime_type,
            file_size: file_size as i64,
            storage_path: storage_path.to_string_lossy().into_owned(),
            user_id,
        };

        let entity =
            match self.cv_repo.create_within_quota(&new_cv, self.config.max_files_per_user).await {
                Ok(entity) => entity,
                Err(e) => {
                    remove_file_quietly(&storage_path).await;
                    return Err(e);
                }
            };

        info!("User {} uploaded CV {} ({} bytes)", user_id, entity.id, entity.file_size);
        Ok(CvUploadResponse::from(entity))
    }

    pub async fn list_user_cvs(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CvUploadResponse>, error::SystemError> {
        let cvs = self.cv_repo.find_by_user(&user_id).await?;
        Ok(cvs.into_iter().map(CvUploadResponse::from).collect())
    }

    pub async fn get_owned_cv(
        &self,
        user_id: Uuid,
        cv_id: Uuid,
    ) -> Result<CvUploadEntity, error::SystemError> {
        let cv = self
            .cv_repo
            .find_by_id(&cv_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("CV not found"))?;

        if cv.user_id != user_id {
            return Err(error::SystemError::forbidden("You don't have access to this CV"));
        }

        Ok(cv)
    }

    /// Metadata and raw bytes of an owned CV.
    pub async fn read_cv(
        &self,
        user_id: Uuid,
        cv_id: Uuid,
    ) -> Result<(CvUploadEntity, Vec<u8>), error::SystemError> {
        let cv = self.get_owned_cv(user_id, cv_id).await?;

        let bytes = match tokio::fs::read(&cv.storage_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(error::SystemError::storage("CV file not found or not readable"));
            }
            Err(e) => return Err(error::SystemError::Io(e)),
        };

        Ok((cv, bytes))
    }

    pub async fn delete_cv(&self, user_id: Uuid, cv_id: Uuid) -> Result<(), error::SystemError> {
        let cv = self.get_owned_cv(user_id, cv_id).await?;

        if !self.cv_repo.delete(&cv.id).await? {
            return Err(error::SystemError::not_found("CV not found"));
        }

        remove_file_quietly(Path::new(&cv.storage_path)).await;

        info!("User {} deleted CV {}", user_id, cv.id);
        Ok(())
    }
}

/// Best-effort removal; a file that is already gone is not an error.
pub async fn remove_file_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove file {}: {}", path.display(), e),
    }
}
