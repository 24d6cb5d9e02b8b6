use std::path::PathBuf;
use uuid::Uuid;

use crate::constants::{ALLOWED_CV_MIME_TYPES, Env, MAX_CVS_PER_USER};

/// New CV metadata to insert into database
#[derive(Debug, Clone)]
pub struct NewCvUpload {
    pub filename: String,
    pub original_filename: String,
    pub mime_type: String,
    pub file_size: i64,
    pub storage_path: String,
    pub user_id: Uuid,
}

/// CV upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub max_files_per_user: i64,
    pub allowed_mime_types: Vec<String>,
    pub upload_dir: PathBuf,
}

impl UploadConfig {
    pub fn from_env(env: &Env) -> Self {
        Self {
            max_file_size: env.max_upload_size,
            upload_dir: PathBuf::from(&env.upload_dir),
            ..Default::default()
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024, // 5MB
            max_files_per_user: MAX_CVS_PER_USER,
            allowed_mime_types: ALLOWED_CV_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
            upload_dir: PathBuf::from("./uploads"),
        }
    }
}
