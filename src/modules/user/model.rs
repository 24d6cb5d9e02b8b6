use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::DEFAULT_DISPLAY_NAME;
use crate::modules::user::schema::{UserEntity, UserRole};

#[derive(Deserialize, Validate)]
pub struct RegisterModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(length(max = 100, message = "Name must be at most 100 characters long"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Surname must be at most 100 characters long"))]
    pub surname: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct ChangePasswordModel {
    #[validate(length(min = 1, message = "Current password cannot be empty"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

#[derive(Deserialize, Validate)]
pub struct ResetPasswordModel {
    #[validate(length(min = 1, message = "Reset token cannot be empty"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

#[derive(Deserialize, Validate)]
pub struct IssueResetTokenModel {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

pub struct InsertUser {
    pub email: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub hash_password: String,
    pub role: UserRole,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResetTokenResponse {
    pub reset_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
}

/// "name surname", trimmed; blank names fall back to a placeholder.
pub fn display_name(name: Option<&str>, surname: Option<&str>) -> String {
    let full = format!("{} {}", name.unwrap_or(""), surname.unwrap_or(""));
    let full = full.trim();
    if full.is_empty() { DEFAULT_DISPLAY_NAME.to_string() } else { full.to_string() }
}

impl From<UserEntity> for UserResponse {
    fn from(entity: UserEntity) -> Self {
        UserResponse {
            id: entity.id,
            display_name: display_name(entity.name.as_deref(), entity.surname.as_deref()),
            email: entity.email,
            role: entity.role,
        }
    }
}
