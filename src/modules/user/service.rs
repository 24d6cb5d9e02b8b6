use log::info;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::configs::AuthConfig;
use crate::modules::cv_upload::{repository::CvUploadRepository, service::remove_file_quietly};
use crate::modules::user::model::{
    ChangePasswordModel, InsertUser, RegisterModel, ResetPasswordModel, ResetTokenResponse,
    SignInModel, TokenResponse, UserResponse,
};
use crate::modules::user::{
    repository::UserRepository,
    schema::{UserEntity, UserRole},
};
use crate::utils::{Claims, generate_reset_token, hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    cv_repo: Arc<dyn CvUploadRepository + Send + Sync>,
    config: AuthConfig,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        cv_repo: Arc<dyn CvUploadRepository + Send + Sync>,
        config: AuthConfig,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, cv_repo, config }
    }

    fn issue_token(&self, user: &UserEntity) -> Result<TokenResponse, error::SystemError> {
        let access_token =
            Claims::new(&user.id, &user.email, &user.role, self.config.access_token_expiration)
                .encode(self.config.jwt_secret.as_ref())?;
        Ok(TokenResponse { access_token })
    }

    async fn load(&self, id: &Uuid) -> Result<UserEntity, error::SystemError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn register(&self, user: RegisterModel) -> Result<TokenResponse, error::SystemError> {
        let email = user.email.trim().to_lowercase();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(error::SystemError::already_exists("Email already exists"));
        }

        let new_user = InsertUser {
            email,
            name: user.name,
            surname: user.surname,
            hash_password: hash_password(&user.password)?,
            role: UserRole::User,
        };

        let created = self.repo.create(&new_user).await?;
        info!("User {} registered", created.id);
        self.issue_token(&created)
    }

    pub async fn sign_in(&self, user: SignInModel) -> Result<TokenResponse, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(user.email.trim())
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if user.password.is_empty() {
            return Err(error::SystemError::bad_request("Password cannot be empty"));
        }

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("Invalid email or password"));
        }

        self.issue_token(&user_entity)
    }

    pub async fn me(&self, id: Uuid) -> Result<UserResponse, error::SystemError> {
        Ok(UserResponse::from(self.load(&id).await?))
    }

    pub async fn change_password(
        &self,
        id: Uuid,
        model: ChangePasswordModel,
    ) -> Result<(), error::SystemError> {
        let user = self.load(&id).await?;

        if !verify_password(&user.hash_password, &model.current_password)? {
            return Err(error::SystemError::bad_request("Current password is incorrect"));
        }

        self.repo.update_password(&user.id, &hash_password(&model.new_password)?).await?;
        info!("User {} changed password", user.id);
        Ok(())
    }

    /// Stores a fresh reset token for the account; any previous token stops working.
    pub async fn issue_reset_token(
        &self,
        email: &str,
    ) -> Result<ResetTokenResponse, error::SystemError> {
        let user = self
            .repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        let reset_token = generate_reset_token();
        let expires_at = chrono::Utc::now()
            + chrono::Duration::seconds(self.config.reset_token_expiration as i64);

        self.repo.set_reset_token(&user.id, &reset_token, expires_at).await?;
        info!("Reset token issued for user {}", user.id);
        Ok(ResetTokenResponse { reset_token, expires_at })
    }

    pub async fn reset_password(&self, model: ResetPasswordModel) -> Result<(), error::SystemError> {
        let user = self
            .repo
            .find_by_reset_token(&model.token)
            .await?
            .ok_or_else(|| error::SystemError::bad_request("Invalid or expired reset token"))?;

        let live = matches!(user.reset_token_expires_at, Some(at) if at > chrono::Utc::now());
        if !live {
            return Err(error::SystemError::bad_request("Invalid or expired reset token"));
        }

        self.repo.update_password(&user.id, &hash_password(&model.new_password)?).await?;
        info!("User {} reset password", user.id);
        Ok(())
    }

    /// Rows go first, then the stored files.
    pub async fn delete_account(&self, id: Uuid) -> Result<(), error::SystemError> {
        let user = self.load(&id).await?;
        let cvs = self.cv_repo.find_by_user(&user.id).await?;

        if !self.repo.delete(&user.id).await? {
            return Err(error::SystemError::not_found("User not found"));
        }

        for cv in &cvs {
            remove_file_quietly(Path::new(&cv.storage_path)).await;
        }

        info!("User {} deleted account with {} CVs", user.id, cvs.len());
        Ok(())
    }
}
