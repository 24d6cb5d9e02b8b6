use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{model::InsertUser, schema::UserEntity},
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    /// Replaces the password hash and clears any outstanding reset token.
    async fn update_password(
        &self,
        id: &Uuid,
        hash_password: &str,
    ) -> Result<(), error::SystemError>;
    async fn set_reset_token(
        &self,
        id: &Uuid,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), error::SystemError>;

    /// Removes the account; owned CVs and evaluations go with it.
    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
