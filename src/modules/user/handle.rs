use actix_web::{HttpRequest, delete, get, post, web};

use crate::middlewares::get_claims;
use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    utils::ValidatedJson,
};

#[post("/auth/register")]
pub async fn register(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterModel>,
) -> Result<success::Success<model::TokenResponse>, error::Error> {
    let token = user_service.register(user_data.0).await?;
    Ok(success::Success::created(Some(token)).message("Registration successful"))
}

#[post("/auth/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::SignInModel>,
) -> Result<success::Success<model::TokenResponse>, error::Error> {
    let token = user_service.sign_in(user_data.0).await?;
    Ok(success::Success::ok(Some(token)).message("Login successful"))
}

#[post("/auth/reset-password")]
pub async fn reset_password(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::ResetPasswordModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.reset_password(user_data.0).await?;
    Ok(success::Success::ok(None).message("Password reset successfully"))
}

#[get("/me")]
pub async fn me(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.me(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[post("/change-password")]
pub async fn change_password(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::ChangePasswordModel>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let id = get_claims(&req)?.sub;
    user_service.change_password(id, user_data.0).await?;
    Ok(success::Success::ok(None).message("Password changed successfully"))
}

#[delete("/delete-account")]
pub async fn delete_account(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let id = get_claims(&req)?.sub;
    user_service.delete_account(id).await?;
    Ok(success::Success::no_content())
}

#[post("/reset-token")]
pub async fn issue_reset_token(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::IssueResetTokenModel>,
) -> Result<success::Success<model::ResetTokenResponse>, error::Error> {
    let token = user_service.issue_reset_token(&user_data.0.email).await?;
    Ok(success::Success::created(Some(token)).message("Reset token issued"))
}
