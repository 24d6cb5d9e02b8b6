use crate::modules::user::handle::*;
use actix_web::web::ServiceConfig;

/// Bare resources; they must be registered before the protected `/auth` scope.
pub fn public_api_configure(cfg: &mut ServiceConfig) {
    cfg.service(register).service(login).service(reset_password);
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(me).service(change_password).service(delete_account);
}

pub fn admin_configure(cfg: &mut ServiceConfig) {
    cfg.service(issue_reset_token);
}
