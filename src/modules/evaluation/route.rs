use crate::modules::evaluation::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(analyze_cv)
        .service(get_evaluation)
        .service(list_my_evaluations)
        .service(list_user_evaluations)
        .service(delete_evaluation);
}
