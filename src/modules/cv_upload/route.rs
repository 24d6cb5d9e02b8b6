use crate::modules::cv_upload::handle::*;
use actix_web::web::ServiceConfig;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(upload_cv).service(list_my_cvs).service(download_cv).service(delete_cv);
}
