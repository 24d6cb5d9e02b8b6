use actix_web::{HttpRequest, delete, get, post, web};
use uuid::Uuid;

use crate::api::{error, success};
use crate::middlewares::get_claims;
use crate::modules::evaluation::{model::EvaluationResponse, service::EvaluationService};

#[post("/analyze/{cv_id:[0-9a-fA-F-]{36}}")]
pub async fn analyze_cv(
    evaluation_service: web::Data<EvaluationService>,
    cv_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<EvaluationResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let evaluation = evaluation_service.analyze_cv(user_id, cv_id.into_inner()).await?;
    Ok(success::Success::created(Some(evaluation)).message("CV analyzed successfully"))
}

#[get("/analyze/{cv_id:[0-9a-fA-F-]{36}}")]
pub async fn get_evaluation(
    evaluation_service: web::Data<EvaluationService>,
    cv_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<EvaluationResponse>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let evaluation = evaluation_service.get_by_cv(user_id, cv_id.into_inner()).await?;
    Ok(success::Success::ok(Some(evaluation)).message("Evaluation retrieved successfully"))
}

#[get("")]
pub async fn list_my_evaluations(
    evaluation_service: web::Data<EvaluationService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<EvaluationResponse>>, error::Error> {
    let user_id = get_claims(&req)?.sub;
    let evaluations = evaluation_service.list_for_user(user_id, user_id).await?;
    Ok(success::Success::ok(Some(evaluations)).message("Evaluations retrieved successfully"))
}

#[get("/{user_id:[0-9a-fA-F-]{36}}")]
pub async fn list_user_evaluations(
    evaluation_service: web::Data<EvaluationService>,
    user_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<EvaluationResponse>>, error::Error> {
    let caller_id = get_claims(&req)?.sub;
    let evaluations = evaluation_service.list_for_user(caller_id, user_id.into_inner()).await?;
    Ok(success::Success::ok(Some(evaluations)).message("Evaluations retrieved successfully"))
}

#[delete("/delete/{cv_id:[0-9a-fA-F-]{36}}")]
pub async fn delete_evaluation(
    evaluation_service: web::Data<EvaluationService>,
    cv_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let caller_id = get_claims(&req)?.sub;
    evaluation_service.delete_by_cv(caller_id, cv_id.into_inner()).await?;
    Ok(success::Success::no_content())
}
