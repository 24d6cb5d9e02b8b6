use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{AuthConfig, connect_database},
    constants::ScorerKind,
    llm_client::{LlmClient, LlmConfig},
    middlewares::{authentication, authorization},
    modules::{
        cv_upload::{
            model::UploadConfig, repository_pg::CvUploadRepositoryPg, service::CvUploadService,
        },
        evaluation::{
            extractor::DocumentExtractor,
            repository_pg::EvaluationRepositoryPg,
            scorer::{AiScorer, CvScorer, HeuristicScorer},
            service::EvaluationService,
        },
        user::{repository_pg::UserRepositoryPg, schema::UserRole, service::UserService},
    },
};

mod api;
mod configs;
mod constants;
mod llm_client;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

macro_rules! protected_scope {
    ($path:expr, $roles:expr) => {
        web::scope($path).wrap(from_fn(authorization($roles))).wrap(from_fn(authentication))
    };
}

/// Everything under `/api`. Public auth resources come before the protected
/// `/auth` scope; paths outside the module prefixes fall through to 404.
fn configure_api(cfg: &mut web::ServiceConfig) {
    let members = || vec![UserRole::User, UserRole::Admin];

    cfg.configure(modules::user::route::public_api_configure)
        .service(
            protected_scope!("/admin", vec![UserRole::Admin])
                .configure(modules::user::route::admin_configure),
        )
        .service(protected_scope!("/auth", members()).configure(modules::user::route::configure))
        .service(
            protected_scope!("/cv", members()).configure(modules::cv_upload::route::configure),
        )
        .service(
            protected_scope!("/evaluations", members())
                .configure(modules::evaluation::route::configure),
        );
}

fn build_scorer() -> std::io::Result<Arc<dyn CvScorer + Send + Sync>> {
    match ENV.scorer {
        ScorerKind::Heuristic => {
            log::info!("Using heuristic CV scorer");
            Ok(Arc::new(HeuristicScorer))
        }
        ScorerKind::Ai => {
            let client = LlmClient::new(LlmConfig::from_env(&ENV)).map_err(|e| {
                log::error!("Failed to build LLM client: {e}");
                std::io::Error::other("LLM client error")
            })?;
            log::info!("Using AI CV scorer with model {}", ENV.llm_model);
            Ok(Arc::new(AiScorer::new(Arc::new(client))))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool =
        connect_database().await.map_err(|_| std::io::Error::other("Database connection error"))?;

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let cv_repo = Arc::new(CvUploadRepositoryPg::new(db_pool.clone()));
    let evaluation_repo = Arc::new(EvaluationRepositoryPg::new(db_pool.clone()));

    let auth_config = AuthConfig::from_env(&ENV);
    let upload_config = UploadConfig::from_env(&ENV);

    let user_service =
        UserService::with_dependencies(user_repo.clone(), cv_repo.clone(), auth_config.clone());
    let cv_service =
        CvUploadService::with_dependencies(cv_repo.clone(), user_repo.clone(), upload_config);
    let evaluation_service = EvaluationService::with_dependencies(
        evaluation_repo,
        cv_repo,
        user_repo,
        Arc::new(DocumentExtractor),
        build_scorer()?,
    );

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(cv_service.clone()))
            .app_data(web::Data::new(evaluation_service.clone()))
            .service(health_check)
            .service(web::scope("/api").configure(configure_api))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
