//! In-memory stand-ins for the Postgres repositories and the LLM client.
//!
//! `MemoryStore` mirrors the table constraints the services rely on: unique
//! email, unique `(user, original filename)`, one evaluation per CV, the upload
//! quota and the cascading deletes.
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::api::error::{self, DbErrorMeta};
use crate::configs::AuthConfig;
use crate::llm_client::{LlmError, TextGenerator};
use crate::modules::cv_upload::{
    model::NewCvUpload, repository::CvUploadRepository, schema::CvUploadEntity,
};
use crate::modules::evaluation::{
    extractor::TextExtractor,
    model::NewEvaluation,
    repository::EvaluationRepository,
    schema::{EvaluationEntity, EvaluationType},
};
use crate::modules::user::{
    model::InsertUser,
    repository::UserRepository,
    schema::{UserEntity, UserRole},
};
use crate::utils::hash_password;

pub const TEST_PASSWORD: &str = "secret1";

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        access_token_expiration: 900,
        reset_token_expiration: 1800,
    }
}

#[derive(Default)]
struct State {
    users: Vec<UserEntity>,
    cvs: Vec<CvUploadEntity>,
    evaluations: Vec<EvaluationEntity>,
    fail_next_cv_insert: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn cv_count(&self) -> usize {
        self.lock().cvs.len()
    }

    pub fn evaluation_count(&self) -> usize {
        self.lock().evaluations.len()
    }

    pub fn evaluation_for(&self, cv_id: Uuid) -> EvaluationEntity {
        self.lock().evaluations.iter().find(|e| e.cv_id == cv_id).cloned().unwrap()
    }

    pub fn user_by_email(&self, email: &str) -> UserEntity {
        self.lock().users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned().unwrap()
    }

    pub fn set_role(&self, id: Uuid, role: UserRole) {
        let mut state = self.lock();
        let user = state.users.iter_mut().find(|u| u.id == id).unwrap();
        user.role = role;
    }

    pub fn fail_next_cv_insert(&self) {
        self.lock().fail_next_cv_insert = true;
    }

    pub fn seed_evaluation(&self, user_id: Uuid, cv_id: Uuid) -> EvaluationEntity {
        let evaluation = EvaluationEntity {
            id: Uuid::now_v7(),
            cv_id,
            user_id,
            cv_filename: "seeded.pdf".to_string(),
            resume_text: "seeded text".to_string(),
            score: 42.0,
            summary: "seeded".to_string(),
            recommendations: None,
            evaluation_type: EvaluationType::Heuristic,
            created_at: chrono::Utc::now(),
        };
        self.lock().evaluations.push(evaluation.clone());
        evaluation
    }
}

/// Inserts a USER account whose password is [`TEST_PASSWORD`].
pub fn seed_user(store: &MemoryStore, email: &str) -> UserEntity {
    let now = chrono::Utc::now();
    let user = UserEntity {
        id: Uuid::now_v7(),
        email: email.to_string(),
        name: None,
        surname: None,
        hash_password: hash_password(TEST_PASSWORD).unwrap(),
        role: UserRole::User,
        reset_token: None,
        reset_token_expires_at: None,
        created_at: now,
        updated_at: now,
    };
    store.lock().users.push(user.clone());
    user
}

/// A CV row without a file behind it; pair with [`FixedExtractor`].
pub fn seed_cv(store: &MemoryStore, user_id: Uuid, original_filename: &str) -> CvUploadEntity {
    let id = Uuid::now_v7();
    let cv = CvUploadEntity {
        id,
        filename: format!("{id}.pdf"),
        original_filename: original_filename.to_string(),
        mime_type: "application/pdf".to_string(),
        file_size: 1024,
        storage_path: format!("/nonexistent/{id}.pdf"),
        user_id,
        created_at: chrono::Utc::now(),
    };
    store.lock().cvs.push(cv.clone());
    cv
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock().users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock().users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.lock().users.iter().find(|u| u.reset_token.as_deref() == Some(token)).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(error::SystemError::Conflict(Some(DbErrorMeta::unique_violation(
                "users_email",
            ))));
        }

        let now = chrono::Utc::now();
        let entity = UserEntity {
            id: Uuid::now_v7(),
            email: user.email.clone(),
            name: user.name.clone(),
            surname: user.surname.clone(),
            hash_password: user.hash_password.clone(),
            role: user.role,
            reset_token: None,
            reset_token_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        state.users.push(entity.clone());
        Ok(entity)
    }

    async fn update_password(
        &self,
        id: &Uuid,
        hash_password: &str,
    ) -> Result<(), error::SystemError> {
        let mut state = self.lock();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        user.hash_password = hash_password.to_string();
        user.reset_token = None;
        user.reset_token_expires_at = None;
        user.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: &Uuid,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), error::SystemError> {
        let mut state = self.lock();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        user.reset_token = Some(token.to_string());
        user.reset_token_expires_at = Some(expires_at);
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.lock();
        let before = state.users.len();
        state.users.retain(|u| u.id != *id);
        state.cvs.retain(|c| c.user_id != *id);
        state.evaluations.retain(|e| e.user_id != *id);
        Ok(state.users.len() < before)
    }
}

#[async_trait::async_trait]
impl CvUploadRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<CvUploadEntity>, error::SystemError> {
        Ok(self.lock().cvs.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<CvUploadEntity>, error::SystemError> {
        Ok(self.lock().cvs.iter().filter(|c| c.user_id == *user_id).cloned().collect())
    }

    async fn count_by_user(&self, user_id: &Uuid) -> Result<i64, error::SystemError> {
        Ok(self.lock().cvs.iter().filter(|c| c.user_id == *user_id).count() as i64)
    }

    async fn exists_by_user_and_filename(
        &self,
        user_id: &Uuid,
        original_filename: &str,
    ) -> Result<bool, error::SystemError> {
        Ok(self
            .lock()
            .cvs
            .iter()
            .any(|c| c.user_id == *user_id && c.original_filename == original_filename))
    }

    async fn create_within_quota(
        &self,
        cv: &NewCvUpload,
        max_per_user: i64,
    ) -> Result<CvUploadEntity, error::SystemError> {
        let mut state = self.lock();

        if std::mem::take(&mut state.fail_next_cv_insert) {
            return Err(error::SystemError::DatabaseError("simulated insert failure".into()));
        }
        if !state.users.iter().any(|u| u.id == cv.user_id) {
            return Err(error::SystemError::not_found("User not found"));
        }
        let owned = state.cvs.iter().filter(|c| c.user_id == cv.user_id).count() as i64;
        if owned >= max_per_user {
            return Err(error::SystemError::bad_request(format!(
                "A user can upload at most {max_per_user} CVs"
            )));
        }
        if state
            .cvs
            .iter()
            .any(|c| c.user_id == cv.user_id && c.original_filename == cv.original_filename)
        {
            return Err(error::SystemError::Conflict(Some(DbErrorMeta::unique_violation(
                "cv_uploads_user_filename",
            ))));
        }

        let entity = CvUploadEntity {
            id: Uuid::now_v7(),
            filename: cv.filename.clone(),
            original_filename: cv.original_filename.clone(),
            mime_type: cv.mime_type.clone(),
            file_size: cv.file_size,
            storage_path: cv.storage_path.clone(),
            user_id: cv.user_id,
            created_at: chrono::Utc::now(),
        };
        state.cvs.push(entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.lock();
        let before = state.cvs.len();
        state.evaluations.retain(|e| e.cv_id != *id);
        state.cvs.retain(|c| c.id != *id);
        Ok(state.cvs.len() < before)
    }
}

#[async_trait::async_trait]
impl EvaluationRepository for MemoryStore {
    async fn find_by_cv(
        &self,
        cv_id: &Uuid,
    ) -> Result<Option<EvaluationEntity>, error::SystemError> {
        Ok(self.lock().evaluations.iter().find(|e| e.cv_id == *cv_id).cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<EvaluationEntity>, error::SystemError> {
        let mut found: Vec<EvaluationEntity> =
            self.lock().evaluations.iter().filter(|e| e.user_id == *user_id).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn create(
        &self,
        evaluation: &NewEvaluation,
    ) -> Result<EvaluationEntity, error::SystemError> {
        let mut state = self.lock();
        if !state.cvs.iter().any(|c| c.id == evaluation.cv_id) {
            return Err(error::SystemError::not_found("CV not found"));
        }
        if state.evaluations.iter().any(|e| e.cv_id == evaluation.cv_id) {
            return Err(error::SystemError::Conflict(Some(DbErrorMeta::unique_violation(
                "evaluations_cv_evaluation",
            ))));
        }

        let outcome = &evaluation.outcome;
        let entity = EvaluationEntity {
            id: Uuid::now_v7(),
            cv_id: evaluation.cv_id,
            user_id: evaluation.user_id,
            cv_filename: evaluation.cv_filename.clone(),
            resume_text: evaluation.resume_text.clone(),
            score: outcome.score,
            summary: outcome.summary.clone(),
            recommendations: outcome.recommendations.clone(),
            evaluation_type: outcome.evaluation_type,
            created_at: chrono::Utc::now(),
        };
        state.evaluations.push(entity.clone());
        Ok(entity)
    }

    async fn delete_by_cv(&self, cv_id: &Uuid) -> Result<bool, error::SystemError> {
        let mut state = self.lock();
        let before = state.evaluations.len();
        state.evaluations.retain(|e| e.cv_id != *cv_id);
        Ok(state.evaluations.len() < before)
    }
}

/// Returns canned text regardless of the path.
pub struct FixedExtractor {
    text: Option<String>,
}

impl FixedExtractor {
    pub fn text(text: &str) -> Self {
        Self { text: Some(text.to_string()) }
    }

    pub fn failing() -> Self {
        Self { text: None }
    }
}

impl TextExtractor for FixedExtractor {
    fn extract(&self, _path: &Path) -> Result<String, error::SystemError> {
        self.text.clone().ok_or_else(|| error::SystemError::extraction("Document could not be parsed"))
    }
}

pub struct StubGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self { reply: Some(reply.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { reply: None, prompts: Mutex::new(Vec::new()) }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or(LlmError::Api { status: 503, message: "upstream unavailable".to_string() })
    }
}

mod routes {
    use actix_web::{App, ResponseError, http::StatusCode, test, web};
    use serde_json::{Value, json};
    use std::sync::Arc;

    use super::*;
    use crate::api::success::SuccessData;
    use crate::modules::cv_upload::{model::UploadConfig, service::CvUploadService};
    use crate::modules::evaluation::{scorer::HeuristicScorer, service::EvaluationService};
    use crate::modules::user::{model::TokenResponse, service::UserService};

    const UPLOAD_LIMIT: usize = 2048;
    const BOUNDARY: &str = "cv-analyzer-boundary";

    macro_rules! init_app {
        ($store:expr) => {
            init_app!($store, std::env::temp_dir().as_path())
        };
        ($store:expr, $upload_dir:expr) => {{
            let user_service = UserService::with_dependencies(
                $store.clone(),
                $store.clone(),
                test_auth_config(),
            );
            let upload_config = UploadConfig {
                upload_dir: $upload_dir.to_path_buf(),
                max_file_size: UPLOAD_LIMIT,
                ..Default::default()
            };
            let cv_service =
                CvUploadService::with_dependencies($store.clone(), $store.clone(), upload_config);
            let evaluation_service = EvaluationService::with_dependencies(
                $store.clone(),
                $store.clone(),
                $store.clone(),
                Arc::new(FixedExtractor::text("Experienced engineer with five projects")),
                Arc::new(HeuristicScorer),
            );
            test::init_service(
                App::new()
                    .app_data(web::Data::new(user_service))
                    .app_data(web::Data::new(cv_service))
                    .app_data(web::Data::new(evaluation_service))
                    .app_data(web::Data::new(test_auth_config()))
                    .service(web::scope("/api").configure(crate::configure_api)),
            )
            .await
        }};
    }

    macro_rules! login {
        ($app:expr, $email:expr) => {{
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({ "email": $email, "password": TEST_PASSWORD }))
                .to_request();
            let body: SuccessData<TokenResponse> = test::call_and_read_body_json(&$app, req).await;
            body.data.unwrap().access_token
        }};
    }

    macro_rules! status_of {
        ($app:expr, $req:expr) => {
            match test::try_call_service(&$app, $req.to_request()).await {
                Ok(res) => res.status(),
                Err(e) => e.as_response_error().status_code(),
            }
        };
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {token}"))
    }

    /// One form-data part; `filename` and `content_type` are omitted when `None`.
    fn form_part(filename: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> Vec<u8> {
        let mut part = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"");
        if let Some(filename) = filename {
            part.push_str(&format!("; filename=\"{filename}\""));
        }
        part.push_str("\r\n");
        if let Some(content_type) = content_type {
            part.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        part.push_str("\r\n");

        let mut out = part.into_bytes();
        out.extend_from_slice(bytes);
        out.extend_from_slice(b"\r\n");
        out
    }

    fn upload_request(token: &str, parts: Vec<Vec<u8>>) -> test::TestRequest {
        let mut body: Vec<u8> = parts.concat();
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        test::TestRequest::post()
            .uri("/api/cv/upload")
            .insert_header(bearer(token))
            .insert_header(("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}")))
            .set_payload(body)
    }

    fn pdf_upload(token: &str, filename: &str, bytes: &[u8]) -> test::TestRequest {
        upload_request(token, vec![form_part(Some(filename), Some("application/pdf"), bytes)])
    }

    #[actix_web::test]
    async fn register_login_and_read_profile() {
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store);

        let req = test::TestRequest::post().uri("/api/auth/register").set_json(json!({
            "email": "alice@example.com",
            "password": "secret1",
            "name": "Alice",
            "surname": "Smith"
        }));
        assert_eq!(status_of!(app, req), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "alice@example.com", "password": "secret1" }))
            .to_request();
        let body: SuccessData<TokenResponse> = test::call_and_read_body_json(&app, req).await;
        let token = body.data.unwrap().access_token;

        let req =
            test::TestRequest::get().uri("/api/auth/me").insert_header(bearer(&token)).to_request();
        let body: SuccessData<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.data.unwrap()["display_name"], "Alice Smith");
    }

    #[actix_web::test]
    async fn protected_routes_require_a_valid_token() {
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store);

        let req = test::TestRequest::get().uri("/api/auth/me");
        assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/api/auth/me").insert_header(bearer("garbage"));
        assert_eq!(status_of!(app, req), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn invalid_body_reports_field_errors() {
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": "not-an-email", "password": "123" }))
            .to_request();
        let res = match test::try_call_service(&app, req).await {
            Ok(res) => res,
            Err(e) => panic!("unexpected error: {e}"),
        };
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Validation error");
        assert!(body["messages"]["email"].is_string());
        assert!(body["messages"]["password"].is_string());
        assert_eq!(store.user_count(), 0);
    }

    #[actix_web::test]
    async fn reset_tokens_are_admin_only() {
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store);
        seed_user(&store, "alice@example.com");
        let admin = seed_user(&store, "admin@example.com");
        store.set_role(admin.id, UserRole::Admin);

        let user_token = login!(app, "alice@example.com");
        let admin_token = login!(app, "admin@example.com");

        let issue = |token: &str| {
            test::TestRequest::post()
                .uri("/api/admin/reset-token")
                .insert_header(bearer(token))
                .set_json(json!({ "email": "alice@example.com" }))
        };
        assert_eq!(status_of!(app, issue(&user_token)), StatusCode::FORBIDDEN);
        assert_eq!(status_of!(app, issue(&admin_token)), StatusCode::CREATED);

        let token = store.user_by_email("alice@example.com").reset_token.unwrap();
        let req = test::TestRequest::post()
            .uri("/api/auth/reset-password")
            .set_json(json!({ "token": token, "new_password": "brand-new" }));
        assert_eq!(status_of!(app, req), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_api_paths_are_not_found() {
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store);

        let req = test::TestRequest::get().uri("/api/nonexistent");
        assert_eq!(status_of!(app, req), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/cv/user/my-cvs");
        assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn upload_list_download_and_reupload() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store, dir.path());
        seed_user(&store, "alice@example.com");
        let token = login!(app, "alice@example.com");

        let resume = vec![b'x'; 1024];
        let req = pdf_upload(&token, "resume.pdf", &resume).to_request();
        let body: SuccessData<Value> = test::call_and_read_body_json(&app, req).await;
        let data = body.data.unwrap();
        assert_eq!(data["original_filename"], "resume.pdf");
        assert_eq!(data["file_size"], 1024);
        let cv_id = data["id"].as_str().unwrap().to_string();

        let req = pdf_upload(&token, "resume.pdf", &resume);
        assert_eq!(status_of!(app, req), StatusCode::CONFLICT);

        let req = test::TestRequest::get().uri("/api/cv/user/my-cvs").insert_header(bearer(&token));
        let body: SuccessData<Vec<Value>> =
            test::call_and_read_body_json(&app, req.to_request()).await;
        assert_eq!(body.data.unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/cv/{cv_id}"))
            .insert_header(bearer(&token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let disposition = res.headers().get("Content-Disposition").unwrap().to_str().unwrap();
        assert!(disposition.starts_with("attachment"));
        assert!(disposition.contains("resume.pdf"));
        assert_eq!(test::read_body(res).await.as_ref(), resume.as_slice());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/cv/delete/{cv_id}"))
            .insert_header(bearer(&token));
        assert_eq!(status_of!(app, req), StatusCode::NO_CONTENT);
        assert_eq!(store.cv_count(), 0);
    }

    #[actix_web::test]
    async fn upload_rejects_oversize_and_missing_file_parts() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store, dir.path());
        seed_user(&store, "alice@example.com");
        let token = login!(app, "alice@example.com");

        let req = pdf_upload(&token, "big.pdf", &vec![b'x'; UPLOAD_LIMIT * 2]);
        assert_eq!(status_of!(app, req), StatusCode::BAD_REQUEST);

        let req = upload_request(&token, vec![form_part(None, None, b"just a text field")]);
        assert_eq!(status_of!(app, req), StatusCode::BAD_REQUEST);

        assert_eq!(store.cv_count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn upload_without_part_content_type_guesses_from_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store, dir.path());
        seed_user(&store, "alice@example.com");
        let token = login!(app, "alice@example.com");

        let parts = vec![
            form_part(None, None, b"ignored"),
            form_part(Some("cv.docx"), None, b"PK\x03\x04 docx bytes"),
        ];
        let req = upload_request(&token, parts).to_request();
        let body: SuccessData<Value> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body.data.unwrap()["mime_type"],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
    }

    #[actix_web::test]
    async fn analyze_once_then_conflict_and_delete_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::default());
        let app = init_app!(store, dir.path());
        seed_user(&store, "alice@example.com");
        seed_user(&store, "mallory@example.com");
        let token = login!(app, "alice@example.com");
        let other_token = login!(app, "mallory@example.com");

        let req = pdf_upload(&token, "resume.pdf", b"%PDF-1.7 body").to_request();
        let body: SuccessData<Value> = test::call_and_read_body_json(&app, req).await;
        let cv_id = body.data.unwrap()["id"].as_str().unwrap().to_string();

        let analyze = |token: &str| {
            test::TestRequest::post()
                .uri(&format!("/api/evaluations/analyze/{cv_id}"))
                .insert_header(bearer(token))
        };
        assert_eq!(status_of!(app, analyze(&other_token)), StatusCode::FORBIDDEN);

        let body: SuccessData<Value> =
            test::call_and_read_body_json(&app, analyze(&token).to_request()).await;
        let evaluation = body.data.unwrap();
        assert_eq!(evaluation["score"], 0.5);
        assert_eq!(evaluation["evaluation_type"], "HEURISTIC");
        assert_eq!(evaluation["cv_filename"], "resume.pdf");

        assert_eq!(status_of!(app, analyze(&token)), StatusCode::CONFLICT);
        assert_eq!(store.evaluation_count(), 1);

        let req = test::TestRequest::get().uri("/api/evaluations").insert_header(bearer(&token));
        let body: SuccessData<Vec<Value>> =
            test::call_and_read_body_json(&app, req.to_request()).await;
        assert_eq!(body.data.unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/evaluations/delete/{cv_id}"))
            .insert_header(bearer(&token));
        assert_eq!(status_of!(app, req), StatusCode::NO_CONTENT);
        assert_eq!(store.evaluation_count(), 0);
    }
}
