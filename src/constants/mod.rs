pub const MAX_CVS_PER_USER: i64 = 3;
pub const MAX_SUMMARY_CHARS: usize = 2000;
pub const MAX_RESUME_TEXT_CHARS: usize = 5000;
pub const MAX_FILENAME_CHARS: usize = 255;
pub const MAX_EXTENSION_CHARS: usize = 16;
pub const DEFAULT_DISPLAY_NAME: &str = "User";

pub const ALLOWED_CV_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    Heuristic,
    Ai,
}

pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub reset_token_expiration: u64,
    pub database_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub upload_dir: String,
    pub max_upload_size: usize,
    pub scorer: ScorerKind,
    pub llm_api_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let access_token_expiration = std::env::var("ACCESS_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<u64>()
            .expect("ACCESS_TOKEN_EXPIRATION must be a valid u64 integer");
        let reset_token_expiration = std::env::var("RESET_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "1800".to_string())
            .parse::<u64>()
            .expect("RESET_TOKEN_EXPIRATION must be a valid u64 integer");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| (5 * 1024 * 1024).to_string())
            .parse::<usize>()
            .expect("MAX_UPLOAD_SIZE must be a valid byte count");

        let scorer = match std::env::var("SCORER").unwrap_or_default().to_lowercase().as_str() {
            "ai" => ScorerKind::Ai,
            "" | "heuristic" => ScorerKind::Heuristic,
            other => panic!("SCORER must be 'heuristic' or 'ai', got '{other}'"),
        };

        let llm_api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string());
        let llm_api_key = std::env::var("LLM_API_KEY").unwrap_or_default();
        if scorer == ScorerKind::Ai && llm_api_key.is_empty() {
            panic!("LLM_API_KEY must be set when SCORER=ai");
        }
        let llm_model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let llm_timeout_secs = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .expect("LLM_TIMEOUT_SECS must be a valid u64 integer");

        Env {
            jwt_secret,
            access_token_expiration,
            reset_token_expiration,
            database_url,
            frontend_url,
            ip,
            port,
            upload_dir,
            max_upload_size,
            scorer,
            llm_api_url,
            llm_api_key,
            llm_model,
            llm_timeout_secs,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
