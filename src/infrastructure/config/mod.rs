use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_REFRESH_PATH: &str = "/api/users/refresh-token";
pub const DEFAULT_UNAUTHENTICATED_PATHS: &str = "/api/users/login,/api/users/register";
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub refresh_path: String,
    pub unauthenticated_paths: Vec<String>,
    pub login_route: String,
    pub token_store_path: Option<PathBuf>,
    pub access_policy_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub environment: Environment,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            api_base_url: env::var("API_BASE_URL")?,
            refresh_path: env::var("REFRESH_PATH")
                .unwrap_or_else(|_| DEFAULT_REFRESH_PATH.to_string()),
            unauthenticated_paths: parse_path_list(
                &env::var("UNAUTHENTICATED_PATHS")
                    .unwrap_or_else(|_| DEFAULT_UNAUTHENTICATED_PATHS.to_string()),
            ),
            login_route: env::var("LOGIN_ROUTE")
                .unwrap_or_else(|_| DEFAULT_LOGIN_ROUTE.to_string()),
            token_store_path: env::var("TOKEN_STORE_PATH").ok().map(PathBuf::from),
            access_policy_path: env::var("ACCESS_POLICY_PATH").ok().map(PathBuf::from),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
        };

        Ok(config)
    }

    /// Configuration pointing at `api_base_url` with every other setting at its default
    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            unauthenticated_paths: parse_path_list(DEFAULT_UNAUTHENTICATED_PATHS),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            token_store_path: None,
            access_policy_path: None,
            request_timeout_secs: 30,
            environment: Environment::Development,
            log_format: LogFormat::Pretty,
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
