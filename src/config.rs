use std::env;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_AUTH_MODE: &str = "header";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `x-goog-api-key` request header.
    Header,
    /// `key` query-string parameter.
    Query,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model: String,
    pub base_url: String,
    pub auth: AuthMode,
    /// `None` keeps the HTTP client's defaults.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        Self {
            model: parse_non_empty(get_var("Q_MODEL").as_deref(), DEFAULT_MODEL),
            base_url: parse_non_empty(get_var("Q_BASE_URL").as_deref(), DEFAULT_BASE_URL),
            auth: parse_auth_mode(get_var("Q_AUTH").as_deref()),
            timeout_secs: parse_timeout_secs(get_var("Q_TIMEOUT_SECS").as_deref()),
        }
    }
}

fn parse_non_empty(raw: Option<&str>, default: &str) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn parse_timeout_secs(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
}

fn parse_auth_mode(raw: Option<&str>) -> AuthMode {
    match raw
        .unwrap_or(DEFAULT_AUTH_MODE)
        .trim()
        .to_ascii_lowercase()
        .as_str()
    {
        "query" => AuthMode::Query,
        _ => AuthMode::Header,
    }
}
