use axum::http::HeaderValue;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3001;

const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// Error responses carry the underlying detail (db messages) when set.
    pub expose_error_detail: bool,
    /// Exact origins only; `*` cannot be combined with credentialed CORS.
    pub cors_origins: Vec<HeaderValue>,
}

fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let invalid = || ConfigError::Invalid {
        name: "CORS_ORIGINS",
        value: origin.to_string(),
    };
    if origin == "*" {
        return Err(invalid());
    }
    origin.parse::<HeaderValue>().map_err(|_| invalid())
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let expose_error_detail = lookup("APP_ENV")
            .map(|env| env.trim().eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(parse_origin)
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_CORS_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
        };

        Ok(Self {
            database_url,
            port,
            expose_error_detail,
            cors_origins,
        })
    }
}
