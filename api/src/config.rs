use std::env;

/// Default header carrying the authenticated user's id
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Header set by the upstream identity proxy with the caller's user id
    pub identity_header: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            identity_header: env::var("IDENTITY_HEADER")
                .ok()
                .map(|h| h.trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.to_string()),
        }
    }
}
