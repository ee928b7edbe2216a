use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub session_token_ttl_hours: i64,
    pub verification_token_ttl_minutes: i64,
    pub email_postback_url: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from_address: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "club-platform".to_string()),
            session_token_ttl_hours: env::var("SESSION_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .context("SESSION_TOKEN_TTL_HOURS must be a valid number")?,
            verification_token_ttl_minutes: env::var("VERIFICATION_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("VERIFICATION_TOKEN_TTL_MINUTES must be a valid number")?,
            email_postback_url: env::var("EMAIL_POSTBACK_URL")
                .context("EMAIL_POSTBACK_URL must be set")?,
            mail_api_url: env::var("MAIL_API_URL")
                .context("MAIL_API_URL must be set")?,
            mail_api_key: env::var("MAIL_API_KEY")
                .context("MAIL_API_KEY must be set")?,
            mail_from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "no-reply@clubs.example.edu".to_string()),
        })
    }
}
