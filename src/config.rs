// src/config.rs

use std::{env, net::SocketAddr};
use dotenvy::dotenv;

/// Option labels a question can carry, in display order.
pub const OPTION_LABELS: [&str; 4] = ["a", "b", "c", "d"];

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "quiz_session";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl: u64,
    pub admin_username: String,
    pub admin_password: String,
    pub access_code: String,
    pub default_timer_seconds: i64,
    pub event_title: String,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:quiz.db".to_string());

        let session_secret = env::var("SESSION_SECRET")
            .expect("SESSION_SECRET must be set");

        let session_ttl = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(4 * 60 * 60);

        let admin_username = env::var("ADMIN_USERNAME")
            .expect("ADMIN_USERNAME must be set");

        let admin_password = env::var("ADMIN_PASSWORD")
            .expect("ADMIN_PASSWORD must be set");

        let access_code = env::var("ACCESS_CODE")
            .expect("ACCESS_CODE must be set");

        let default_timer_seconds = env::var("DEFAULT_TIMER_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        let event_title = env::var("EVENT_TITLE")
            .unwrap_or_else(|_| "Quiz".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            session_secret,
            session_ttl,
            admin_username,
            admin_password,
            access_code,
            default_timer_seconds,
            event_title,
            bind_addr,
            rust_log,
        }
    }
}
