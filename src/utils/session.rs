// src/utils/session.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{FromRef, FromRequestParts},
    http::{Request, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, SESSION_COOKIE},
    error::AppError,
    models::participant::PendingRegistration,
};

/// Per-browser state carried in the signed session cookie.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Registration fields waiting for the access code.
    pub pending: Option<PendingRegistration>,
    /// Participant bound to this browser after verification.
    pub participant_id: Option<i64>,
    pub is_admin: bool,
}

/// Token claims: the session plus its expiry as Unix timestamp.
#[derive(Debug, Deserialize, Serialize)]
struct SessionClaims {
    #[serde(flatten)]
    session: Session,
    exp: usize,
}

impl Session {
    /// Signs the session into an opaque token.
    pub fn sign(&self, secret: &str, ttl_seconds: u64) -> Result<String, AppError> {
        let expiration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?
            .as_secs() as usize
            + ttl_seconds as usize;

        let claims = SessionClaims {
            session: self.clone(),
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Verifies and decodes a token produced by [`Session::sign`].
    pub fn verify(token: &str, secret: &str) -> Result<Session, AppError> {
        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

        Ok(token_data.claims.session)
    }

    /// Builds the `Set-Cookie` header pair storing this session.
    pub fn cookie(&self, config: &Config) -> Result<[(header::HeaderName, String); 1], AppError> {
        let token = self.sign(&config.session_secret, config.session_ttl)?;
        let value = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, token, config.session_ttl
        );
        Ok([(header::SET_COOKIE, value)])
    }

    fn from_headers(headers: &axum::http::HeaderMap, secret: &str) -> Session {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .find_map(|cookie| {
                cookie
                    .trim()
                    .strip_prefix(SESSION_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
            });

        match token {
            Some(token) => Session::verify(token, secret).unwrap_or_else(|_| {
                tracing::debug!("Discarding invalid or expired session cookie");
                Session::default()
            }),
            None => Session::default(),
        }
    }
}

/// Missing, tampered or expired cookies produce an empty session.
impl<S> FromRequestParts<S> for Session
where
    Config: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Config::from_ref(state);
        Ok(Session::from_headers(&parts.headers, &config.session_secret))
    }
}

/// Axum Middleware: Admin Authorization.
///
/// Sessions without the admin flag are redirected to the login view.
pub async fn admin_middleware(session: Session, req: Request<Body>, next: Next) -> Response {
    if !session.is_admin {
        tracing::warn!("Rejected admin request to {}", req.uri().path());
        return Redirect::to("/admin").into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn pending() -> PendingRegistration {
        PendingRegistration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            contact: "555-0100".to_string(),
        }
    }

    #[test]
    fn signed_session_verifies_with_same_secret() {
        let session = Session {
            pending: Some(pending()),
            participant_id: Some(7),
            is_admin: false,
        };

        let token = session.sign("secret", 60).unwrap();
        assert_eq!(Session::verify(&token, "secret").unwrap(), session);
        assert!(Session::verify(&token, "other").is_err());
    }

    #[test]
    fn tampered_cookie_yields_empty_session() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; quiz_session=not.a.token"),
        );

        assert_eq!(Session::from_headers(&headers, "secret"), Session::default());
    }

    #[test]
    fn cookie_is_found_among_others() {
        let session = Session {
            is_admin: true,
            ..Session::default()
        };
        let token = session.sign("secret", 60).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; quiz_session={}", token)).unwrap(),
        );

        assert!(Session::from_headers(&headers, "secret").is_admin);
    }
}
