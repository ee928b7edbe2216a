use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Discriminates session tokens from email-verification tokens so one can
/// never stand in for the other.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Session,
    Verification,
}

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (enrollment number)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>, // Email being verified (verification tokens only)
    pub kind: TokenKind,
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
    pub iss: String, // Issuer
    pub jti: String, // JWT ID (unique token identifier)
}

/// Uniform rejection for expired, tampered and malformed tokens alike.
/// Callers cannot tell the cases apart.
#[derive(Debug, Error)]
#[error("Invalid or expired token")]
pub struct InvalidToken;

/// JWT Service - creates and verifies session and verification tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    session_ttl: chrono::Duration,
    verification_ttl: chrono::Duration,
}

impl JwtService {
    /// Create new JWT service with secret, issuer and token lifetimes
    pub fn new(
        secret: &str,
        issuer: String,
        session_ttl: chrono::Duration,
        verification_ttl: chrono::Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            session_ttl,
            verification_ttl,
        }
    }

    /// Create a session token asserting the bearer's enrollment number
    pub fn create_session_token(&self, enrollment_number: &str) -> Result<String> {
        self.create_token(enrollment_number, None, TokenKind::Session, self.session_ttl)
    }

    /// Create a short-lived token binding an enrollment number to the email
    /// address a verification link was sent to
    pub fn create_verification_token(
        &self,
        enrollment_number: &str,
        email: &str,
    ) -> Result<String> {
        self.create_token(
            enrollment_number,
            Some(email.to_string()),
            TokenKind::Verification,
            self.verification_ttl,
        )
    }

    fn create_token(
        &self,
        enrollment_number: &str,
        email: Option<String>,
        kind: TokenKind,
        ttl: chrono::Duration,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + ttl;

        let claims = Claims {
            sub: enrollment_number.to_string(),
            email,
            kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token
    ///
    /// Signature, expiry and issuer are all checked; every failure mode
    /// collapses into the same `InvalidToken`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, InvalidToken> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        // No clock-skew allowance: expiry is an exact cutoff
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| InvalidToken)
    }
}
