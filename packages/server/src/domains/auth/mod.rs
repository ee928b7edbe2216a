//! Auth domain - student identity verification and credential issuance
//!
//! A strictly ordered state machine per enrollment number:
//!   UNVERIFIED → EMAIL_LINK_SENT → EMAIL_VERIFIED → REGISTERED
//!
//! Responsibilities:
//! - Enrollment-number probing (signup vs. login branching)
//! - Email ownership verification via signed link
//! - Password registration (argon2) and login
//! - Session/JWT token management

pub mod actions;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod password;
pub mod types;

pub use errors::AuthError;
pub use jwt::{Claims, InvalidToken, JwtService, TokenKind};
