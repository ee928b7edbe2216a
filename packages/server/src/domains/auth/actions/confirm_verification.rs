//! Confirm verification link action

use anyhow::anyhow;
use tracing::info;

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::jwt::TokenKind;
use crate::kernel::ServerDeps;

/// Handle a clicked verification link: check the token, then record the
/// verified email.
///
/// The token must be a verification-kind token issued for exactly this
/// (enrollment number, email) pair; a session token or a token issued for
/// another pair is rejected uniformly. Re-confirming the same email is a
/// no-op success.
pub async fn confirm_verification(
    enrollment_number: &str,
    email: &str,
    token: &str,
    deps: &ServerDeps,
) -> Result<(), AuthError> {
    let claims = deps
        .jwt_service
        .verify_token(token)
        .map_err(|_| AuthError::Unauthorized("Unauthorized".to_string()))?;

    let bound_to_request = claims.kind == TokenKind::Verification
        && claims.sub == enrollment_number
        && claims.email.as_deref() == Some(email);
    if !bound_to_request {
        return Err(AuthError::Unauthorized("Unauthorized".to_string()));
    }

    let updated = deps
        .directory
        .set_email_verified(enrollment_number, email)
        .await?;

    if updated.is_none() {
        // Record missing or already bound to a different address
        return Err(AuthError::Internal(anyhow!(
            "email verification write rejected for enrollment {}",
            enrollment_number
        )));
    }

    info!(enrollment_number = %enrollment_number, "Student email verified");
    Ok(())
}
