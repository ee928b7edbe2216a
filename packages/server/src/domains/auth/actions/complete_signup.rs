//! Complete signup action

use tracing::info;

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::password::hash_password;
use crate::domains::auth::types::AuthenticatedStudent;
use crate::kernel::ServerDeps;

/// Register a password for a verified account and issue the first session.
///
/// Ordering matters: the hash is computed before any write, the conditional
/// write is checked before any token is issued, and a lost write means some
/// concurrent signup already registered the account.
pub async fn complete_signup(
    enrollment_number: &str,
    email: &str,
    password: &str,
    deps: &ServerDeps,
) -> Result<AuthenticatedStudent, AuthError> {
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }
    if enrollment_number.is_empty() {
        return Err(AuthError::Validation(
            "Enrollment number is required".to_string(),
        ));
    }

    let student = deps
        .directory
        .find_by_enrollment_number(enrollment_number)
        .await?;

    let Some(student) = student else {
        return Err(AuthError::NotFound("Student not found".to_string()));
    };

    let Some(verified_email) = &student.cis_id else {
        return Err(AuthError::Conflict(
            "Student email not verified".to_string(),
        ));
    };

    if verified_email != email {
        return Err(AuthError::Conflict("Email incorrect".to_string()));
    }

    if student.password.is_some() {
        return Err(AuthError::Conflict(
            "Student already registered".to_string(),
        ));
    }

    let hash = hash_password(password).map_err(AuthError::Internal)?;

    let registered = deps
        .directory
        .set_credential(enrollment_number, &hash)
        .await?;

    // Zero rows updated: a concurrent signup won the conditional write
    let Some(registered) = registered else {
        return Err(AuthError::Conflict(
            "Student already registered".to_string(),
        ));
    };

    let token = deps
        .jwt_service
        .create_session_token(enrollment_number)
        .map_err(AuthError::Internal)?;

    info!(enrollment_number = %enrollment_number, "Student signup completed");

    Ok(AuthenticatedStudent {
        token,
        student: registered.into(),
    })
}
