//! Login action

use tracing::info;

use crate::domains::auth::errors::AuthError;
use crate::domains::auth::password::verify_password;
use crate::domains::auth::types::AuthenticatedStudent;
use crate::kernel::ServerDeps;

/// Authenticate a registered student by email and password.
///
/// An account that never completed signup and a wrong password produce the
/// same rejection; only a missing record is reported as not-found.
pub async fn login(
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

    let student = deps.directory.find_by_email(email).await?;

    let Some(student) = student else {
        return Err(AuthError::NotFound("Student not found".to_string()));
    };

    let Some(credential_hash) = &student.password else {
        return Err(AuthError::Unauthorized(
            "Invalid password or id".to_string(),
        ));
    };

    if !verify_password(password, credential_hash) {
        return Err(AuthError::Unauthorized(
            "Invalid password or id".to_string(),
        ));
    }

    let token = deps
        .jwt_service
        .create_session_token(&student.enrollment_number)
        .map_err(AuthError::Internal)?;

    info!(enrollment_number = %student.enrollment_number, "Student login successful");

    Ok(AuthenticatedStudent {
        token,
        student: student.into(),
    })
}
