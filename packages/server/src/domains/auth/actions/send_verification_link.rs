//! Send verification link action

use tracing::{error, info};

use crate::domains::auth::errors::AuthError;
use crate::kernel::ServerDeps;

/// Email a single-use verification link for an enrollment number.
///
/// The token binds both the enrollment number and the address the link was
/// sent to, so a link cannot be replayed for a different email. Sending the
/// link mutates nothing; the record changes only when the link is clicked.
pub async fn send_verification_link(
    enrollment_number: &str,
    email: &str,
    deps: &ServerDeps,
) -> Result<(), AuthError> {
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".to_string()));
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

    if student.password.is_some() {
        return Err(AuthError::Conflict(
            "Student already registered".to_string(),
        ));
    }

    if student.cis_id.is_some() {
        return Err(AuthError::Conflict(
            "Student email already verified".to_string(),
        ));
    }

    let token = deps
        .jwt_service
        .create_verification_token(enrollment_number, email)
        .map_err(AuthError::Internal)?;

    // Callback URL the emailed link points at
    let url = format!(
        "{}/auth/studentEmailVerify/?eno={}&email={}&token={}",
        deps.email_postback_url,
        enrollment_number,
        urlencoding::encode(email),
        token
    );

    deps.mailer
        .send_verification(email, &url)
        .await
        .map_err(|e| {
            error!(enrollment_number = %enrollment_number, error = %e, "Failed to send verification email");
            AuthError::Delivery("Error in sending email".to_string())
        })?;

    info!(enrollment_number = %enrollment_number, "Verification email dispatched");
    Ok(())
}
