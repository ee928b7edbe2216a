//! Integration tests for the student auth workflow.
//!
//! Tests all critical paths against the in-memory collaborators:
//! - Enrollment probing (signup/login branching)
//! - Verification link issuance and confirmation
//! - Password signup completion
//! - Login and session issuance
//! - State-machine conflict and race scenarios

use std::sync::Arc;

use server_core::domains::auth::actions::{
    complete_signup, confirm_verification, login, probe_enrollment, send_verification_link,
};
use server_core::domains::auth::models::Student;
use server_core::domains::auth::password::hash_password;
use server_core::domains::auth::types::ProbeResult;
use server_core::domains::auth::{AuthError, JwtService, TokenKind};
use server_core::kernel::{BaseStudentDirectory, MockMailDispatcher, MockStudentDirectory, ServerDeps};

const POSTBACK_URL: &str = "https://clubs.example.edu";

// ============================================================================
// Test Helpers
// ============================================================================

fn jwt_service() -> Arc<JwtService> {
    Arc::new(JwtService::new(
        "test_secret_key",
        "test_issuer".to_string(),
        chrono::Duration::hours(24),
        chrono::Duration::minutes(15),
    ))
}

/// A freshly imported student: no verified email, no credential
fn unverified_student(enrollment_number: &str) -> Student {
    Student {
        enrollment_number: enrollment_number.to_string(),
        cis_id: None,
        password: None,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        credits: "10".to_string(),
        in_club_as_team: None,
        in_club_as_member: Some("robotics".to_string()),
    }
}

fn test_deps(directory: &MockStudentDirectory, mailer: &MockMailDispatcher) -> ServerDeps {
    ServerDeps::new(
        Arc::new(directory.clone()),
        Arc::new(mailer.clone()),
        jwt_service(),
        POSTBACK_URL.to_string(),
    )
}

/// Pull the token query parameter out of a dispatched verification URL
fn token_from_url(url: &str) -> String {
    url.split("token=")
        .nth(1)
        .expect("verification URL should carry a token")
        .to_string()
}

// ============================================================================
// Probe Enrollment Tests
// ============================================================================

#[tokio::test]
async fn test_probe_unknown_enrollment_returns_not_found() {
    let directory = MockStudentDirectory::new();
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = probe_enrollment("123456789", &deps).await;

    assert!(matches!(result, Err(AuthError::NotFound(ref m)) if m == "Student not found"));
}

#[tokio::test]
async fn test_probe_rejects_malformed_enrollment_number() {
    let directory = MockStudentDirectory::new();
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    for bad in ["", "12345678", "1234567890"] {
        let result = probe_enrollment(bad, &deps).await;
        assert!(
            matches!(result, Err(AuthError::Validation(_))),
            "enrollment {:?} should fail validation",
            bad
        );
    }
}

#[tokio::test]
async fn test_probe_is_signup_until_verified_then_login() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    assert_eq!(
        probe_enrollment("123456789", &deps).await.unwrap(),
        ProbeResult::Signup
    );

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();
    let (_, url) = mailer.sent_calls().pop().unwrap();
    confirm_verification("123456789", "a@x.com", &token_from_url(&url), &deps)
        .await
        .unwrap();

    // Once verified, probing reports login with that email, on every call
    for _ in 0..2 {
        assert_eq!(
            probe_enrollment("123456789", &deps).await.unwrap(),
            ProbeResult::Login {
                email: "a@x.com".to_string()
            }
        );
    }
}

// ============================================================================
// Verification Link Tests
// ============================================================================

#[tokio::test]
async fn test_send_verification_builds_postback_url() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();

    let calls = mailer.sent_calls();
    assert_eq!(calls.len(), 1);

    let (to, url) = &calls[0];
    assert_eq!(to, "a@x.com");
    assert!(url.starts_with(
        "https://clubs.example.edu/auth/studentEmailVerify/?eno=123456789&email=a%40x.com&token="
    ));
    assert!(!token_from_url(url).is_empty());
}

#[tokio::test]
async fn test_send_verification_twice_dispatches_twice_without_mutation() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();
    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();

    assert_eq!(mailer.sent_calls().len(), 2);

    // Sending proves nothing: the record only changes on link click
    let student = directory.get("123456789").unwrap();
    assert_eq!(student.cis_id, None);
    assert_eq!(student.password, None);
}

#[tokio::test]
async fn test_send_verification_requires_both_fields() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = send_verification_link("123456789", "", &deps).await;
    assert!(matches!(result, Err(AuthError::Validation(ref m)) if m == "Email is required"));

    let result = send_verification_link("", "a@x.com", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Validation(ref m)) if m == "Enrollment number is required")
    );

    assert!(mailer.sent_calls().is_empty());
}

#[tokio::test]
async fn test_send_verification_conflicts_after_state_advances() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    directory
        .set_email_verified("123456789", "a@x.com")
        .await
        .unwrap();

    let result = send_verification_link("123456789", "a@x.com", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Conflict(ref m)) if m == "Student email already verified")
    );

    directory.set_credential("123456789", "hash").await.unwrap();

    let result = send_verification_link("123456789", "a@x.com", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Conflict(ref m)) if m == "Student already registered")
    );

    assert!(mailer.sent_calls().is_empty());
}

#[tokio::test]
async fn test_mail_failure_maps_to_delivery_error() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new().with_failure();
    let deps = test_deps(&directory, &mailer);

    let result = send_verification_link("123456789", "a@x.com", &deps).await;

    assert!(matches!(result, Err(AuthError::Delivery(ref m)) if m == "Error in sending email"));
    assert_eq!(directory.get("123456789").unwrap().cis_id, None);
}

// ============================================================================
// Link Confirmation Tests
// ============================================================================

#[tokio::test]
async fn test_confirm_rejects_garbage_token() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = confirm_verification("123456789", "a@x.com", "not-a-token", &deps).await;

    assert!(matches!(result, Err(AuthError::Unauthorized(_))));
    assert_eq!(directory.get("123456789").unwrap().cis_id, None);
}

#[tokio::test]
async fn test_confirm_rejects_session_token() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    // A session token is not proof of email ownership
    let session_token = deps.jwt_service.create_session_token("123456789").unwrap();
    let result = confirm_verification("123456789", "a@x.com", &session_token, &deps).await;

    assert!(matches!(result, Err(AuthError::Unauthorized(_))));
}

#[tokio::test]
async fn test_confirm_rejects_replay_with_different_email() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();
    let (_, url) = mailer.sent_calls().pop().unwrap();
    let token = token_from_url(&url);

    // Valid token, but presented with an email it was not issued for
    let result = confirm_verification("123456789", "b@x.com", &token, &deps).await;
    assert!(matches!(result, Err(AuthError::Unauthorized(_))));

    // Or with an enrollment number it was not issued for
    let result = confirm_verification("987654321", "a@x.com", &token, &deps).await;
    assert!(matches!(result, Err(AuthError::Unauthorized(_))));

    assert_eq!(directory.get("123456789").unwrap().cis_id, None);
}

#[tokio::test]
async fn test_confirm_rejects_expired_token() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let short_lived = Arc::new(JwtService::new(
        "test_secret_key",
        "test_issuer".to_string(),
        chrono::Duration::hours(24),
        chrono::Duration::seconds(1),
    ));
    let deps = ServerDeps::new(
        Arc::new(directory.clone()),
        Arc::new(mailer.clone()),
        short_lived,
        POSTBACK_URL.to_string(),
    );

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();
    let (_, url) = mailer.sent_calls().pop().unwrap();
    let token = token_from_url(&url);

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    let result = confirm_verification("123456789", "a@x.com", &token, &deps).await;
    assert!(matches!(result, Err(AuthError::Unauthorized(_))));
}

#[tokio::test]
async fn test_confirm_twice_with_same_email_is_a_no_op() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();
    let (_, url) = mailer.sent_calls().pop().unwrap();
    let token = token_from_url(&url);

    confirm_verification("123456789", "a@x.com", &token, &deps)
        .await
        .unwrap();
    confirm_verification("123456789", "a@x.com", &token, &deps)
        .await
        .unwrap();

    assert_eq!(
        directory.get("123456789").unwrap().cis_id.as_deref(),
        Some("a@x.com")
    );
}

// ============================================================================
// Signup Completion Tests
// ============================================================================

#[tokio::test]
async fn test_full_signup_flow() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    assert_eq!(
        probe_enrollment("123456789", &deps).await.unwrap(),
        ProbeResult::Signup
    );

    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();
    assert_eq!(mailer.sent_calls().len(), 1);

    let (_, url) = mailer.sent_calls().pop().unwrap();
    confirm_verification("123456789", "a@x.com", &token_from_url(&url), &deps)
        .await
        .unwrap();
    assert_eq!(
        directory.get("123456789").unwrap().cis_id.as_deref(),
        Some("a@x.com")
    );

    let authenticated = complete_signup("123456789", "a@x.com", "pw1", &deps)
        .await
        .unwrap();

    // The session token asserts the enrollment number
    let claims = deps.jwt_service.verify_token(&authenticated.token).unwrap();
    assert_eq!(claims.sub, "123456789");
    assert_eq!(claims.kind, TokenKind::Session);

    assert_eq!(authenticated.student.enrollment_number, "123456789");
    assert_eq!(authenticated.student.email, "a@x.com");
    assert_eq!(authenticated.student.first_name, "Ada");
    assert_eq!(authenticated.student.credits, "10");
    assert_eq!(
        authenticated.student.in_club_as_member.as_deref(),
        Some("robotics")
    );

    // The signup path is permanently closed once registered
    let result = complete_signup("123456789", "a@x.com", "pw1", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Conflict(ref m)) if m == "Student already registered")
    );
}

#[tokio::test]
async fn test_signup_requires_prior_verification() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    // Even after a link was sent, signup stays closed until the click
    send_verification_link("123456789", "a@x.com", &deps)
        .await
        .unwrap();

    let result = complete_signup("123456789", "a@x.com", "pw1", &deps).await;

    assert!(
        matches!(result, Err(AuthError::Conflict(ref m)) if m == "Student email not verified")
    );
    assert_eq!(directory.get("123456789").unwrap().password, None);
}

#[tokio::test]
async fn test_signup_rejects_mismatched_email() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    directory
        .set_email_verified("123456789", "a@x.com")
        .await
        .unwrap();

    let result = complete_signup("123456789", "b@x.com", "pw1", &deps).await;

    assert!(matches!(result, Err(AuthError::Conflict(ref m)) if m == "Email incorrect"));
    assert_eq!(directory.get("123456789").unwrap().password, None);
}

#[tokio::test]
async fn test_signup_requires_all_fields() {
    let directory = MockStudentDirectory::new();
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = complete_signup("123456789", "", "pw1", &deps).await;
    assert!(matches!(result, Err(AuthError::Validation(ref m)) if m == "Email is required"));

    let result = complete_signup("123456789", "a@x.com", "", &deps).await;
    assert!(matches!(result, Err(AuthError::Validation(ref m)) if m == "Password is required"));

    let result = complete_signup("", "a@x.com", "pw1", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Validation(ref m)) if m == "Enrollment number is required")
    );
}

#[tokio::test]
async fn test_signup_unknown_enrollment_returns_not_found() {
    let directory = MockStudentDirectory::new();
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = complete_signup("123456789", "a@x.com", "pw1", &deps).await;
    assert!(matches!(result, Err(AuthError::NotFound(ref m)) if m == "Student not found"));
}

#[tokio::test]
async fn test_credential_write_is_single_shot() {
    let directory = MockStudentDirectory::new().with_student(unverified_student("123456789"));
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    directory
        .set_email_verified("123456789", "a@x.com")
        .await
        .unwrap();
    complete_signup("123456789", "a@x.com", "pw1", &deps)
        .await
        .unwrap();

    // A writer that lost the conditional write gets nothing back; the stored
    // credential is untouched
    let stored = directory.get("123456789").unwrap().password.unwrap();
    let lost = directory
        .set_credential("123456789", "other-hash")
        .await
        .unwrap();
    assert!(lost.is_none());
    assert_eq!(directory.get("123456789").unwrap().password.unwrap(), stored);
}

// ============================================================================
// Login Tests
// ============================================================================

/// Seed a fully registered student (email verified, password set)
fn registered_student_directory(password: &str) -> MockStudentDirectory {
    let mut student = unverified_student("123456789");
    student.cis_id = Some("a@x.com".to_string());
    student.password = Some(hash_password(password).unwrap());
    MockStudentDirectory::new().with_student(student)
}

#[tokio::test]
async fn test_login_succeeds_with_correct_password() {
    let directory = registered_student_directory("pw1");
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let authenticated = login("a@x.com", "pw1", &deps).await.unwrap();

    let claims = deps.jwt_service.verify_token(&authenticated.token).unwrap();
    assert_eq!(claims.sub, "123456789");
    assert_eq!(claims.kind, TokenKind::Session);
    assert_eq!(authenticated.student.email, "a@x.com");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let directory = registered_student_directory("pw1");
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = login("a@x.com", "wrongpw", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Unauthorized(ref m)) if m == "Invalid password or id")
    );

    // A minimally different password must also fail
    let result = login("a@x.com", "pw2", &deps).await;
    assert!(matches!(result, Err(AuthError::Unauthorized(_))));
}

#[tokio::test]
async fn test_login_rejects_account_that_never_registered() {
    // Email verified but signup never completed: no credential to check
    let mut student = unverified_student("123456789");
    student.cis_id = Some("a@x.com".to_string());
    let directory = MockStudentDirectory::new().with_student(student);
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = login("a@x.com", "pw1", &deps).await;
    assert!(
        matches!(result, Err(AuthError::Unauthorized(ref m)) if m == "Invalid password or id")
    );
}

#[tokio::test]
async fn test_login_unknown_email_returns_not_found() {
    let directory = MockStudentDirectory::new();
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = login("nobody@x.com", "pw1", &deps).await;
    assert!(matches!(result, Err(AuthError::NotFound(ref m)) if m == "Student not found"));
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let directory = MockStudentDirectory::new();
    let mailer = MockMailDispatcher::new();
    let deps = test_deps(&directory, &mailer);

    let result = login("", "pw1", &deps).await;
    assert!(matches!(result, Err(AuthError::Validation(ref m)) if m == "Email is required"));

    let result = login("a@x.com", "", &deps).await;
    assert!(matches!(result, Err(AuthError::Validation(ref m)) if m == "Password is required"));
}
