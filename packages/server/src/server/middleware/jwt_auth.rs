use crate::domains::auth::{JwtService, TokenKind};
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

/// Authenticated student information from a session JWT
#[derive(Clone, Debug)]
pub struct AuthStudent {
    pub enrollment_number: String,
}

/// JWT authentication middleware
///
/// Extracts the JWT from the Authorization header, verifies it, and adds
/// AuthStudent to request extensions. If no token or an invalid token is
/// present, the request continues without AuthStudent (public access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_student = extract_auth_student(&request, &jwt_service);

    if let Some(student) = auth_student {
        debug!("Authenticated student: {}", student.enrollment_number);
        request.extensions_mut().insert(student);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the session JWT from a request
fn extract_auth_student(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthStudent> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token; verification-kind tokens never grant a session
    let claims = jwt_service.verify_token(token).ok()?;
    if claims.kind != TokenKind::Session {
        return None;
    }

    Some(AuthStudent {
        enrollment_number: claims.sub,
    })
}
