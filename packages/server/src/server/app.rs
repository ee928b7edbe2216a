//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use mailer::{MailerOptions, MailerService};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::{MailerAdapter, PgStudentDirectory, ServerDeps};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    health_handler, login_handler, probe_enrollment_handler, profile_handler,
    send_verification_mail_handler, signup_handler, verify_email_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, config: &Config) -> Router {
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt_secret,
        config.jwt_issuer.clone(),
        chrono::Duration::hours(config.session_token_ttl_hours),
        chrono::Duration::minutes(config.verification_token_ttl_minutes),
    ));

    let mailer_service = Arc::new(MailerService::new(MailerOptions {
        api_url: config.mail_api_url.clone(),
        api_key: config.mail_api_key.clone(),
        from_address: config.mail_from_address.clone(),
    }));

    let deps = Arc::new(ServerDeps::new(
        Arc::new(PgStudentDirectory::new(pool.clone())),
        Arc::new(MailerAdapter::new(mailer_service)),
        jwt_service.clone(),
        config.email_postback_url.clone(),
    ));

    let state = AppState {
        db_pool: pool,
        deps,
        jwt_service: jwt_service.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let jwt_for_middleware = jwt_service.clone();

    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/student", post(probe_enrollment_handler))
        .route(
            "/auth/student/sendVerificationMail",
            post(send_verification_mail_handler),
        )
        .route("/auth/studentEmailVerify/", get(verify_email_handler))
        .route("/auth/student/signup", post(signup_handler))
        .route("/auth/student/login", post(login_handler))
        .route("/auth/profile", get(profile_handler))
        .layer(middleware::from_fn(move |request, next| {
            jwt_auth_middleware(jwt_for_middleware.clone(), request, next)
        }))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
