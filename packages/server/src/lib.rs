// Club Platform - API Core
//
// This crate provides the backend API for student authentication on the
// club-management platform: enrollment verification, email ownership
// verification, password signup, and session issuance.
//
// Business logic lives in domains/*/actions; external collaborators are
// abstracted behind kernel traits.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
