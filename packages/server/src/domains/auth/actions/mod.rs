// Auth workflow actions - one file per operation
//
// Actions are plain async functions over ServerDeps. Each validates its
// input, enforces the state-machine preconditions, and maps collaborator
// failures into AuthError.

pub mod complete_signup;
pub mod confirm_verification;
pub mod login;
pub mod probe_enrollment;
pub mod send_verification_link;

pub use complete_signup::complete_signup;
pub use confirm_verification::confirm_verification;
pub use login::login;
pub use probe_enrollment::probe_enrollment;
pub use send_verification_link::send_verification_link;
