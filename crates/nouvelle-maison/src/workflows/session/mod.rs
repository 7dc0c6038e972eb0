//! Mock authentication: form validation, the simulated login, and the session.

pub mod domain;
mod service;

pub use domain::{AuthError, AuthForm, AuthMode, Session, User, MIN_PASSWORD_LEN};
pub use service::AuthService;
