use super::domain::{AuthError, AuthForm, User};
use std::time::Duration;
use tracing::{info, warn};

/// Stand-in for a credential service: validation, a pause, then success.
#[derive(Debug, Clone, Copy)]
pub struct AuthService {
    delay: Duration,
}

impl AuthService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Never consults an account store. Any valid form signs in after the delay.
    pub async fn login(&self, form: AuthForm) -> Result<User, AuthError> {
        if let Err(error) = form.validate() {
            warn!(mode = ?form.mode, %error, "auth form rejected");
            return Err(error);
        }

        tokio::time::sleep(self.delay).await;
        let user = form.into_user();
        info!(name = %user.name, "mock login succeeded");
        Ok(user)
    }
}
