use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

/// Whether someone is signed in. Owned by one visitor and passed to every
/// operation that is gated on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) -> Option<User> {
        self.user.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl AuthForm {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn sign_up(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            mode: AuthMode::SignUp,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// First failing rule only; sign-up checks the confirmation before the length.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() {
            return Err(AuthError::MissingEmail);
        }

        if self.mode == AuthMode::SignUp {
            if self.password != self.confirm_password {
                return Err(AuthError::PasswordMismatch);
            }
            if self.password.chars().count() < MIN_PASSWORD_LEN {
                return Err(AuthError::PasswordTooShort {
                    min: MIN_PASSWORD_LEN,
                });
            }
        }

        Ok(())
    }

    /// Toggle between login and sign-up, clearing every field.
    pub fn switch_mode(&mut self) {
        let mode = match self.mode {
            AuthMode::Login => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::Login,
        };
        *self = Self {
            mode,
            ..Self::default()
        };
    }

    /// The user a successful attempt signs in. A blank name becomes "User".
    pub fn into_user(self) -> User {
        let name = self.name.trim();
        User {
            name: if name.is_empty() {
                "User".to_string()
            } else {
                name.to_string()
            },
            email: self.email.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("L'adresse email est requise")]
    MissingEmail,
    #[error("Les mots de passe ne correspondent pas")]
    PasswordMismatch,
    #[error("Le mot de passe doit contenir au moins {min} caractères")]
    PasswordTooShort { min: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_mode_needs_only_an_email() {
        assert_eq!(AuthForm::login("awa@example.ci", "").validate(), Ok(()));
        assert_eq!(
            AuthForm::login("   ", "secret").validate(),
            Err(AuthError::MissingEmail)
        );
    }

    #[test]
    fn sign_up_reports_mismatch_before_length() {
        let form = AuthForm::sign_up("Awa", "awa@example.ci", "short", "different");
        assert_eq!(form.validate(), Err(AuthError::PasswordMismatch));
        assert_eq!(
            AuthError::PasswordMismatch.to_string(),
            "Les mots de passe ne correspondent pas"
        );
    }

    #[test]
    fn sign_up_requires_eight_characters() {
        let form = AuthForm::sign_up("Awa", "awa@example.ci", "1234567", "1234567");
        let error = form.validate().expect_err("too short");
        assert_eq!(
            error.to_string(),
            "Le mot de passe doit contenir au moins 8 caractères"
        );

        let form = AuthForm::sign_up("Awa", "awa@example.ci", "12345678", "12345678");
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn switching_mode_clears_the_form() {
        let mut form = AuthForm::login("awa@example.ci", "secret");
        form.switch_mode();
        assert_eq!(form.mode, AuthMode::SignUp);
        assert!(form.email.is_empty() && form.password.is_empty());
        form.switch_mode();
        assert_eq!(form.mode, AuthMode::Login);
    }

    #[test]
    fn blank_name_defaults_to_user() {
        let user = AuthForm::login("awa@example.ci", "x").into_user();
        assert_eq!(user.name, "User");

        let mut form = AuthForm::sign_up(" Awa ", "awa@example.ci", "p", "p");
        form.mode = AuthMode::Login;
        assert_eq!(form.into_user().name, "Awa");
    }

    #[test]
    fn session_sign_in_and_out() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());
        session.sign_in(User {
            name: "Awa".to_string(),
            email: "awa@example.ci".to_string(),
        });
        assert!(session.is_authenticated());
        assert_eq!(session.sign_out().map(|user| user.name), Some("Awa".to_string()));
        assert!(session.user().is_none());
    }
}
