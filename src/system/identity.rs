use tracing::warn;

use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

impl Session {
    /// Name shown in the header: display name, else email.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.email.as_deref())
            .unwrap_or("Signed in")
    }
}

pub type StateCallback = Box<dyn FnMut(Option<Session>)>;

/// External sign-in service. Only `Session` and the error text cross this line.
pub trait IdentityProvider {
    fn initialize(&mut self);
    fn sign_in_with_email_password(&mut self, email: &str, password: &str)
        -> Result<Session, AuthError>;
    fn sign_in_with_popup(&mut self) -> Result<Session, AuthError>;
    fn sign_out(&mut self) -> Result<(), AuthError>;
    fn on_state_changed(&mut self, callback: StateCallback);
}

const NOT_INITIALIZED: &str = "identity provider not initialized";

/// Provider used when no identity service is configured. Every call fails
/// and subscribers only ever see "signed out".
#[derive(Debug, Default)]
pub struct DisabledIdentity;

impl IdentityProvider for DisabledIdentity {
    fn initialize(&mut self) {
        warn!("identity provider not configured, sign-in disabled");
    }

    fn sign_in_with_email_password(
        &mut self,
        _email: &str,
        _password: &str,
    ) -> Result<Session, AuthError> {
        Err(AuthError::new(NOT_INITIALIZED))
    }

    fn sign_in_with_popup(&mut self) -> Result<Session, AuthError> {
        Err(AuthError::new(NOT_INITIALIZED))
    }

    fn sign_out(&mut self) -> Result<(), AuthError> {
        Err(AuthError::new(NOT_INITIALIZED))
    }

    fn on_state_changed(&mut self, mut callback: StateCallback) {
        callback(None);
    }
}
