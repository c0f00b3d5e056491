//! Credential verification

/// Username accepted by [`DemoCredentials`]
pub const DEMO_USERNAME: &str = "admin";

/// Password accepted by [`DemoCredentials`]
pub const DEMO_PASSWORD: &str = "password";

/// Checks a username/password pair
pub trait CredentialCheck {
    fn verify(&self, username: &str, password: &str) -> bool;
}

impl<F> CredentialCheck for F
where
    F: Fn(&str, &str) -> bool,
{
    fn verify(&self, username: &str, password: &str) -> bool {
        self(username, password)
    }
}

/// Fixed demo account
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoCredentials;

impl CredentialCheck for DemoCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == DEMO_USERNAME && password == DEMO_PASSWORD
    }
}
