use thiserror::Error;

/// Message shown for any rejected login
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("{}", LOGIN_FAILED_MESSAGE)]
    InvalidCredentials,

    #[error("Credentials required: pass --user and --password or set AIRWATCH_USER / AIRWATCH_PASSWORD")]
    MissingCredentials,
}

/// A signed-in dashboard user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

/// Decides who may open the dashboard
pub trait AccessGate {
    fn login(&self, username: &str, password: &str) -> Result<Session, AccessError>;
}

/// Demo gate accepting a single hardcoded credential pair.
///
/// NOT production authentication: credentials are compiled in and compared
/// in plain text. Replace this with a real `AccessGate` before exposing the
/// dashboard to anyone.
#[derive(Debug, Clone)]
pub struct StubAccessGate {
    username: &'static str,
    password: &'static str,
}

impl Default for StubAccessGate {
    fn default() -> Self {
        Self {
            username: "Admin",
            password: "Admin",
        }
    }
}

impl StubAccessGate {
    pub fn new() -> Self {
        tracing::warn!("using stub access gate; this is not production authentication");
        Self::default()
    }
}

impl AccessGate for StubAccessGate {
    fn login(&self, username: &str, password: &str) -> Result<Session, AccessError> {
        if username == self.username && password == self.password {
            tracing::debug!(username, "login accepted");
            Ok(Session {
                username: username.to_string(),
            })
        } else {
            tracing::debug!(username, "login rejected");
            Err(AccessError::InvalidCredentials)
        }
    }
}

/// Check optional CLI credentials against a gate
pub fn authenticate(
    gate: &dyn AccessGate,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Session, AccessError> {
    match (username, password) {
        (Some(user), Some(pass)) => gate.login(user, pass),
        _ => Err(AccessError::MissingCredentials),
    }
}
