//! Credential capability used when a query asks for protected collections.

use crate::types::Credentials;

/// Answer of a credential prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialPrompt {
    /// One login per protected collection.
    Provided(Vec<Credentials>),
    /// The user backed out; nothing is sent.
    Cancelled,
}

/// Supplies logins for protected collections (e.g. the clinical banks).
///
/// The terminal front end prompts interactively; headless callers can use
/// [`StaticCredentials`]. `credentials` may block: the client calls it on
/// tokio's blocking pool, never on an async worker.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> CredentialPrompt;
}

/// Fixed set of logins, for scripts and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
    credentials: Vec<Credentials>,
}

impl StaticCredentials {
    pub fn new(credentials: Vec<Credentials>) -> Self {
        Self { credentials }
    }

    pub fn single(path: &str, user_id: &str, password: &str) -> Self {
        Self::new(vec![Credentials::new(path, user_id, password)])
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> CredentialPrompt {
        if self.credentials.is_empty() {
            CredentialPrompt::Cancelled
        } else {
            CredentialPrompt::Provided(self.credentials.clone())
        }
    }
}

impl<F> CredentialProvider for F
where
    F: Fn() -> CredentialPrompt + Send + Sync,
{
    fn credentials(&self) -> CredentialPrompt {
        self()
    }
}
