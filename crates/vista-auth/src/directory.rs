use serde::{Deserialize, Serialize};
use tracing::info;

use vista_core::models::session::{Role, Session, User};

use crate::error::AuthError;

/// What a login form submits.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// The portal the user is signing in to.
    pub role: Role,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Turns credentials into a session. Real identity providers plug in here.
pub trait Authenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

/// One account in a [`UserDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub user: User,
    /// Required for admins. Users without one sign in by name alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A fixed set of accounts, usually read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserDirectory {
    entries: Vec<DirectoryEntry>,
}

impl UserDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// One admin (no password until one is configured) and two users.
    pub fn starter() -> Self {
        Self::new(vec![
            DirectoryEntry {
                user: User {
                    id: "1".to_string(),
                    username: "admin".to_string(),
                    email: "admin@company.com".to_string(),
                    role: Role::Admin,
                    accessible_reports: vec![],
                },
                password: None,
            },
            DirectoryEntry {
                user: User {
                    id: "user1".to_string(),
                    username: "user1".to_string(),
                    email: "user1@company.com".to_string(),
                    role: Role::User,
                    accessible_reports: vec!["report1".to_string(), "report2".to_string()],
                },
                password: None,
            },
            DirectoryEntry {
                user: User {
                    id: "user2".to_string(),
                    username: "user2".to_string(),
                    email: "user2@company.com".to_string(),
                    role: Role::User,
                    accessible_reports: vec!["report1".to_string(), "report3".to_string()],
                },
                password: None,
            },
        ])
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn find(&self, username: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.user.username == username)
    }

    /// Set or replace the password for `username`. Returns false if unknown.
    pub fn set_password(&mut self, username: &str, password: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.user.username == username) {
            Some(entry) => {
                entry.password = Some(password.into());
                true
            }
            None => false,
        }
    }
}

impl Authenticator for UserDirectory {
    fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        info!(username = %credentials.username, role = %credentials.role, "login attempt");

        let entry = self
            .find(&credentials.username)
            .filter(|e| e.user.role == credentials.role)
            .ok_or_else(|| AuthError::AuthFailed("unknown user".to_string()))?;

        match (&entry.password, entry.user.role) {
            (Some(expected), _) if *expected != credentials.password => {
                return Err(AuthError::AuthFailed("wrong password".to_string()));
            }
            (None, Role::Admin) => {
                return Err(AuthError::AuthFailed(
                    "admin account has no password configured".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Session::new(entry.user.clone()))
    }
}
