//! Authentication state and its on-disk persistence.

use std::fs::{self, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Credentials and role returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: String,
    pub token: String,
}

impl Session {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn login(self, session: Session) -> Self {
        AuthState::Authenticated(session)
    }

    pub fn logout(self) -> Self {
        AuthState::Unauthenticated
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

/// Keeps the current [`AuthState`] in a JSON file between invocations.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file means nobody is logged in. An unreadable one is logged
    /// and treated the same way.
    pub fn load(&self) -> Result<AuthState> {
        if !self.path.exists() {
            return Ok(AuthState::Unauthenticated);
        }
        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(AuthState::Authenticated(session)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring corrupt session file"
                );
                Ok(AuthState::Unauthenticated)
            }
        }
    }

    pub fn save(&self, state: &AuthState) -> Result<()> {
        match state {
            AuthState::Authenticated(session) => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                write_private(&self.path, &serde_json::to_string_pretty(session)?)?;
                tracing::debug!(path = %self.path.display(), "session saved");
            }
            AuthState::Unauthenticated => {
                if self.path.exists() {
                    fs::remove_file(&self.path)?;
                    tracing::debug!(path = %self.path.display(), "session removed");
                }
            }
        }
        Ok(())
    }
}

/// The session holds a bearer token, so on unix only the owner may read it.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path)?;
    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}
