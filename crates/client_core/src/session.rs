use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use crate::error::{ClientError, ClientResult};

/// Opaque bearer token returned by the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty token so a stored credential is never blank.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// In-memory holder of the application's single credential.
///
/// Clones share the same slot. The value is only ever replaced whole, and the
/// lock is never held across an await point.
#[derive(Clone, Default)]
pub struct SessionStore {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_credential(&self, credential: Option<Credential>) {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = credential;
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Credential for a protected call.
    pub fn require_credential(&self) -> ClientResult<Credential> {
        self.credential().ok_or(ClientError::MissingCredential)
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
