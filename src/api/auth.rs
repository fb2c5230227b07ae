//! Bearer-token slot and the logged-in admin session.
//!
//! The token is process-wide: every [`crate::api::http::HttpTransport`]
//! built from the same [`TokenSlot`] sees updates immediately. It is
//! persisted to a small file so it survives restarts.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiRequest, Transport};

/// Shared, optionally file-backed bearer token.
#[derive(Clone, Debug, Default)]
pub struct TokenSlot {
    token: Arc<RwLock<Option<String>>>,
    path: Option<PathBuf>,
}

impl TokenSlot {
    /// In-memory slot holding `token`.
    pub fn new(token: Option<String>) -> Self {
        Self { token: Arc::new(RwLock::new(token)), path: None }
    }

    /// Slot persisted at `path`, seeded from the file when it exists.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = std::fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        debug!(path = %path.display(), present = token.is_some(), "loaded token slot");
        Self { token: Arc::new(RwLock::new(token)), path: Some(path) }
    }

    pub fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Store a new token and write it to the backing file, if any.
    pub fn set(&self, token: impl Into<String>) -> std::io::Result<()> {
        let token = token.into();
        if let Some(path) = &self.path {
            std::fs::write(path, &token)?;
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        Ok(())
    }

    /// Forget the token and delete the backing file.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(path) = &self.path
            && path.exists()
            && let Err(e) = std::fs::remove_file(path)
        {
            warn!(path = %path.display(), error = %e, "could not remove token file");
        }
    }
}

/// The logged-in admin: token plus the profile fetched with it.
pub struct AuthSession {
    transport: Arc<dyn Transport>,
    token: TokenSlot,
    user: Mutex<Option<Value>>,
}

impl AuthSession {
    pub fn new(transport: Arc<dyn Transport>, token: TokenSlot) -> Self {
        Self { transport, token, user: Mutex::new(None) }
    }

    pub fn token(&self) -> &TokenSlot {
        &self.token
    }

    pub fn user(&self) -> Option<Value> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Name (or email) of the signed-in admin.
    ///
    /// `/admins/` answers with the usual envelope, so the profile is looked
    /// up in `data` (an object or the first entry of a list) before the top
    /// level of the body.
    pub fn display_name(&self) -> Option<String> {
        let user = self.user()?;
        let data = match user.get("data") {
            Some(Value::Array(list)) => list.first(),
            other => other,
        };
        [data, Some(&user)].into_iter().flatten().find_map(|v| {
            v.get("name")
                .or_else(|| v.get("email"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
    }

    pub fn set_token(&self, token: impl Into<String>) -> std::io::Result<()> {
        self.token.set(token)
    }

    /// Log out: drop the token and the cached profile.
    pub fn remove_token(&self) {
        self.token.clear();
        *self.user.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Fetch the profile for the current token. Any failure logs the admin out.
    pub async fn fetch_user(&self) {
        if self.token.get().is_none() {
            return;
        }
        match self.transport.send(ApiRequest::get("/admins/")).await {
            Ok(resp) if resp.is_success() => {
                *self.user.lock().unwrap_or_else(PoisonError::into_inner) = resp.body;
            }
            Ok(resp) => {
                warn!(status = resp.status, "token rejected; logging out");
                self.remove_token();
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch user; logging out");
                self.remove_token();
            }
        }
    }
}
