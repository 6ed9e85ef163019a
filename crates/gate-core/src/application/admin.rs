//! # Admin Console
//!
//! Directory management behind the admin mode switch.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::GateController;
use crate::domain::{AccessLogEntry, GateError, PhotoUpload, Registration, UserId, UserRecord};
use crate::ports::{DirectoryStore, StoreError};

/// Admin operation errors.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Gate is not in admin mode.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Required input was blank.
    #[error("missing {0}")]
    MissingInput(&'static str),

    /// Directory backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Users and recent log entries, fetched together.
#[derive(Clone, Debug, Default)]
pub struct AdminSnapshot {
    /// Registered users.
    pub users: Vec<UserRecord>,
    /// Newest first.
    pub logs: Vec<AccessLogEntry>,
}

/// Admin console bound to a gate.
pub struct AdminConsole {
    gate: Arc<GateController>,
    store: Arc<dyn DirectoryStore>,
}

impl AdminConsole {
    /// Create a console.
    pub fn new(gate: Arc<GateController>, store: Arc<dyn DirectoryStore>) -> Self {
        Self { gate, store }
    }

    /// Registered users.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, AdminError> {
        self.gate.require_admin("list_users")?;
        Ok(self.store.list_users().await?)
    }

    /// Register a user with a reference photo.
    pub async fn register_user(
        &self,
        name: &str,
        photo: PhotoUpload,
    ) -> Result<Registration, AdminError> {
        self.gate.require_admin("register_user")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AdminError::MissingInput("name"));
        }
        if photo.bytes.is_empty() {
            return Err(AdminError::MissingInput("photo"));
        }

        let registration = self.store.register_user(name, photo).await?;
        info!(name, qr = ?registration.qr_code, "User registered");
        Ok(registration)
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AdminError> {
        self.gate.require_admin("delete_user")?;
        self.store.delete_user(id).await?;
        info!(id = %id, "User deleted");
        Ok(())
    }

    /// Recent access log, newest first.
    pub async fn list_logs(&self) -> Result<Vec<AccessLogEntry>, AdminError> {
        self.gate.require_admin("list_logs")?;
        Ok(self.store.list_logs().await?)
    }

    /// Reload users and logs.
    pub async fn refresh(&self) -> Result<AdminSnapshot, AdminError> {
        let (users, logs) = tokio::try_join!(self.list_users(), self.list_logs())?;
        Ok(AdminSnapshot { users, logs })
    }
}
