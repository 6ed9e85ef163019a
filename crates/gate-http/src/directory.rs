//! `DirectoryStore` over the backend's user and log endpoints.

use async_trait::async_trait;
use gate_core::{
    AccessLogEntry, DirectoryStore, PhotoUpload, Registration, StoreError, UserId, UserRecord,
};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::GateHttpClient;
use crate::types::{LogPayload, RegisterResponse, UserPayload};

const USERS_PATH: &str = "/api/users";
const REGISTER_PATH: &str = "/api/register";
const LOGS_PATH: &str = "/api/logs";

/// Remote user directory and access log.
pub struct HttpDirectoryStore {
    api: GateHttpClient,
}

impl HttpDirectoryStore {
    /// Wrap a backend client.
    pub fn new(api: GateHttpClient) -> Self {
        Self { api }
    }

    /// Underlying client, for asset URLs.
    pub fn client(&self) -> &GateHttpClient {
        &self.api
    }
}

#[async_trait]
impl DirectoryStore for HttpDirectoryStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        debug!("GET {}", USERS_PATH);
        let response = self
            .api
            .http()
            .get(self.api.url(USERS_PATH))
            .send()
            .await
            .map_err(|e| self.api.send_error(e))?;
        let response = self.api.ensure_success(response).await?;
        let (_, users): (_, Vec<UserPayload>) = self.api.read_json(response).await?;
        Ok(users.into_iter().map(UserRecord::from).collect())
    }

    async fn register_user(
        &self,
        name: &str,
        photo: PhotoUpload,
    ) -> Result<Registration, StoreError> {
        let part = Part::bytes(photo.bytes.to_vec())
            .file_name(photo.file_name.clone())
            .mime_str("image/jpeg")
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let form = Form::new().text("name", name.to_owned()).part("photo", part);

        debug!(name, file = %photo.file_name, "POST {}", REGISTER_PATH);
        let response = self
            .api
            .http()
            .post(self.api.url(REGISTER_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.api.send_error(e))?;
        let response = self.api.ensure_success(response).await?;
        let (_, body): (_, RegisterResponse) = self.api.read_json(response).await?;
        Ok(body.into())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        let url = self.api.url(&format!("{}/{}", USERS_PATH, id));
        debug!(id = %id, "DELETE {}", url);
        let response = self
            .api
            .http()
            .delete(url)
            .send()
            .await
            .map_err(|e| self.api.send_error(e))?;
        self.api.ensure_success(response).await?;
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<AccessLogEntry>, StoreError> {
        debug!("GET {}", LOGS_PATH);
        let response = self
            .api
            .http()
            .get(self.api.url(LOGS_PATH))
            .send()
            .await
            .map_err(|e| self.api.send_error(e))?;
        let response = self.api.ensure_success(response).await?;
        let (_, logs): (_, Vec<LogPayload>) = self.api.read_json(response).await?;
        Ok(logs.into_iter().map(AccessLogEntry::from).collect())
    }
}
