//! Client-level key/value storage.

use serde_json::Value;

use crate::clients::ApiError;
use crate::rest::{build_path, ResourceClient};

use super::require;

/// Client for the client meta endpoints.
#[derive(Clone, Debug)]
pub struct ClientMetaClient {
    client: ResourceClient,
}

impl ClientMetaClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    fn key_path(&self, key: &str, action: &str) -> Result<String, ApiError> {
        require("key", key)?;
        Ok(build_path(
            "/client-meta/{client}/{key}/{action}",
            &[("client", self.client.client_id()), ("key", key), ("action", action)],
        ))
    }

    /// Reads a value.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get(&self, key: &str) -> Result<Value, ApiError> {
        let path = self.key_path(key, "get")?;
        self.client.fetch(self.client.get(path)).await
    }

    /// Writes a value.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update(&self, key: &str, value: impl ToString + Send) -> Result<Value, ApiError> {
        let path = self.key_path(key, "update")?;
        self.client
            .fetch(self.client.post(path).form_field("value", value))
            .await
    }

    /// Deletes a value.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn remove(&self, key: &str) -> Result<Value, ApiError> {
        let path = self.key_path(key, "remove")?;
        self.client.fetch(self.client.get(path)).await
    }
}
