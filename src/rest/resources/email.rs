//! Outbound email controls.

use serde_json::Value;

use crate::clients::ApiError;
use crate::rest::ResourceClient;

use super::client_path;

/// Client for the email endpoints.
#[derive(Clone, Debug)]
pub struct EmailClient {
    client: ResourceClient,
}

impl EmailClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Lists sites whose outbound SMTP (SASL) mail is blocked.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_blocked_domains(&self) -> Result<Vec<Value>, ApiError> {
        let path = client_path(&self.client, "/email-block/{client}/list/sasl_block");
        self.client.fetch_all(self.client.get(path)).await
    }
}
