//! Server pool information.

use serde_json::Value;

use crate::clients::ApiError;
use crate::rest::ResourceClient;

use super::client_path;

/// Client for the server information endpoints.
#[derive(Clone, Debug)]
pub struct ServersClient {
    client: ResourceClient,
}

impl ServersClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Lists datacenter codes (e.g. `bur`, `dca`) with available servers.
    /// Any of them can be passed as a site's `geo_affinity`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_available_datacenters(&self) -> Result<Vec<String>, ApiError> {
        let path = client_path(&self.client, "/get-available-datacenters/{client}");
        self.client.fetch_all(self.client.get(path)).await
    }

    /// Lists the supported PHP versions.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_php_versions(&self) -> Result<Vec<String>, ApiError> {
        let path = client_path(&self.client, "/get-php-versions/{client}");
        self.client.fetch_all(self.client.get(path)).await
    }

    /// Returns the supported PHP versions with deprecation status and the
    /// platform default.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_php_versions_verbose(&self) -> Result<Value, ApiError> {
        let path = client_path(&self.client, "/get-php-versions/{client}/verbose");
        self.client.fetch(self.client.get(path)).await
    }
}
