//! Edge cache control for a site.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::{ApiError, InvalidHttpRequestError};
use crate::rest::{build_path, de, ResourceClient, SiteRef};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EdgeCacheStatus {
    #[serde(default, deserialize_with = "de::optional_int")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub status_name: Option<String>,
    /// Unix timestamp until which DDoS defensive mode is active; `0` when off.
    #[serde(default, deserialize_with = "de::optional_int")]
    pub ddos_until: Option<i64>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Client for the edge cache endpoints.
#[derive(Clone, Debug)]
pub struct EdgeCacheClient {
    client: ResourceClient,
}

impl EdgeCacheClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Returns the edge cache status of a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_status(
        &self,
        site: impl Into<SiteRef>,
    ) -> Result<EdgeCacheStatus, ApiError> {
        let path = build_path("/edge-cache/{site}", &[("site", site.into().identifier())]);
        self.client.fetch(self.client.get(path)).await
    }

    /// Turns the edge cache on.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn turn_on(&self, site: impl Into<SiteRef>) -> Result<Value, ApiError> {
        self.action(site.into(), "on").await
    }

    /// Turns the edge cache off.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn turn_off(&self, site: impl Into<SiteRef>) -> Result<Value, ApiError> {
        self.action(site.into(), "off").await
    }

    /// Purges every cached object of a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn purge(&self, site: impl Into<SiteRef>) -> Result<Value, ApiError> {
        self.action(site.into(), "purge").await
    }

    async fn action(&self, site: SiteRef, action: &str) -> Result<Value, ApiError> {
        let path = build_path(
            "/edge-cache/{site}/{action}",
            &[("site", site.identifier()), ("action", action.to_string())],
        );
        self.client.fetch(self.client.post(path)).await
    }

    /// Sets the DDoS defensive mode expiry to a unix timestamp. `0` turns
    /// defensive mode off.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set_defensive_mode(
        &self,
        site: impl Into<SiteRef>,
        until: i64,
    ) -> Result<Value, ApiError> {
        let path = build_path(
            "/edge-cache/{site}/ddos_until",
            &[("site", site.into().identifier())],
        );
        let request = self.client.post(path).form_field("timestamp", until);
        self.client.fetch(request).await
    }

    /// Enables DDoS defensive mode for the next `minutes` minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] when `minutes` is zero, or any
    /// pipeline error.
    pub async fn enable_defensive_mode(
        &self,
        site: impl Into<SiteRef>,
        minutes: u32,
    ) -> Result<Value, ApiError> {
        if minutes == 0 {
            return Err(InvalidHttpRequestError::InvalidArgument {
                argument: "minutes".to_string(),
                reason: "duration must be a positive number of minutes".to_string(),
            }
            .into());
        }
        let until = Utc::now().timestamp() + i64::from(minutes) * 60;
        self.set_defensive_mode(site, until).await
    }

    /// Turns DDoS defensive mode off.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn disable_defensive_mode(
        &self,
        site: impl Into<SiteRef>,
    ) -> Result<Value, ApiError> {
        self.set_defensive_mode(site, 0).await
    }
}
