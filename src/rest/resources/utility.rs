//! Diagnostic endpoints.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::clients::ApiError;
use crate::rest::{build_path, ResourceClient};

/// Client for the utility endpoints.
#[derive(Clone, Debug)]
pub struct UtilityClient {
    client: ResourceClient,
}

impl UtilityClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Asks the server to answer with `status` and `message`.
    ///
    /// Useful for checking how an application handles each error class.
    /// With `post_data`, the request is a form POST; otherwise a GET.
    ///
    /// # Errors
    ///
    /// Returns the classified error for non-2xx statuses.
    pub async fn test_status(
        &self,
        status: u16,
        message: &str,
        post_data: Option<&BTreeMap<String, String>>,
    ) -> Result<Value, ApiError> {
        let path = build_path(
            "/test-status/{status}/{message}",
            &[("status", status.to_string()), ("message", message.to_string())],
        );
        let request = match post_data {
            Some(fields) => fields
                .iter()
                .fold(self.client.post(path), |request, (key, value)| {
                    request.form_field(key.as_str(), value)
                }),
            None => self.client.get(path),
        };
        self.client.fetch(request).await
    }
}
