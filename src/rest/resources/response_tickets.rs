//! Response tickets: handles for long-running checks such as migration
//! preflights.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::{ApiError, JobId, PollRoute};
use crate::rest::{build_path, de, Job, ResourceClient};

/// A ticket summary.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ResponseTicket {
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Client for the response ticket endpoints.
#[derive(Clone, Debug)]
pub struct ResponseTicketsClient {
    client: ResourceClient,
}

impl ResponseTicketsClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Returns the summary of a ticket.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_summary(&self, ticket_id: u64) -> Result<ResponseTicket, ApiError> {
        let path = build_path("/response-ticket/get/summary/{ticket}", &[("ticket", ticket_id)]);
        self.client.fetch(self.client.get(path)).await
    }

    /// Returns everything attached to a ticket, which may include large
    /// payloads.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_full(&self, ticket_id: u64) -> Result<Value, ApiError> {
        let path = build_path("/response-ticket/get/full/{ticket}", &[("ticket", ticket_id)]);
        self.client.fetch(self.client.get(path)).await
    }

    /// Returns a job handle that polls the ticket summary.
    #[must_use]
    pub fn watch(&self, ticket_id: u64) -> Job {
        Job::attach(
            self.client.clone(),
            JobId::from(ticket_id),
            PollRoute::response_ticket(),
        )
    }
}
