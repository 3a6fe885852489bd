//! Site migrations from a remote host.
//!
//! A migration is created against a destination site, then checked with a
//! preflight and marked ready. Both checks answer with a response ticket,
//! returned here as a [`Job`] polled on the ticket summary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::{ApiError, JobPolling, PollRoute};
use crate::rest::{build_path, de, Job, ResourceClient, SiteRef};

use super::{form_of, require};

/// Parameters for starting a migration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct NewMigration {
    pub remote_host: String,
    pub remote_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_domain: Option<String>,
    /// Private key content used to reach the remote host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_id_pass: Option<String>,
}

impl NewMigration {
    #[must_use]
    pub fn new(remote_host: impl Into<String>, remote_user: impl Into<String>) -> Self {
        Self {
            remote_host: remote_host.into(),
            remote_user: remote_user.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn remote_pass(mut self, password: impl Into<String>) -> Self {
        self.remote_pass = Some(password.into());
        self
    }

    #[must_use]
    pub fn remote_domain(mut self, domain: impl Into<String>) -> Self {
        self.remote_domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn ssh_id(mut self, key: impl Into<String>, passphrase: Option<String>) -> Self {
        self.ssh_id = Some(key.into());
        self.ssh_id_pass = passphrase;
        self
    }
}

/// The response to a migration creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationCreation {
    #[serde(deserialize_with = "de::string_or_number")]
    pub migration_id: String,
    /// Public key to install on the remote host, when one was generated.
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub ssh_id_pub: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Migration {
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Client for the migration endpoints.
#[derive(Clone, Debug)]
pub struct MigrationsClient {
    client: ResourceClient,
}

impl MigrationsClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Starts a migration into the destination site.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] when the remote host or user
    /// is empty, or any pipeline error.
    pub async fn create(
        &self,
        destination: impl Into<SiteRef>,
        migration: &NewMigration,
    ) -> Result<MigrationCreation, ApiError> {
        require("remote_host", &migration.remote_host)?;
        require("remote_user", &migration.remote_user)?;
        let path = build_path(
            "/migration/create/{site}",
            &[("site", destination.into().identifier())],
        );
        let request = self.client.post(path).form_value(&form_of(migration)?);
        let created: MigrationCreation = self.client.fetch(request).await?;
        tracing::info!(migration_id = %created.migration_id, "Migration created");
        Ok(created)
    }

    /// Fetches a migration.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get(&self, migration_id: &str) -> Result<Migration, ApiError> {
        let path = self.migration_path("get", migration_id)?;
        self.client.fetch(self.client.get(path)).await
    }

    /// Updates migration settings. Field names use underscores and are sent
    /// with dashes (`remote_pass` becomes `remote-pass`).
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update(
        &self,
        migration_id: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<Value, ApiError> {
        let path = self.migration_path("update", migration_id)?;
        let request = fields
            .iter()
            .fold(self.client.post(path), |request, (key, value)| {
                request.form_field(key.replace('_', "-"), value)
            });
        self.client.fetch(request).await
    }

    /// Runs the preflight checks. The job polls the returned response ticket.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn run_preflight(&self, migration_id: &str) -> Result<Job, ApiError> {
        self.ticket("preflight", migration_id).await
    }

    /// Marks the migration ready to run. The job polls the returned response
    /// ticket.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set_ready(&self, migration_id: &str) -> Result<Job, ApiError> {
        self.ticket("ready", migration_id).await
    }

    async fn ticket(&self, action: &str, migration_id: &str) -> Result<Job, ApiError> {
        let path = self.migration_path(action, migration_id)?;
        let polling = JobPolling::Pollable(PollRoute::response_ticket());
        self.client.submit_with(self.client.get(path), polling).await
    }

    fn migration_path(&self, action: &str, migration_id: &str) -> Result<String, ApiError> {
        require("migration_id", migration_id)?;
        Ok(build_path(
            "/migration/{action}/{migration}",
            &[("action", action), ("migration", migration_id)],
        ))
    }
}
