//! Backup resource implementation.
//!
//! On-demand backup creation and deletion are fire-and-forget: the platform
//! returns an `atomic_backup_request_id` but exposes no status for it, so the
//! returned [`Job`] refuses to poll.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::{ApiError, InvalidHttpRequestError, JobPolling};
use crate::rest::{build_path, de, Job, ResourceClient, SiteRef};

use super::require;

/// The kind of a stored backup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BackupKind {
    #[serde(rename = "fs")]
    Filesystem,
    #[serde(rename = "db")]
    Database,
    #[serde(rename = "ondemand")]
    OnDemand,
    #[serde(rename = "ondemand-fs")]
    OnDemandFilesystem,
    #[serde(rename = "ondemand-db")]
    OnDemandDatabase,
}

impl BackupKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filesystem => "fs",
            Self::Database => "db",
            Self::OnDemand => "ondemand",
            Self::OnDemandFilesystem => "ondemand-fs",
            Self::OnDemandDatabase => "ondemand-db",
        }
    }
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    #[serde(deserialize_with = "de::string_or_number")]
    pub atomic_backup_id: String,
    #[serde(deserialize_with = "de::string_or_number")]
    pub atomic_site_id: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub backup_timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: BackupKind,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Client for the backup endpoints.
#[derive(Clone, Debug)]
pub struct BackupsClient {
    client: ResourceClient,
}

impl BackupsClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Requests an on-demand filesystem or database backup.
    ///
    /// The returned job identifier is the backup request ID. It cannot be
    /// polled.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] for kinds other than
    /// [`BackupKind::Filesystem`] and [`BackupKind::Database`], or any
    /// pipeline error.
    pub async fn create(&self, site_id: u64, kind: BackupKind) -> Result<Job, ApiError> {
        if !matches!(kind, BackupKind::Filesystem | BackupKind::Database) {
            return Err(InvalidHttpRequestError::InvalidArgument {
                argument: "kind".to_string(),
                reason: format!("on-demand backups must be 'fs' or 'db', got '{kind}'"),
            }
            .into());
        }
        let path = build_path(
            "/on-demand-backup/create/{site}/{kind}",
            &[("site", site_id.to_string()), ("kind", kind.to_string())],
        );
        let job = self
            .client
            .submit_with(self.client.post(path), JobPolling::FireAndForget)
            .await?;
        tracing::info!(site_id, request_id = %job.id(), "On-demand backup requested");
        Ok(job)
    }

    /// Requests removal of an on-demand backup. The returned job cannot be
    /// polled.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn delete(&self, site_id: u64, backup_id: &str) -> Result<Job, ApiError> {
        require("backup_id", backup_id)?;
        let path = build_path(
            "/on-demand-backup/delete/{site}/{backup}",
            &[("site", site_id.to_string()), ("backup", backup_id.to_string())],
        );
        self.client
            .submit_with(self.client.post(path), JobPolling::FireAndForget)
            .await
    }

    /// Lists a site's backups, optionally restricted to some kinds.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list(
        &self,
        site: impl Into<SiteRef>,
        kinds: &[BackupKind],
    ) -> Result<Vec<Backup>, ApiError> {
        let mut path = super::site_path(
            &self.client,
            "/site-backups-list/{service}/{identifier}",
            &site.into(),
        );
        for kind in kinds {
            path.push('/');
            path.push_str(kind.as_str());
        }
        self.client.fetch_all(self.client.get(path)).await
    }

    /// Fetches the metadata of one backup.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn info(
        &self,
        site: impl Into<SiteRef>,
        backup_id: &str,
    ) -> Result<Backup, ApiError> {
        let path = self.backup_path("/site-backup-info", &site.into(), backup_id)?;
        self.client.fetch(self.client.get(path)).await
    }

    /// Downloads a backup: a bzipped tar archive for filesystem backups, a
    /// MySQL dump for database backups.
    ///
    /// # Errors
    ///
    /// Returns any transport or classification error.
    pub async fn download(
        &self,
        site: impl Into<SiteRef>,
        backup_id: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let path = self.backup_path("/site-backup-get", &site.into(), backup_id)?;
        let bytes = self.client.download(self.client.get(path)).await?;
        tracing::debug!(backup_id, bytes = bytes.len(), "Downloaded backup");
        Ok(bytes)
    }

    fn backup_path(
        &self,
        prefix: &str,
        site: &SiteRef,
        backup_id: &str,
    ) -> Result<String, ApiError> {
        require("backup_id", backup_id)?;
        Ok(build_path(
            &format!("{prefix}/{{service}}/{{identifier}}/{{backup}}"),
            &[
                ("service", self.client.service(site).to_string()),
                ("identifier", site.identifier()),
                ("backup", backup_id.to_string()),
            ],
        ))
    }
}
