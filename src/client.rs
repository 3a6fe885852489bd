//! The top-level Atomic API client.
//!
//! [`AtomicClient`] holds the credentials once and hands out resource
//! clients that share a single transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use atomic_api::{ApiKey, AtomicClient, AtomicConfig, ClientId};
//! use atomic_api::rest::resources::NewSite;
//!
//! let config = AtomicConfig::builder()
//!     .api_key(ApiKey::new(std::env::var("ATOMIC_API_KEY")?)?)
//!     .client_id(ClientId::new("agency")?)
//!     .build()?;
//! let client = AtomicClient::new(&config)?;
//!
//! for site in client.sites().list(Some(20), None).await? {
//!     println!("{} {}", site.atomic_site_id, site.domain_name);
//! }
//!
//! let mut job = client
//!     .sites()
//!     .create(&NewSite::new("admin", "admin@example.com").domain_name("example.com"))
//!     .await?;
//! job.wait(Duration::from_secs(5), Duration::from_secs(600)).await?;
//! ```

use std::sync::Arc;

use crate::clients::{HttpClient, JobId, PollRoute};
use crate::config::AtomicConfig;
use crate::error::ConfigError;
use crate::rest::resources::{
    BackupsClient, ClientMetaClient, EdgeCacheClient, EmailClient, MetricsClient,
    MigrationsClient, ResponseTicketsClient, ServersClient, SitesClient, SshClient, TasksClient,
    UtilityClient,
};
use crate::rest::{Job, ResourceClient};

/// Entry point to every Atomic API resource.
///
/// Cloning is cheap and clones share one connection pool. Independently
/// configured clients never share state.
#[derive(Clone, Debug)]
pub struct AtomicClient {
    resource: ResourceClient,
}

// Verify AtomicClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AtomicClient>();
};

impl AtomicClient {
    /// Creates a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &AtomicConfig) -> Result<Self, ConfigError> {
        let http = HttpClient::new(config)?;
        tracing::debug!(
            client_id = %config.client_id(),
            base_url = AsRef::<str>::as_ref(config.base_url()),
            "Created Atomic API client"
        );
        Ok(Self {
            resource: ResourceClient::new(Arc::new(http)),
        })
    }

    /// Returns the shared base every resource client is built on.
    #[must_use]
    pub const fn resource_client(&self) -> &ResourceClient {
        &self.resource
    }

    #[must_use]
    pub fn sites(&self) -> SitesClient {
        SitesClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn backups(&self) -> BackupsClient {
        BackupsClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn ssh(&self) -> SshClient {
        SshClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn metrics(&self) -> MetricsClient {
        MetricsClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn tasks(&self) -> TasksClient {
        TasksClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn edge_cache(&self) -> EdgeCacheClient {
        EdgeCacheClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn servers(&self) -> ServersClient {
        ServersClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn client_meta(&self) -> ClientMetaClient {
        ClientMetaClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn email(&self) -> EmailClient {
        EmailClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn utility(&self) -> UtilityClient {
        UtilityClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn migrations(&self) -> MigrationsClient {
        MigrationsClient::new(self.resource.clone())
    }

    #[must_use]
    pub fn response_tickets(&self) -> ResponseTicketsClient {
        ResponseTicketsClient::new(self.resource.clone())
    }

    /// Re-attaches a handle to a job started earlier, polling the
    /// job-status route.
    #[must_use]
    pub fn job(&self, id: impl Into<JobId>) -> Job {
        Job::attach(self.resource.clone(), id.into(), PollRoute::job_status())
    }
}
