//! Endpoint catalogs for the Atomic API.
//!
//! Each catalog is a thin client over [`ResourceClient`]: it builds request
//! descriptors, picks the expected response kind, and lets the shared
//! pipeline do the rest. Catalogs are obtained from
//! [`AtomicClient`](crate::AtomicClient):
//!
//! ```rust,ignore
//! use atomic_api::rest::resources::NewSite;
//!
//! let sites = client.sites().list(Some(10), None).await?;
//! let job = client.sites().create(&NewSite::new("admin", "admin@example.com")).await?;
//! let backups = client.backups().list(12345_u64, &[]).await?;
//! ```
//!
//! # Available Catalogs
//!
//! | Catalog | Client | Endpoints |
//! |---------|--------|-----------|
//! | Sites | [`SitesClient`] | site lifecycle, domains, aliases, software, SSL, logs |
//! | Backups | [`BackupsClient`] | on-demand backups, listing, download |
//! | SSH | [`SshClient`] | site SSH users, client keys, aliasable keys |
//! | Metrics | [`MetricsClient`] | site and client metrics |
//! | Tasks | [`TasksClient`] | bulk tasks across sites |
//! | Edge cache | [`EdgeCacheClient`] | cache status, purge, DDoS mode |
//! | Servers | [`ServersClient`] | datacenters, PHP versions |
//! | Client meta | [`ClientMetaClient`] | client-level key/value store |
//! | Email | [`EmailClient`] | SASL block list |
//! | Utility | [`UtilityClient`] | status echo for testing error handling |
//! | Migrations | [`MigrationsClient`] | site migrations |
//! | Response tickets | [`ResponseTicketsClient`] | ticket summaries |

mod backups;
mod client_meta;
mod edge_cache;
mod email;
mod metrics;
mod migrations;
mod response_tickets;
mod servers;
mod sites;
mod ssh;
mod tasks;
mod utility;

pub use backups::{Backup, BackupKind, BackupsClient};
pub use client_meta::ClientMetaClient;
pub use edge_cache::{EdgeCacheClient, EdgeCacheStatus};
pub use email::EmailClient;
pub use metrics::{MetricFilter, MetricsClient, MetricsQuery, MetricsScope};
pub use migrations::{Migration, MigrationCreation, MigrationsClient, NewMigration};
pub use response_tickets::{ResponseTicket, ResponseTicketsClient};
pub use servers::ServersClient;
pub use sites::{
    IpInfo, LogPage, LogQuery, NewSite, PersistentDataAction, Site, SiteSummary, SitesClient,
    SoftwareAction, SortOrder, WordPressVersion,
};
pub use ssh::{AliasKey, AliasKeysClient, AuthorizedKey, NewSshUser, SshClient, SshUser};
pub use tasks::{NewTask, Task, TaskCreation, TaskKind, TasksClient, WebhookPolicy};
pub use utility::UtilityClient;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{short_type_name, ApiError, InvalidHttpRequestError};
use crate::rest::{build_path, ResourceClient, SiteRef};

/// Builds a `/{service}/{identifier}` style path for a site.
fn site_path(client: &ResourceClient, template: &str, site: &SiteRef) -> String {
    build_path(
        template,
        &[
            ("service", client.service(site).to_string()),
            ("identifier", site.identifier()),
        ],
    )
}

/// Builds a path whose only placeholder is the client identifier.
fn client_path(client: &ResourceClient, template: &str) -> String {
    build_path(template, &[("client", client.client_id())])
}

/// Serializes request parameters for form encoding.
fn form_of<T: Serialize>(params: &T) -> Result<Value, ApiError> {
    serde_json::to_value(params).map_err(|e| {
        InvalidHttpRequestError::InvalidArgument {
            argument: short_type_name::<T>(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn missing(argument: &str) -> ApiError {
    InvalidHttpRequestError::MissingArgument {
        argument: argument.to_string(),
    }
    .into()
}

/// Rejects an empty required argument before any request is sent.
fn require(argument: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(missing(argument));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::resource_client;
    use super::*;

    #[test]
    fn test_site_path_by_id_uses_client_service() {
        let client = resource_client("https://atomic.example.com/api/v1.0");
        let path = site_path(&client, "/delete-site/{service}/{identifier}", &SiteRef::Id(7));
        assert_eq!(path, "/delete-site/agency/7");
    }

    #[test]
    fn test_site_path_by_domain_uses_domain_service() {
        let client = resource_client("https://atomic.example.com/api/v1.0");
        let path = site_path(
            &client,
            "/site-backups-list/{service}/{identifier}",
            &SiteRef::from("example.com"),
        );
        assert_eq!(path, "/site-backups-list/domain/example.com");
    }

    #[test]
    fn test_require_rejects_blank_values() {
        let error = require("domain", "  ").unwrap_err();
        assert!(matches!(
            error,
            ApiError::InvalidHttpRequest(InvalidHttpRequestError::MissingArgument { ref argument })
                if argument == "domain"
        ));
        assert!(require("domain", "example.com").is_ok());
    }

    #[test]
    fn test_client_path() {
        let client = resource_client("https://atomic.example.com/api/v1.0");
        assert_eq!(client_path(&client, "/get-sites/{client}"), "/get-sites/agency");
    }
}
