//! Site resource implementation.
//!
//! Covers the site lifecycle (create, inspect, delete), domains and aliases,
//! installed software, WordPress versions, options, persistent data, site
//! meta, SSL settings, and access/error logs. Mutations that the platform
//! runs in the background return a pollable [`Job`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::clients::{ApiError, JobId, PollRoute};
use crate::rest::{build_path, de, Job, JobStatus, ResourceClient, SiteRef};

use super::{client_path, form_of, missing, require};

/// A row of the site listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteSummary {
    pub atomic_site_id: u64,
    pub domain_name: String,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Full site details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub atomic_site_id: u64,
    #[serde(default, deserialize_with = "de::optional_int")]
    pub wpcom_blog_id: Option<u64>,
    pub domain_name: String,
    #[serde(default, deserialize_with = "de::optional_int")]
    pub server_pool_id: Option<u64>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub db_pass: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub cache_prefix: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub wp_admin_user: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub wp_admin_email: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub db_charset: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub db_collate: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub php_version: Option<String>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub wp_version: Option<String>,
    #[serde(default, deserialize_with = "de::optional_int")]
    pub migrate_to_pool: Option<u64>,
    /// Sent by the API as `0`/`1`.
    #[serde(default, deserialize_with = "de::optional_flag")]
    pub migrate_readonly: Option<bool>,
    #[serde(default, deserialize_with = "de::optional_flag")]
    pub photon_subsizes: Option<bool>,
    /// Present only when requested with `extra = true`.
    #[serde(default)]
    pub extra: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Parameters for creating a site.
///
/// # Example
///
/// ```rust
/// use atomic_api::rest::resources::NewSite;
///
/// let site = NewSite::new("admin", "admin@example.com")
///     .domain_name("example.com")
///     .php_version("8.3")
///     .software("plugins/akismet/latest", "activate");
/// assert_eq!(site.domain_name.as_deref(), Some("example.com"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NewSite {
    pub admin_user: String,
    pub admin_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_domain: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_pass: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_charset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_collate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub php_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_quota: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_affinity: Option<String>,
    /// Software slug to action, e.g. `plugins/akismet/latest` to `activate`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub software: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
    /// Any other creation fields the platform accepts.
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl NewSite {
    /// Starts a creation request with the two required fields.
    #[must_use]
    pub fn new(admin_user: impl Into<String>, admin_email: impl Into<String>) -> Self {
        Self {
            admin_user: admin_user.into(),
            admin_email: admin_email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn domain_name(mut self, domain: impl Into<String>) -> Self {
        self.domain_name = Some(domain.into());
        self
    }

    #[must_use]
    pub const fn demo_domain(mut self, demo: bool) -> Self {
        self.demo_domain = Some(demo);
        self
    }

    #[must_use]
    pub fn admin_pass(mut self, password: impl Into<String>) -> Self {
        self.admin_pass = Some(password.into());
        self
    }

    #[must_use]
    pub fn php_version(mut self, version: impl Into<String>) -> Self {
        self.php_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn space_quota(mut self, quota: impl Into<String>) -> Self {
        self.space_quota = Some(quota.into());
        self
    }

    #[must_use]
    pub const fn clone_from(mut self, site_id: u64) -> Self {
        self.clone_from = Some(site_id);
        self
    }

    #[must_use]
    pub fn geo_affinity(mut self, datacenter: impl Into<String>) -> Self {
        self.geo_affinity = Some(datacenter.into());
        self
    }

    #[must_use]
    pub fn software(mut self, slug: impl Into<String>, action: impl Into<String>) -> Self {
        self.software.insert(slug.into(), action.into());
        self
    }

    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.other.insert(key.into(), value.into());
        self
    }

    fn verify(&self) -> Result<(), ApiError> {
        require("admin_user", &self.admin_user)?;
        require("admin_email", &self.admin_email)
    }
}

/// What to do with a plugin or theme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SoftwareAction {
    Install,
    Activate,
    Deactivate,
    Remove,
    Lock,
    Unlock,
}

impl SoftwareAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Remove => "remove",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
        }
    }
}

impl fmt::Display for SoftwareAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A WordPress release channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WordPressVersion {
    Latest,
    Previous,
    Beta,
}

impl WordPressVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Previous => "previous",
            Self::Beta => "beta",
        }
    }
}

/// A change to one persistent data key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistentDataAction {
    Set(String),
    Delete,
}

impl PersistentDataAction {
    fn to_value(&self) -> Value {
        match self {
            Self::Set(value) => json!({ "value": value }),
            Self::Delete => json!({ "delete": true }),
        }
    }
}

/// Log sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// A query against the site access or error logs.
///
/// `start` and `end` are unix timestamps. Filters map a field name to the
/// accepted values, e.g. `status` to `["500", "502"]`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub start: i64,
    pub end: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(rename = "filter", skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, Vec<String>>,
}

impl LogQuery {
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.entry(field.into()).or_default().push(value.into());
        self
    }

    /// Continues a previous page.
    #[must_use]
    pub fn scroll_id(mut self, scroll_id: impl Into<String>) -> Self {
        self.scroll_id = Some(scroll_id.into());
        self
    }

    pub(crate) fn to_form(&self) -> Result<Value, ApiError> {
        Ok(json!({ "data": form_of(self)? }))
    }
}

/// One page of log entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LogPage {
    #[serde(default)]
    pub logs: Vec<Value>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub scroll_id: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// IP addresses to point a domain at.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct IpInfo {
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub suggested: Vec<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

#[derive(Deserialize)]
struct Allowed {
    #[serde(default)]
    allowed: bool,
}

#[derive(Deserialize)]
struct Domains {
    #[serde(default)]
    domains: Vec<String>,
}

#[derive(Deserialize)]
struct Url {
    url: String,
}

#[derive(Deserialize)]
struct Queued {
    #[serde(default)]
    queued: bool,
}

/// Client for the site endpoints.
#[derive(Clone, Debug)]
pub struct SitesClient {
    client: ResourceClient,
}

impl SitesClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    fn site_path(&self, template: &str, site: &SiteRef) -> String {
        super::site_path(&self.client, template, site)
    }

    /// Lists the client's sites, oldest first.
    ///
    /// `after` is the last `atomic_site_id` of the previous page.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list(
        &self,
        limit: Option<u32>,
        after: Option<u64>,
    ) -> Result<Vec<SiteSummary>, ApiError> {
        let request = self
            .client
            .get(client_path(&self.client, "/get-sites/{client}"))
            .query_opt("limit", limit)
            .query_opt("after", after);
        self.client.fetch_all(request).await
    }

    /// Fetches one site, optionally with the `extra` details block.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown site, or any other
    /// pipeline error.
    pub async fn get(&self, site: impl Into<SiteRef>, extra: bool) -> Result<Site, ApiError> {
        let site = site.into();
        let mut path = build_path("/get-site/{site}", &[("site", site.identifier())]);
        if extra {
            path.push_str("/extra");
        }
        self.client.fetch(self.client.get(path)).await
    }

    /// Creates a site. The returned job carries the new `atomic_site_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] when `admin_user` or
    /// `admin_email` is empty, or any pipeline error.
    pub async fn create(&self, site: &NewSite) -> Result<Job, ApiError> {
        site.verify()?;
        let request = self
            .client
            .post(client_path(&self.client, "/create-site/{client}"))
            .form_value(&form_of(site)?);
        let job = self.client.submit(request).await?;
        tracing::info!(job_id = %job.id(), "Site creation submitted");
        Ok(job)
    }

    /// Deletes a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn delete(&self, site: impl Into<SiteRef>) -> Result<Job, ApiError> {
        let path = self.site_path("/delete-site/{service}/{identifier}", &site.into());
        self.client.submit(self.client.post(path)).await
    }

    /// Changes a site's primary domain. With `keep_old_domain`, the previous
    /// domain stays attached as an alias.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_domain(
        &self,
        site: impl Into<SiteRef>,
        new_domain: &str,
        keep_old_domain: bool,
    ) -> Result<Job, ApiError> {
        require("new_domain", new_domain)?;
        let site = site.into();
        let mut path = build_path(
            "/update-site-domain/{service}/{identifier}/{domain}",
            &[
                ("service", self.client.service(&site).to_string()),
                ("identifier", site.identifier()),
                ("domain", new_domain.to_string()),
            ],
        );
        if keep_old_domain {
            path.push_str("/keep");
        }
        self.client.submit(self.client.post(path)).await
    }

    /// Returns `true` if the platform can host `domain` for this client.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn check_can_host_domain(&self, domain: &str) -> Result<bool, ApiError> {
        require("domain", domain)?;
        let path = build_path(
            "/check-can-host-domain/{client}/{domain}",
            &[("client", self.client.client_id()), ("domain", domain)],
        );
        let allowed: Allowed = self.client.fetch(self.client.get(path)).await?;
        Ok(allowed.allowed)
    }

    /// Returns the TXT record value that proves ownership of `domain`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_domain_verification_code(&self, domain: &str) -> Result<String, ApiError> {
        require("domain", domain)?;
        let path = build_path(
            "/get-domain-verification-code/{client}/{domain}",
            &[("client", self.client.client_id()), ("domain", domain)],
        );
        self.client.fetch(self.client.get(path)).await
    }

    /// Returns the IP addresses to point DNS at, optionally for one domain.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_ips(&self, domain: Option<&str>) -> Result<IpInfo, ApiError> {
        let mut path = client_path(&self.client, "/get-ips/{client}");
        if let Some(domain) = domain {
            path.push_str(&build_path("/{domain}", &[("domain", domain)]));
        }
        self.client.fetch(self.client.get(path)).await
    }

    /// Lists the aliases attached to a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_aliases(&self, site: impl Into<SiteRef>) -> Result<Vec<String>, ApiError> {
        let path = self.site_path("/site-alias/{service}/{identifier}/list", &site.into());
        let domains: Domains = self.client.fetch(self.client.get(path)).await?;
        Ok(domains.domains)
    }

    /// Adds an alias and returns the updated alias list.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn add_alias(
        &self,
        site: impl Into<SiteRef>,
        alias: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.alias_action(site.into(), "add", alias).await
    }

    /// Removes an alias and returns the updated alias list.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn remove_alias(
        &self,
        site: impl Into<SiteRef>,
        alias: &str,
    ) -> Result<Vec<String>, ApiError> {
        self.alias_action(site.into(), "remove", alias).await
    }

    async fn alias_action(
        &self,
        site: SiteRef,
        action: &str,
        alias: &str,
    ) -> Result<Vec<String>, ApiError> {
        require("alias", alias)?;
        let path = build_path(
            "/site-alias/{service}/{identifier}/{action}/{alias}",
            &[
                ("service", self.client.service(&site).to_string()),
                ("identifier", site.identifier()),
                ("action", action.to_string()),
                ("alias", alias.to_string()),
            ],
        );
        let domains: Domains = self.client.fetch(self.client.get(path)).await?;
        Ok(domains.domains)
    }

    /// Installs, activates, deactivates or removes plugins and themes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] when `actions` is empty, or
    /// any pipeline error.
    pub async fn manage_software(
        &self,
        site_id: u64,
        actions: &BTreeMap<String, SoftwareAction>,
    ) -> Result<Job, ApiError> {
        if actions.is_empty() {
            return Err(missing("actions"));
        }
        let path = build_path("/site-manage-software/atomic/{site}", &[("site", site_id)]);
        let mut request = self.client.post(path);
        for (slug, action) in actions {
            request = request.form_field(slug.as_str(), action);
        }
        self.client.submit(request).await
    }

    /// Moves a site to a WordPress release channel.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set_wordpress_version(
        &self,
        site_id: u64,
        version: WordPressVersion,
    ) -> Result<Job, ApiError> {
        let path = build_path(
            "/site-wordpress-version/{site}/{version}",
            &[("site", site_id.to_string()), ("version", version.as_str().to_string())],
        );
        self.client.submit(self.client.post(path)).await
    }

    /// Updates site options such as `blogname` or `admin_email`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_options(
        &self,
        site_id: u64,
        options: &BTreeMap<String, String>,
    ) -> Result<Job, ApiError> {
        let path = build_path("/update-site-options/atomic/{site}", &[("site", site_id)]);
        let request = self
            .client
            .post(path)
            .form_value(&json!({ "options": form_of(options)? }));
        self.client.submit(request).await
    }

    /// Sets or deletes persistent data keys that survive site rebuilds.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_persistent_data(
        &self,
        site_id: u64,
        changes: &BTreeMap<String, PersistentDataAction>,
    ) -> Result<Job, ApiError> {
        let data: Map<String, Value> = changes
            .iter()
            .map(|(key, action)| (key.clone(), action.to_value()))
            .collect();
        let path = build_path("/site-persist-data/{site}", &[("site", site_id)]);
        let request = self.client.post(path).form_value(&json!({ "data": data }));
        self.client.submit(request).await
    }

    /// Reads one site meta value.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_meta(&self, site_id: u64, key: &str) -> Result<Value, ApiError> {
        require("key", key)?;
        let path = build_path(
            "/site-meta/{site}/{key}/get",
            &[("site", site_id.to_string()), ("key", key.to_string())],
        );
        self.client.fetch(self.client.get(path)).await
    }

    /// Writes one site meta value.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_meta(
        &self,
        site_id: u64,
        key: &str,
        value: impl ToString + Send,
    ) -> Result<Value, ApiError> {
        require("key", key)?;
        let path = build_path(
            "/site-meta/{site}/{key}/update",
            &[("site", site_id.to_string()), ("key", key.to_string())],
        );
        self.client
            .fetch(self.client.post(path).form_field("value", value))
            .await
    }

    /// Returns a short-lived phpMyAdmin login URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SchemaValidation`] if the response has no URL, or
    /// any pipeline error.
    pub async fn get_phpmyadmin_url(&self, site_id: u64) -> Result<String, ApiError> {
        let path = build_path("/site-phpmyadmin/{site}", &[("site", site_id)]);
        let url: Url = self.client.fetch(self.client.post(path)).await?;
        Ok(url.url)
    }

    /// Rotates the site's database password.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn reset_db_password(&self, site_id: u64) -> Result<Job, ApiError> {
        let path = build_path("/reset-db-password/atomic/{site}", &[("site", site_id)]);
        self.client.submit(self.client.post(path)).await
    }

    /// Returns certificate details for a domain.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_ssl_info(&self, domain: &str) -> Result<Value, ApiError> {
        self.ssl(&["ssl-info", domain]).await
    }

    /// Queues a new certificate provisioning attempt. Returns `true` if the
    /// retry was queued.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn retry_ssl(&self, domain: &str) -> Result<bool, ApiError> {
        require("domain", domain)?;
        let path = build_path("/ssl-retry/{domain}", &[("domain", domain)]);
        let queued: Queued = self.client.fetch(self.client.post(path)).await?;
        Ok(queued.queued)
    }

    /// Toggles the certificate chain compatible with old Android devices.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set_ssl_android_compat(
        &self,
        domain: &str,
        enabled: bool,
    ) -> Result<Value, ApiError> {
        self.ssl(&["ssl-android-compat", domain, bool_segment(enabled)])
            .await
    }

    /// Removes a domain from the HSTS preload list.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn disable_ssl_hsts_preload(&self, domain: &str) -> Result<Value, ApiError> {
        self.ssl(&["ssl-hsts-preload", domain, "false"]).await
    }

    /// Toggles `includeSubDomains` on the HSTS header.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set_ssl_hsts_subdomains(
        &self,
        domain: &str,
        enabled: bool,
    ) -> Result<Value, ApiError> {
        self.ssl(&["ssl-hsts-subdomain", domain, bool_segment(enabled)])
            .await
    }

    /// Toggles redirecting social crawlers to plain HTTP.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set_ssl_social_crawler_redirect(
        &self,
        domain: &str,
        enabled: bool,
    ) -> Result<Value, ApiError> {
        self.ssl(&["ssl-social-crawler-redirect", domain, bool_segment(enabled)])
            .await
    }

    async fn ssl(&self, segments: &[&str]) -> Result<Value, ApiError> {
        require("domain", segments.get(1).copied().unwrap_or_default())?;
        let path: String = segments
            .iter()
            .map(|segment| format!("/{}", urlencoding::encode(segment)))
            .collect();
        self.client.fetch(self.client.post(path)).await
    }

    /// Queries the site's web server access logs.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_logs(
        &self,
        site: impl Into<SiteRef>,
        query: &LogQuery,
    ) -> Result<LogPage, ApiError> {
        self.logs("/site-logs/{site}", &site.into(), query).await
    }

    /// Queries the site's PHP error logs.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_error_logs(
        &self,
        site: impl Into<SiteRef>,
        query: &LogQuery,
    ) -> Result<LogPage, ApiError> {
        self.logs("/site-error-logs/{site}", &site.into(), query).await
    }

    async fn logs(
        &self,
        template: &str,
        site: &SiteRef,
        query: &LogQuery,
    ) -> Result<LogPage, ApiError> {
        let path = build_path(template, &[("site", site.identifier())]);
        let request = self.client.post(path).form_value(&query.to_form()?);
        self.client.fetch(request).await
    }

    /// Polls a job once on the job-status route.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn job_status(&self, job_id: impl Into<JobId>) -> Result<JobStatus, ApiError> {
        let mut job = Job::attach(self.client.clone(), job_id.into(), PollRoute::job_status());
        job.status().await.cloned()
    }

    /// Polls a job once on the older job-completion route.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn job_completion(&self, job_id: impl Into<JobId>) -> Result<JobStatus, ApiError> {
        let route = PollRoute::get("/job-completion/{job_id}");
        let mut job = Job::attach(self.client.clone(), job_id.into(), route);
        job.status().await.cloned()
    }
}

const fn bool_segment(enabled: bool) -> &'static str {
    if enabled {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::encode_form;

    #[test]
    fn test_new_site_form_encoding() {
        let site = NewSite::new("admin", "admin@example.com")
            .domain_name("example.com")
            .demo_domain(false)
            .software("plugins/akismet/latest", "activate")
            .meta("_data", "{}")
            .field("default_php_conns", "2");
        let fields = encode_form(&form_of(&site).unwrap());

        assert!(fields.contains(&("admin_user".into(), "admin".into())));
        assert!(fields.contains(&("domain_name".into(), "example.com".into())));
        assert!(fields.contains(&("demo_domain".into(), "0".into())));
        assert!(fields.contains(&("software[plugins/akismet/latest]".into(), "activate".into())));
        assert!(fields.contains(&("meta[_data]".into(), "{}".into())));
        assert!(fields.contains(&("default_php_conns".into(), "2".into())));
        assert!(!fields.iter().any(|(k, _)| k == "admin_pass"));
    }

    #[test]
    fn test_new_site_requires_admin_fields() {
        let error = NewSite::new("", "admin@example.com").verify().unwrap_err();
        assert!(error.to_string().contains("admin_user"));
        assert!(NewSite::new("admin", "admin@example.com").verify().is_ok());
    }

    #[test]
    fn test_log_query_form_encoding() {
        let query = LogQuery::new(100, 200)
            .filter("status", "500")
            .filter("status", "502")
            .scroll_id("abc");
        let fields = encode_form(&query.to_form().unwrap());
        assert_eq!(
            fields,
            vec![
                ("data[end]".to_string(), "200".to_string()),
                ("data[filter][status][]".to_string(), "500".to_string()),
                ("data[filter][status][]".to_string(), "502".to_string()),
                ("data[scroll_id]".to_string(), "abc".to_string()),
                ("data[start]".to_string(), "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_persistent_data_actions() {
        assert_eq!(PersistentDataAction::Set("v".into()).to_value(), json!({"value": "v"}));
        assert_eq!(PersistentDataAction::Delete.to_value(), json!({"delete": true}));
    }

    #[test]
    fn test_site_binds_with_unknown_fields() {
        let site: Site = crate::rest::bind(json!({
            "atomic_site_id": 5,
            "domain_name": "example.com",
            "wpcom_blog_id": "",
            "php_version": "8.3",
            "space_used": 1024
        }))
        .unwrap();
        assert_eq!(site.atomic_site_id, 5);
        assert!(site.wpcom_blog_id.is_none());
        assert_eq!(site.php_version.as_deref(), Some("8.3"));
        assert_eq!(site.unknown["space_used"], json!(1024));
    }

    #[test]
    fn test_site_binds_integer_flags() {
        let site: Site = crate::rest::bind(json!({
            "atomic_site_id": 5,
            "domain_name": "e.com",
            "migrate_readonly": 0,
            "photon_subsizes": 1
        }))
        .unwrap();
        assert_eq!(site.migrate_readonly, Some(false));
        assert_eq!(site.photon_subsizes, Some(true));
    }

    #[test]
    fn test_persistent_data_form_uses_value_and_delete_keys() {
        let data: Map<String, Value> = [
            ("bar".to_string(), PersistentDataAction::Delete.to_value()),
            ("foo".to_string(), PersistentDataAction::Set("v".into()).to_value()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            encode_form(&json!({ "data": data })),
            vec![
                ("data[bar][delete]".to_string(), "1".to_string()),
                ("data[foo][value]".to_string(), "v".to_string()),
            ]
        );
    }
}
