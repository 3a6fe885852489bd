//! Time series metrics and site logs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::ApiError;
use crate::rest::{build_path, ResourceClient, SiteRef};

use super::sites::{LogPage, LogQuery, SitesClient};
use super::{form_of, missing, require};

/// Whose metrics to query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsScope {
    /// One site, by ID or domain.
    Site(SiteRef),
    /// A client account; `None` means the configured client.
    Client(Option<String>),
}

/// A filter on one metrics column, e.g. `request_method = POST`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricFilter {
    pub column: String,
    pub operator: String,
    pub value: String,
}

impl MetricFilter {
    #[must_use]
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// A metrics query. `start` and `end` are unix timestamps.
///
/// # Example
///
/// ```rust
/// use atomic_api::rest::resources::{MetricFilter, MetricsQuery};
///
/// let query = MetricsQuery::new(1_700_000_000, 1_700_086_400)
///     .metric("requests")
///     .dimension("http_host")
///     .filter(MetricFilter::new("request_method", "=", "POST"));
/// assert_eq!(query.metrics, vec!["requests"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct MetricsQuery {
    pub start: i64,
    pub end: i64,
    #[serde(rename = "metric")]
    pub metrics: Vec<String>,
    #[serde(rename = "dimension")]
    pub dimensions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<MetricFilter>,
    /// Return one summary over the whole range instead of a time series.
    #[serde(skip)]
    pub summarize: bool,
}

impl MetricsQuery {
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metrics.push(metric.into());
        self
    }

    #[must_use]
    pub fn dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimensions.push(dimension.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: MetricFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub const fn summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }
}

/// Client for the metrics endpoints.
#[derive(Clone, Debug)]
pub struct MetricsClient {
    client: ResourceClient,
}

impl MetricsClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    fn scope_path(&self, scope: &MetricsScope, summarize: bool) -> Result<String, ApiError> {
        let (kind, key) = match scope {
            MetricsScope::Site(site) => ("site", site.identifier()),
            MetricsScope::Client(Some(key)) => {
                require("key", key)?;
                ("client", key.clone())
            }
            MetricsScope::Client(None) => ("client", self.client.client_id().to_string()),
        };
        let mut path = build_path(
            "/metrics/{kind}/{key}",
            &[("kind", kind.to_string()), ("key", key)],
        );
        if summarize {
            path.push_str("/summarize");
        }
        Ok(path)
    }

    /// Queries the metrics database.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] when no metric or dimension
    /// is given, or any pipeline error.
    pub async fn query(
        &self,
        scope: &MetricsScope,
        query: &MetricsQuery,
    ) -> Result<Value, ApiError> {
        if query.metrics.is_empty() {
            return Err(missing("metric"));
        }
        if query.dimensions.is_empty() {
            return Err(missing("dimension"));
        }
        let path = self.scope_path(scope, query.summarize)?;
        let request = self.client.post(path).form_value(&form_of(query)?);
        self.client.fetch(request).await
    }

    /// Queries a site's web server access logs.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_site_logs(
        &self,
        site: impl Into<SiteRef>,
        query: &LogQuery,
    ) -> Result<LogPage, ApiError> {
        SitesClient::new(self.client.clone()).get_logs(site, query).await
    }

    /// Queries a site's PHP error logs.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get_error_logs(
        &self,
        site: impl Into<SiteRef>,
        query: &LogQuery,
    ) -> Result<LogPage, ApiError> {
        SitesClient::new(self.client.clone())
            .get_error_logs(site, query)
            .await
    }
}
