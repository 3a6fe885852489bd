//! Path building for Atomic API endpoints.
//!
//! Endpoint paths are templates with `{name}` placeholders. Every value
//! substituted into a template is percent-encoded as a single path segment,
//! so a domain or key can never introduce an extra `/` or a query string.
//!
//! Site-scoped endpoints take the form `/endpoint/{service}/{identifier}`,
//! where the service is `domain` when the site is addressed by domain and
//! the client identifier when it is addressed by atomic site ID. [`SiteRef`]
//! captures both addressing modes.
//!
//! # Example
//!
//! ```rust
//! use atomic_api::rest::{build_path, SiteRef};
//!
//! let site = SiteRef::from("example.com");
//! let path = build_path(
//!     "/delete-site/{service}/{identifier}",
//!     &[("service", site.service("agency")), ("identifier", &site.identifier())],
//! );
//! assert_eq!(path, "/delete-site/domain/example.com");
//!
//! let site = SiteRef::from(12345_u64);
//! assert_eq!(site.service("agency"), "agency");
//! assert_eq!(site.identifier(), "12345");
//! ```

use std::fmt;
use std::fmt::Display;

/// Builds a path from a template by substituting percent-encoded values.
///
/// Placeholders with no matching parameter are left untouched.
///
/// # Example
///
/// ```rust
/// use atomic_api::rest::build_path;
///
/// let path = build_path("/site-meta/{site}/{key}/get", &[("site", "1"), ("key", "php version")]);
/// assert_eq!(path, "/site-meta/1/php%20version/get");
/// ```
#[must_use]
pub fn build_path<V: Display>(template: &str, params: &[(&str, V)]) -> String {
    let mut result = template.to_string();

    for (key, value) in params {
        let placeholder = format!("{{{key}}}");
        let encoded = urlencoding::encode(&value.to_string()).into_owned();
        result = result.replace(&placeholder, &encoded);
    }

    result
}

/// A reference to a site, either by atomic site ID or by domain name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SiteRef {
    /// The atomic site ID.
    Id(u64),
    /// The site's domain name.
    Domain(String),
}

impl SiteRef {
    /// Returns the service segment for site-scoped paths: `domain` for
    /// domains, the client identifier for site IDs.
    #[must_use]
    pub fn service<'a>(&self, client_id: &'a str) -> &'a str {
        match self {
            Self::Id(_) => client_id,
            Self::Domain(_) => "domain",
        }
    }

    /// Returns the identifier segment (the ID or the domain).
    #[must_use]
    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SiteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Domain(domain) => f.write_str(domain),
        }
    }
}

impl From<u64> for SiteRef {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for SiteRef {
    fn from(domain: &str) -> Self {
        Self::Domain(domain.to_string())
    }
}

impl From<String> for SiteRef {
    fn from(domain: String) -> Self {
        Self::Domain(domain)
    }
}

// Verify types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SiteRef>();
};
