//! SSH access management.
//!
//! Three groups of endpoints:
//!
//! - per-site SSH/SFTP users
//! - client-wide authorized keys
//! - aliasable public keys, addressed by category and name through
//!   [`AliasKeysClient`]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::ApiError;
use crate::rest::{build_path, de, Job, ResourceClient, SiteRef};

use super::{client_path, form_of, require};

/// An SSH user as returned after adding or updating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SshUser {
    pub user: String,
    /// Redacted password information.
    #[serde(default, deserialize_with = "de::empty_string_as_none")]
    pub pass: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Parameters for adding or updating a site SSH user.
///
/// A `password` of `Some("")` disables password login; `None` lets the
/// platform generate one on creation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NewSshUser {
    #[serde(rename = "user")]
    pub username: String,
    #[serde(rename = "pkey", skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(rename = "pass", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NewSshUser {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// A client-wide authorized key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizedKey {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// An aliasable public key.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AliasKey {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

/// Client for the SSH endpoints.
#[derive(Clone, Debug)]
pub struct SshClient {
    client: ResourceClient,
}

impl SshClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Returns the client for aliasable public keys.
    #[must_use]
    pub fn alias_keys(&self) -> AliasKeysClient {
        AliasKeysClient {
            client: self.client.clone(),
        }
    }

    /// Lists the SSH usernames of a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_users(&self, site: impl Into<SiteRef>) -> Result<Vec<String>, ApiError> {
        let path = super::site_path(
            &self.client,
            "/ssh-user/{service}/{identifier}/list",
            &site.into(),
        );
        self.client.fetch_all(self.client.get(path)).await
    }

    /// Adds an SSH user to a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn add_user(
        &self,
        site: impl Into<SiteRef>,
        user: &NewSshUser,
    ) -> Result<SshUser, ApiError> {
        require("username", &user.username)?;
        let path = super::site_path(
            &self.client,
            "/ssh-user/{service}/{identifier}/add",
            &site.into(),
        );
        let request = self.client.post(path).form_value(&form_of(user)?);
        self.client.fetch(request).await
    }

    /// Removes an SSH user from a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn remove_user(
        &self,
        site: impl Into<SiteRef>,
        username: &str,
    ) -> Result<Value, ApiError> {
        let path = self.user_path(&site.into(), "remove", username)?;
        self.client.fetch(self.client.get(path)).await
    }

    /// Replaces the public key and/or password of an SSH user.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn update_user(
        &self,
        site: impl Into<SiteRef>,
        user: &NewSshUser,
    ) -> Result<SshUser, ApiError> {
        let path = self.user_path(&site.into(), "update", &user.username)?;
        let request = self
            .client
            .post(path)
            .form_opt("pkey", user.public_key.as_deref())
            .form_opt("pass", user.password.as_deref());
        self.client.fetch(request).await
    }

    /// Terminates every open SSH session on a site.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn disconnect_all_users(&self, site: impl Into<SiteRef>) -> Result<Job, ApiError> {
        let path = super::site_path(
            &self.client,
            "/ssh-disconnect-all-users/{service}/{identifier}",
            &site.into(),
        );
        self.client.submit(self.client.get(path)).await
    }

    fn user_path(&self, site: &SiteRef, action: &str, username: &str) -> Result<String, ApiError> {
        require("username", username)?;
        Ok(build_path(
            "/ssh-user/{service}/{identifier}/{action}/{user}",
            &[
                ("service", self.client.service(site).to_string()),
                ("identifier", site.identifier()),
                ("action", action.to_string()),
                ("user", username.to_string()),
            ],
        ))
    }

    /// Lists the client-wide authorized keys.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_client_keys(&self) -> Result<Vec<AuthorizedKey>, ApiError> {
        let path = client_path(&self.client, "/client-authorized-keys/{client}/list");
        self.client.fetch_all(self.client.get(path)).await
    }

    /// Adds a client-wide authorized key.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn add_client_key(&self, key_line: &str, name: &str) -> Result<Value, ApiError> {
        require("key_line", key_line)?;
        require("name", name)?;
        let path = client_path(&self.client, "/client-authorized-keys/{client}/add");
        let request = self
            .client
            .post(path)
            .form_field("authorized_keys_line", key_line)
            .form_field("name", name);
        self.client.fetch(request).await
    }

    /// Removes a client-wide authorized key.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn remove_client_key(&self, key_id: &str) -> Result<Value, ApiError> {
        require("key_id", key_id)?;
        let path = build_path(
            "/client-authorized-keys/{client}/remove/{key}",
            &[("client", self.client.client_id()), ("key", key_id)],
        );
        self.client.fetch(self.client.get(path)).await
    }
}

/// Client for aliasable public keys.
#[derive(Clone, Debug)]
pub struct AliasKeysClient {
    client: ResourceClient,
}

impl AliasKeysClient {
    fn key_path(&self, action: &str, category: &str, name: &str) -> Result<String, ApiError> {
        require("category", category)?;
        require("name", name)?;
        Ok(build_path(
            "/alias-pkey/{action}/{client}/{category}/{name}",
            &[
                ("action", action),
                ("client", self.client.client_id()),
                ("category", category),
                ("name", name),
            ],
        ))
    }

    /// Creates or replaces the key stored under `category`/`name`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn set(
        &self,
        category: &str,
        name: &str,
        public_key: &str,
    ) -> Result<AliasKey, ApiError> {
        require("public_key", public_key)?;
        let path = self.key_path("set", category, name)?;
        let request = self.client.post(path).form_field("pkey", public_key);
        self.client.fetch(request).await
    }

    /// Reads the key stored under `category`/`name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown alias, or any other
    /// pipeline error.
    pub async fn get(&self, category: &str, name: &str) -> Result<AliasKey, ApiError> {
        let path = self.key_path("get", category, name)?;
        self.client.fetch(self.client.get(path)).await
    }

    /// Lists the keys of a category. `after` continues from a previous page.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list(
        &self,
        category: &str,
        after: Option<&str>,
    ) -> Result<Vec<AliasKey>, ApiError> {
        require("category", category)?;
        let path = build_path(
            "/alias-pkey/list/{client}/{category}",
            &[("client", self.client.client_id()), ("category", category)],
        );
        let request = self.client.post(path).form_opt("after", after);
        self.client.fetch_all(request).await
    }

    /// Removes the key stored under `category`/`name`.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn remove(&self, category: &str, name: &str) -> Result<Value, ApiError> {
        let path = self.key_path("remove", category, name)?;
        self.client.fetch(self.client.get(path)).await
    }

    /// Lists the categories in use.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        let path = client_path(&self.client, "/alias-pkey/categories/{client}");
        self.client.fetch_all(self.client.get(path)).await
    }
}
