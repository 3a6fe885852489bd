//! # Atomic API Rust SDK
//!
//! A Rust client for the Atomic (WP Cloud) hosting API: site lifecycle,
//! backups, SSH access, metrics, bulk tasks, edge cache and server metadata
//! as typed async method calls.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`AtomicConfig`] and [`AtomicConfigBuilder`]
//! - Validated newtypes for the API key, client identifier and base URL
//! - An authenticated transport performing exactly one exchange per call
//! - Classification of every failure into an [`ErrorKind`]
//! - Normalization of the API's mixed response envelopes
//! - Typed records that keep unknown fields
//! - [`Job`] handles for server-side asynchronous operations
//!
//! ## Quick Start
//!
//! ```rust
//! use atomic_api::{ApiKey, AtomicClient, AtomicConfig, ClientId};
//!
//! let config = AtomicConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .client_id(ClientId::new("your-client").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = AtomicClient::new(&config).unwrap();
//! let _sites = client.sites();
//! ```
//!
//! ## Handling Errors
//!
//! Branch on [`ApiError::kind`] rather than on messages:
//!
//! ```rust,ignore
//! use atomic_api::ErrorKind;
//!
//! match client.sites().get(12345_u64, false).await {
//!     Ok(site) => println!("{}", site.domain_name),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("No such site"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Jobs
//!
//! Site creation, deletion and similar calls return a [`Job`]:
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! let mut job = client.sites().delete("example.com").await?;
//! let status = job.wait(Duration::from_secs(5), Duration::from_secs(300)).await?;
//! assert!(status.state.is_success());
//! ```
//!
//! ## Logging
//!
//! The SDK emits [`tracing`] events and never installs a subscriber.
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All clients are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime
//! - **No hidden retries**: One network exchange per call

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

pub use client::AtomicClient;
pub use config::{ApiKey, AtomicConfig, AtomicConfigBuilder, BaseUrl, ClientId};
pub use error::ConfigError;

pub use clients::{
    ApiError, ErrorKind, HttpClient, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, JobId,
};

pub use rest::{Job, JobState, JobStatus, ResourceClient, SiteRef};
