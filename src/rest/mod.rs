//! Resource infrastructure for the Atomic API.
//!
//! This module is the upper half of the request pipeline and the home of the
//! endpoint-specific clients:
//!
//! - **[`ResourceClient`]**: The base every resource client composes; the only
//!   route from a resource method to the network
//! - **[`bind`]**: Converts normalized values into typed records
//! - **[`Job`]**: A handle on a server-side asynchronous operation with
//!   [`Job::status`] and [`Job::wait`]
//! - **Path building**: [`build_path`] and [`SiteRef`] for site-scoped routes
//! - **[`resources`]**: The endpoint catalogs (sites, backups, SSH, ...)
//!
//! # Example: Waiting for a job
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use atomic_api::rest::resources::NewSite;
//!
//! let mut job = client.sites().create(&NewSite::new("admin", "admin@example.com")
//!     .domain_name("example.com")).await?;
//! println!("Job {} started", job.id());
//!
//! match job.wait(Duration::from_secs(5), Duration::from_secs(900)).await {
//!     Ok(status) => println!("Finished: {}", status.state),
//!     Err(e) if e.kind() == atomic_api::ErrorKind::Timeout => println!("Still running"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod bind;
mod job;
mod path;
mod resource;

pub mod resources;

pub use bind::{bind, bind_all, de};
pub use job::{Job, JobState, JobStatus};
pub use path::{build_path, SiteRef};
pub use resource::{Payload, ResourceClient};
