//! Handles for server-side asynchronous jobs.
//!
//! Operations such as site creation return immediately with a job
//! identifier; the work continues on the server. A [`Job`] observes that
//! work: [`Job::status`] performs one poll, [`Job::wait`] polls until the job
//! reaches a terminal state or a deadline passes.
//!
//! # State machine
//!
//! ```text
//! pending -> running -> { success | failed | error }
//! ```
//!
//! Any other status string is kept as [`JobState::Unknown`], which is never
//! terminal. Server spellings `queued`, `in-progress` and `failure` are read
//! as `pending`, `running` and `failed`.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! let mut job = client.sites().create(&new_site).await?;
//! let status = job.wait(Duration::from_secs(5), Duration::from_secs(600)).await?;
//! if status.state.is_success() {
//!     println!("Site ready");
//! }
//! ```

use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::Instant;

use crate::clients::{
    ApiError, HttpRequest, JobDescriptor, JobId, JobPolling, NormalizedPayload,
    PollRoute,
};
use crate::rest::ResourceClient;

/// Fields that may carry a job's state, in priority order.
const STATE_FIELDS: &[&str] = &["_status", "status", "state"];

/// The observed state of a job.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JobState {
    /// Accepted but not started (`pending`, `queued`).
    Pending,
    /// In progress (`running`, `in-progress`, `in_progress`).
    Running,
    /// Finished successfully.
    Success,
    /// Finished unsuccessfully (`failed`, `failure`).
    Failed,
    /// The server could not process the job.
    Error,
    /// A status the SDK does not recognise. Never terminal.
    Unknown(String),
}

impl JobState {
    /// Parses a server status string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use atomic_api::JobState;
    ///
    /// assert_eq!(JobState::parse("queued"), JobState::Pending);
    /// assert_eq!(JobState::parse("failure"), JobState::Failed);
    /// assert_eq!(JobState::parse("paused"), JobState::Unknown("paused".to_string()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "queued" => Self::Pending,
            "running" | "in-progress" | "in_progress" => Self::Running,
            "success" => Self::Success,
            "failed" | "failure" => Self::Failed,
            "error" => Self::Error,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    /// Returns `true` for `success`, `failed` and `error`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Error)
    }

    /// Returns `true` only for `success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the canonical tag, or the raw string for unknown states.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of a job's status.
#[derive(Clone, Debug, PartialEq)]
pub struct JobStatus {
    /// The observed state.
    pub state: JobState,
    /// Every field the server returned with the state.
    pub fields: Map<String, Value>,
}

impl JobStatus {
    /// Builds the initial snapshot from the fields of a creating response.
    fn initial(fields: Map<String, Value>) -> Self {
        let state = state_from(&fields).unwrap_or(JobState::Pending);
        Self { state, fields }
    }

    /// Reads a poll payload: a bare state string, or an object carrying the
    /// state in `_status`, `status` or `state`.
    fn from_payload(payload: Value) -> Result<Self, ApiError> {
        match payload {
            Value::String(raw) => Ok(Self {
                state: JobState::parse(&raw),
                fields: Map::new(),
            }),
            Value::Object(fields) => {
                let state = state_from(&fields).ok_or_else(|| {
                    ApiError::schema::<Self>(format!(
                        "no state field ({}) in job status",
                        STATE_FIELDS.join(", ")
                    ))
                })?;
                Ok(Self { state, fields })
            }
            other => Err(ApiError::schema::<Self>(format!(
                "expected a state string or object, got {other}"
            ))),
        }
    }

    /// Returns a status field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn state_from(fields: &Map<String, Value>) -> Option<JobState> {
    STATE_FIELDS
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(JobState::parse)
}

/// A handle on a server-side asynchronous job.
///
/// The identifier never changes, so every poll observes the same operation.
/// Polling mutates the cached snapshot and needs `&mut self`; share a job
/// across tasks behind a lock.
#[derive(Clone, Debug)]
pub struct Job {
    client: ResourceClient,
    id: JobId,
    polling: JobPolling,
    last: JobStatus,
}

impl Job {
    pub(crate) fn from_descriptor(client: ResourceClient, descriptor: JobDescriptor) -> Self {
        Self {
            client,
            id: descriptor.id,
            polling: descriptor.polling,
            last: JobStatus::initial(descriptor.fields),
        }
    }

    /// Re-attaches a handle to a job whose identifier is already known.
    #[must_use]
    pub fn attach(client: ResourceClient, id: JobId, route: PollRoute) -> Self {
        Self {
            client,
            id,
            polling: JobPolling::Pollable(route),
            last: JobStatus::initial(Map::new()),
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> &JobId {
        &self.id
    }

    /// Returns `true` if the server exposes status for this job.
    #[must_use]
    pub const fn is_pollable(&self) -> bool {
        matches!(self.polling, JobPolling::Pollable(_))
    }

    /// Returns the last observed snapshot without polling.
    #[must_use]
    pub const fn last_status(&self) -> &JobStatus {
        &self.last
    }

    /// Returns the last observed state without polling.
    #[must_use]
    pub const fn state(&self) -> &JobState {
        &self.last.state
    }

    fn route(&self, operation: &'static str) -> Result<&PollRoute, ApiError> {
        match &self.polling {
            JobPolling::Pollable(route) => Ok(route),
            JobPolling::FireAndForget => Err(ApiError::UnsupportedOperation {
                operation,
                job_id: self.id.to_string(),
            }),
        }
    }

    /// Polls the job once and returns the updated snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnsupportedOperation`] without any request for
    /// fire-and-forget jobs, the classified error if the poll fails, and
    /// [`ApiError::SchemaValidation`] if the poll payload carries no state.
    pub async fn status(&mut self) -> Result<&JobStatus, ApiError> {
        self.poll("status").await
    }

    async fn poll(&mut self, operation: &'static str) -> Result<&JobStatus, ApiError> {
        let route = self.route(operation)?;
        let request = HttpRequest::builder(route.method, route.path_for(self.id.as_str())).build()?;

        let payload = match self.client.send(&request).await? {
            NormalizedPayload::Value(value) => value,
            NormalizedPayload::Collection(items) => Value::Array(items),
            NormalizedPayload::Job(descriptor) => Value::Object(descriptor.fields),
        };

        self.last = JobStatus::from_payload(payload)?;
        tracing::debug!(job_id = %self.id, state = %self.last.state, "Polled job status");
        Ok(&self.last)
    }

    /// Polls until the job reaches a terminal state.
    ///
    /// Sleeps `poll_interval` between polls. When the next poll would start
    /// after `timeout` has elapsed, gives up with [`ApiError::Timeout`]
    /// carrying the last observed state; with `timeout < poll_interval` at
    /// most one poll is issued. Dropping the future stops local polling only.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] when the deadline is reached,
    /// [`ApiError::UnsupportedOperation`] for fire-and-forget jobs, and any
    /// poll error as soon as it happens.
    pub async fn wait(
        &mut self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<&JobStatus, ApiError> {
        let started = Instant::now();
        let deadline = started.checked_add(timeout);

        loop {
            let state = self.poll("wait").await?.state.clone();
            if state.is_terminal() {
                tracing::info!(job_id = %self.id, state = %state, "Job finished");
                return Ok(&self.last);
            }

            let past_deadline = deadline.is_some_and(|deadline| {
                Instant::now()
                    .checked_add(poll_interval)
                    .map_or(true, |next| next > deadline)
            });
            if past_deadline {
                return Err(ApiError::Timeout {
                    job_id: self.id.to_string(),
                    waited: started.elapsed(),
                    last_state: state,
                });
            }

            tokio::time::sleep(poll_interval).await;
        }
    }
}

// Verify Job is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Job>();
    assert_send_sync::<JobState>();
};
