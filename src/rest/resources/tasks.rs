//! Bulk tasks that iterate over every site of the client.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clients::ApiError;
use crate::rest::{build_path, de, ResourceClient};

use super::{missing, require};

/// The kind of work a task performs on each site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskKind {
    Software,
    SiteFindFiles,
    RunWpCliCommand,
}

impl TaskKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::SiteFindFiles => "site-find-files",
            Self::RunWpCliCommand => "run-wp-cli-command",
        }
    }
}

/// When the platform should send a webhook for per-site results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum WebhookPolicy {
    All,
    Success,
    Failure,
    #[default]
    None,
}

impl WebhookPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::None => "none",
        }
    }
}

/// Parameters for creating a task.
///
/// Each kind has one required input: software actions, a file pattern, or
/// WP-CLI arguments. Use the matching constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub kind: TaskKind,
    pub send_webhook_for: WebhookPolicy,
    pub site_count_limit: Option<u32>,
    pub software: BTreeMap<String, String>,
    pub pattern: Option<String>,
    pub args: Vec<String>,
}

impl NewTask {
    const fn empty(kind: TaskKind) -> Self {
        Self {
            kind,
            send_webhook_for: WebhookPolicy::None,
            site_count_limit: None,
            software: BTreeMap::new(),
            pattern: None,
            args: Vec::new(),
        }
    }

    /// A software task, e.g. `plugins/akismet/latest` to `activate`.
    #[must_use]
    pub fn software(actions: BTreeMap<String, String>) -> Self {
        Self {
            software: actions,
            ..Self::empty(TaskKind::Software)
        }
    }

    /// A task that searches every site for files matching `pattern`.
    #[must_use]
    pub fn find_files(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::empty(TaskKind::SiteFindFiles)
        }
    }

    /// A task that runs `wp` with `args` on every site.
    #[must_use]
    pub fn wp_cli<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::empty(TaskKind::RunWpCliCommand)
        }
    }

    #[must_use]
    pub const fn send_webhook_for(mut self, policy: WebhookPolicy) -> Self {
        self.send_webhook_for = policy;
        self
    }

    /// Caps how many sites the task touches. `0` means no limit.
    #[must_use]
    pub const fn site_count_limit(mut self, limit: u32) -> Self {
        self.site_count_limit = Some(limit);
        self
    }

    fn to_form(&self) -> Result<Vec<(String, String)>, ApiError> {
        let mut fields = vec![(
            "send_webhook_for".to_string(),
            self.send_webhook_for.as_str().to_string(),
        )];
        if let Some(limit) = self.site_count_limit.filter(|&limit| limit > 0) {
            fields.push(("site_count_limit".to_string(), limit.to_string()));
        }
        match self.kind {
            TaskKind::Software => {
                if self.software.is_empty() {
                    return Err(missing("software"));
                }
                fields.extend(
                    self.software
                        .iter()
                        .map(|(slug, action)| (format!("software[{slug}]"), action.clone())),
                );
            }
            TaskKind::SiteFindFiles => {
                let pattern = self.pattern.as_deref().unwrap_or_default();
                require("pattern", pattern)?;
                fields.push(("pattern".to_string(), pattern.to_string()));
            }
            TaskKind::RunWpCliCommand => {
                if self.args.is_empty() {
                    return Err(missing("args"));
                }
                fields.extend(self.args.iter().map(|arg| ("args[]".to_string(), arg.clone())));
            }
        }
        Ok(fields)
    }
}

/// The response to a task creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskCreation {
    pub task_id: u64,
    pub initial_task_manager_id: u64,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub task_id: u64,
    #[serde(rename = "client_id", default)]
    pub atomic_client_id: Option<u64>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "de::optional_timestamp")]
    pub created: Option<DateTime<Utc>>,
    /// Unset until the task finishes.
    #[serde(default, deserialize_with = "de::optional_timestamp")]
    pub complete: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(flatten)]
    pub unknown: Map<String, Value>,
}

impl Task {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete.is_some()
    }
}

/// Client for the task endpoints.
#[derive(Clone, Debug)]
pub struct TasksClient {
    client: ResourceClient,
}

impl TasksClient {
    pub(crate) const fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    /// Starts a task over the client's sites.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHttpRequest`] when the input required by
    /// the task kind is missing, or any pipeline error.
    pub async fn create(&self, task: &NewTask) -> Result<TaskCreation, ApiError> {
        let fields = task.to_form()?;
        let path = build_path(
            "/task-create/{client}/{kind}",
            &[("client", self.client.client_id()), ("kind", task.kind.as_str())],
        );
        let request = fields
            .into_iter()
            .fold(self.client.post(path), |request, (key, value)| {
                request.form_field(key, value)
            });
        let created: TaskCreation = self.client.fetch(request).await?;
        tracing::info!(task_id = created.task_id, kind = task.kind.as_str(), "Task created");
        Ok(created)
    }

    /// Fetches a task's details and progress.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn get(&self, task_id: u64) -> Result<Task, ApiError> {
        let path = build_path("/task-get/{task}", &[("task", task_id)]);
        self.client.fetch(self.client.post(path)).await
    }

    /// Interrupts an incomplete task.
    ///
    /// # Errors
    ///
    /// Returns any pipeline error.
    pub async fn interrupt(&self, task_id: u64) -> Result<Value, ApiError> {
        let path = build_path("/task-interrupt/{task}", &[("task", task_id)]);
        self.client.fetch(self.client.post(path)).await
    }
}
