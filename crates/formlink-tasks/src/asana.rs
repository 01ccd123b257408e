//! Asana-backed Task Store.
//!
//! Sections of one project act as workflow categories, stories as audit
//! notes and subtasks as child records.

use crate::error::TaskStoreError;
use crate::wire::{
    AddTaskBody, AttachmentRecord, Created, Envelope, NewMembership, NewTaskBody, Page,
    ProjectRecord, RequestEnvelope, SectionRecord, StoryBody, SubtaskBody, TaskRecord,
    UpdateTaskBody,
};
use formlink_domain::traits::TaskStore;
use formlink_domain::{Attachment, CategorySelector, ChildRecord, WorkItem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

/// Page size used for collection requests
const PAGE_LIMIT: &str = "100";

const TASK_FIELDS: &str =
    "name,notes,completed,memberships.project.gid,memberships.section.gid,memberships.section.name";

const ATTACHMENT_FIELDS: &str = "name,resource_subtype,size,download_url";

/// Task Store client for one Asana project
pub struct AsanaTaskStore {
    base_url: String,
    access_token: String,
    project_id: String,
    client: reqwest::Client,
    workspace: OnceCell<String>,
}

impl AsanaTaskStore {
    /// Create a client for `project_id` authenticated with a personal access token
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        project_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TaskStoreError> {
        let access_token = access_token.into();
        let project_id = project_id.into();
        if access_token.trim().is_empty() {
            return Err(TaskStoreError::Config("access token is empty".to_string()));
        }
        if project_id.trim().is_empty() {
            return Err(TaskStoreError::Config("project id is empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TaskStoreError::Config(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
            project_id,
            client,
            workspace: OnceCell::new(),
        })
    }

    /// Project whose sections this store manages
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TaskStoreError> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TaskStoreError::from_status(status.as_u16(), message));
        }
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TaskStoreError> {
        let envelope: Envelope<T> = self.send(self.client.get(self.url(path)).query(query)).await?;
        Ok(envelope.data)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: B,
    ) -> Result<T, TaskStoreError> {
        let request = self
            .client
            .post(self.url(path))
            .json(&RequestEnvelope { data: body });
        let envelope: Envelope<T> = self.send(request).await?;
        Ok(envelope.data)
    }

    /// Follow `next_page.offset` until the collection is exhausted
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, TaskStoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut params: Vec<(&str, &str)> = query.to_vec();
            params.push(("limit", PAGE_LIMIT));
            if let Some(offset) = offset.as_deref() {
                params.push(("offset", offset));
            }

            let page: Page<T> = self
                .send(self.client.get(self.url(path)).query(&params))
                .await?;
            records.extend(page.data);

            match page.next_page {
                Some(next) => offset = Some(next.offset),
                None => break,
            }
        }

        Ok(records)
    }

    async fn attachments(&self, task_id: &str) -> Result<Vec<Attachment>, TaskStoreError> {
        let records: Vec<AttachmentRecord> = self
            .get_all(
                "/attachments",
                &[("parent", task_id), ("opt_fields", ATTACHMENT_FIELDS)],
            )
            .await?;
        debug!("Task {} has {} attachments", task_id, records.len());
        Ok(records.into_iter().map(Attachment::from).collect())
    }

    /// Sections of the project, in board order
    async fn sections(&self) -> Result<Vec<SectionRecord>, TaskStoreError> {
        self.get_all(&format!("/projects/{}/sections", self.project_id), &[])
            .await
    }

    /// Resolve a selector to a section id
    async fn resolve_section(
        &self,
        category: &CategorySelector,
    ) -> Result<String, TaskStoreError> {
        if let CategorySelector::Id(id) = category {
            return Ok(id.clone());
        }
        self.sections()
            .await?
            .into_iter()
            .find(|s| category.matches(&s.gid, &s.name))
            .map(|s| s.gid)
            .ok_or_else(|| TaskStoreError::CategoryNotFound(category.to_string()))
    }

    /// Workspace of the project, fetched once
    async fn workspace_id(&self) -> Result<&str, TaskStoreError> {
        let workspace = self
            .workspace
            .get_or_try_init(|| async {
                let project: ProjectRecord = self
                    .get(
                        &format!("/projects/{}", self.project_id),
                        &[("opt_fields", "workspace")],
                    )
                    .await?;
                project.workspace.map(|w| w.gid).ok_or_else(|| {
                    TaskStoreError::InvalidResponse("project has no workspace".to_string())
                })
            })
            .await?;
        Ok(workspace.as_str())
    }
}

impl TaskStore for AsanaTaskStore {
    type Error = TaskStoreError;

    async fn list_items_in_category(
        &self,
        category: &CategorySelector,
    ) -> Result<Vec<WorkItem>, Self::Error> {
        let tasks: Vec<TaskRecord> = self
            .get_all(
                &format!("/projects/{}/tasks", self.project_id),
                &[("opt_fields", TASK_FIELDS)],
            )
            .await?;

        let mut items = Vec::new();
        for task in tasks {
            let selected = task
                .section_in(&self.project_id)
                .is_some_and(|s| category.matches(&s.gid, s.name.as_deref().unwrap_or_default()));
            if !selected {
                continue;
            }
            let attachments = self.attachments(&task.gid).await?;
            items.push(task.into_work_item(&self.project_id, attachments));
        }

        info!("Found {} items in category {}", items.len(), category);
        Ok(items)
    }

    async fn get_item(&self, id: &str) -> Result<WorkItem, Self::Error> {
        let task: TaskRecord = self
            .get(&format!("/tasks/{}", id), &[("opt_fields", TASK_FIELDS)])
            .await?;
        let attachments = self.attachments(id).await?;
        Ok(task.into_work_item(&self.project_id, attachments))
    }

    async fn move_item_to_category(
        &self,
        id: &str,
        category: &CategorySelector,
    ) -> Result<(), Self::Error> {
        let section = self.resolve_section(category).await?;
        let _: serde_json::Value = self
            .post(&format!("/sections/{}/addTask", section), AddTaskBody { task: id })
            .await?;
        debug!("Moved task {} to section {}", id, section);
        Ok(())
    }

    async fn add_audit_note(&self, id: &str, text: &str) -> Result<(), Self::Error> {
        let _: serde_json::Value = self
            .post(&format!("/tasks/{}/stories", id), StoryBody { text })
            .await?;
        Ok(())
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<(), Self::Error> {
        let request = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(&RequestEnvelope { data: UpdateTaskBody { completed } });
        let _: Envelope<serde_json::Value> = self.send(request).await?;
        Ok(())
    }

    async fn create_child_record(
        &self,
        parent_id: &str,
        record: &ChildRecord,
    ) -> Result<String, Self::Error> {
        let workspace = self.workspace_id().await?;
        let created: Created = self
            .post(
                "/tasks",
                SubtaskBody {
                    name: &record.name,
                    notes: &record.notes,
                    parent: parent_id,
                    workspace,
                },
            )
            .await?;
        Ok(created.gid)
    }

    async fn create_item_in_category(
        &self,
        category: &CategorySelector,
        name: &str,
        notes: &str,
    ) -> Result<String, Self::Error> {
        let section = self.resolve_section(category).await?;
        let created: Created = self
            .post(
                "/tasks",
                NewTaskBody {
                    name,
                    notes,
                    projects: vec![&self.project_id],
                    memberships: vec![NewMembership {
                        project: &self.project_id,
                        section: &section,
                    }],
                },
            )
            .await?;
        Ok(created.gid)
    }
}
