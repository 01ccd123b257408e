//! Asana REST payloads.

use formlink_domain::{Attachment, WorkItem};
use serde::{Deserialize, Serialize};

/// Single-object response envelope
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Response payload
    pub data: T,
}

/// Request envelope
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<T> {
    /// Request payload
    pub data: T,
}

/// One page of a paginated collection
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    /// Records on this page
    pub data: Vec<T>,
    /// Cursor for the next page, absent on the last page
    #[serde(default)]
    pub next_page: Option<NextPage>,
}

/// Pagination cursor
#[derive(Debug, Deserialize)]
pub struct NextPage {
    /// Opaque offset token
    pub offset: String,
}

/// Compact reference to another resource
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    /// Global id
    pub gid: String,
    /// Display name, when requested
    #[serde(default)]
    pub name: Option<String>,
}

/// A project/section pair the task belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Membership {
    #[serde(default)]
    pub project: Option<ResourceRef>,
    #[serde(default)]
    pub section: Option<ResourceRef>,
}

/// Task record
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

impl TaskRecord {
    /// Section the task occupies in `project_id`
    ///
    /// Memberships that do not name a project are accepted as a fallback.
    pub fn section_in(&self, project_id: &str) -> Option<&ResourceRef> {
        let in_project = self.memberships.iter().find(|m| {
            m.section.is_some() && m.project.as_ref().is_some_and(|p| p.gid == project_id)
        });
        in_project
            .or_else(|| {
                self.memberships
                    .iter()
                    .find(|m| m.section.is_some() && m.project.is_none())
            })
            .and_then(|m| m.section.as_ref())
    }

    /// Convert into a domain work item
    pub fn into_work_item(self, project_id: &str, attachments: Vec<Attachment>) -> WorkItem {
        let category = self
            .section_in(project_id)
            .and_then(|s| s.name.clone());
        WorkItem {
            id: self.gid,
            name: self.name,
            notes: self.notes,
            attachments,
            category,
            completed: self.completed,
        }
    }
}

/// Attachment record
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resource_subtype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl From<AttachmentRecord> for Attachment {
    fn from(record: AttachmentRecord) -> Self {
        Attachment {
            name: record.name,
            kind: record.resource_subtype,
            size: record.size,
            download_url: record.download_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Section record
#[derive(Debug, Clone, Deserialize)]
pub struct SectionRecord {
    pub gid: String,
    #[serde(default)]
    pub name: String,
}

/// Project record (only the workspace is read)
#[derive(Debug, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub workspace: Option<ResourceRef>,
}

/// Body of `POST /sections/{gid}/addTask`
#[derive(Debug, Serialize)]
pub struct AddTaskBody<'a> {
    pub task: &'a str,
}

/// Body of `POST /tasks/{gid}/stories`
#[derive(Debug, Serialize)]
pub struct StoryBody<'a> {
    pub text: &'a str,
}

/// Body of `PUT /tasks/{gid}`
#[derive(Debug, Serialize)]
pub struct UpdateTaskBody {
    pub completed: bool,
}

/// Body of `POST /tasks` for a subtask
#[derive(Debug, Serialize)]
pub struct SubtaskBody<'a> {
    pub name: &'a str,
    pub notes: &'a str,
    pub parent: &'a str,
    pub workspace: &'a str,
}

/// Body of `POST /tasks` for a task placed in a project section
#[derive(Debug, Serialize)]
pub struct NewTaskBody<'a> {
    pub name: &'a str,
    pub notes: &'a str,
    pub projects: Vec<&'a str>,
    pub memberships: Vec<NewMembership<'a>>,
}

/// Project/section placement for a new task
#[derive(Debug, Serialize)]
pub struct NewMembership<'a> {
    pub project: &'a str,
    pub section: &'a str,
}

/// Record carrying only an id, as returned by create calls
#[derive(Debug, Deserialize)]
pub struct Created {
    pub gid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_page_parsing() {
        let json = r#"{
            "data": [
                {
                    "gid": "1201",
                    "name": "Test Form 471 with PDF URL",
                    "notes": "Form 471 URL: http://x/a.pdf",
                    "completed": false,
                    "memberships": [
                        { "project": { "gid": "900" }, "section": { "gid": "77", "name": "QA" } }
                    ]
                },
                { "gid": "1202" }
            ],
            "next_page": { "offset": "eyJ0", "path": "/projects/900/tasks?offset=eyJ0", "uri": "" }
        }"#;

        let page: Page<TaskRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.next_page.unwrap().offset, "eyJ0");
        assert_eq!(page.data[0].section_in("900").unwrap().gid, "77");
        assert!(page.data[1].notes.is_empty());
        assert!(page.data[1].section_in("900").is_none());
    }

    #[test]
    fn test_last_page_has_null_cursor() {
        let page: Page<SectionRecord> =
            serde_json::from_str(r#"{ "data": [], "next_page": null }"#).unwrap();
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_section_prefers_configured_project() {
        let json = r#"{
            "gid": "1",
            "memberships": [
                { "project": { "gid": "other" }, "section": { "gid": "5", "name": "Done" } },
                { "project": { "gid": "900" }, "section": { "gid": "6", "name": "QA" } }
            ]
        }"#;
        let task: TaskRecord = serde_json::from_str(json).unwrap();
        let item = task.into_work_item("900", vec![]);
        assert_eq!(item.category.as_deref(), Some("QA"));
    }

    #[test]
    fn test_attachment_conversion_drops_blank_url() {
        let json = r#"{ "name": "f.pdf", "resource_subtype": "asana", "size": 2048, "download_url": "" }"#;
        let attachment: Attachment = serde_json::from_str::<AttachmentRecord>(json).unwrap().into();
        assert_eq!(attachment.kind.as_deref(), Some("asana"));
        assert_eq!(attachment.size, Some(2048));
        assert!(attachment.download_url.is_none());
    }

    #[test]
    fn test_subtask_body_serialization() {
        let body = RequestEnvelope {
            data: SubtaskBody { name: "n", notes: "b", parent: "1", workspace: "2" },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["data"]["parent"], "1");
        assert_eq!(value["data"]["workspace"], "2");
    }
}
