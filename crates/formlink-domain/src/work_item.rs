//! Work items as seen through the Task Store

/// A file attached to a work item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attachment {
    /// File name as shown in the Task Store (e.g. "form471.pdf")
    pub name: String,

    /// Declared type reported by the Task Store (e.g. "asana", "external")
    pub kind: Option<String>,

    /// Size in bytes, when reported
    pub size: Option<u64>,

    /// Retrieval locator for the attachment bytes
    pub download_url: Option<String>,
}

impl Attachment {
    /// Whether the attachment name ends with `.pdf` (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use formlink_domain::Attachment;
    ///
    /// let attachment = Attachment { name: "Form471.PDF".into(), ..Default::default() };
    /// assert!(attachment.is_pdf());
    /// ```
    pub fn is_pdf(&self) -> bool {
        self.name.to_lowercase().ends_with(".pdf")
    }
}

/// A tracked work item
///
/// Owned by the external Task Store. The core never mutates a `WorkItem`; it
/// issues commands against the store instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkItem {
    /// Task Store identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text notes (may embed document URLs)
    pub notes: String,

    /// Attachments in the order the Task Store returned them
    pub attachments: Vec<Attachment>,

    /// Name of the workflow category the item currently sits in
    pub category: Option<String>,

    /// Whether the Task Store marks the item as completed
    pub completed: bool,
}

impl WorkItem {
    /// Create a work item with only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the notes text
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Append an attachment
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Set the current category name
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A review record created beneath a work item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRecord {
    /// Display name of the child record
    pub name: String,

    /// Body text of the child record
    pub notes: String,
}
