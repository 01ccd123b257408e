//! Workflow categories and how to find them in the Task Store

use std::fmt;

/// The categories the workflow moves items between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowCategory {
    /// Items awaiting automated processing
    Backlog,
    /// Items picked up by the pipeline
    Processing,
    /// Items needing a human to find the Form 470
    ManualFollowup,
    /// Items the pipeline could not handle
    Issues,
}

impl WorkflowCategory {
    /// Human-readable label for logs and notes
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowCategory::Backlog => "Backlog",
            WorkflowCategory::Processing => "Processing",
            WorkflowCategory::ManualFollowup => "Manual Follow-up Required",
            WorkflowCategory::Issues => "Issues",
        }
    }
}

impl fmt::Display for WorkflowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule for locating a category among the Task Store's categories
///
/// Category names are human-editable, so a stable identifier is preferred
/// when one is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// Match the category identifier exactly
    Id(String),

    /// Match the whole name, case-insensitively
    Exact(String),

    /// Match names containing every keyword, case-insensitively
    Keywords(Vec<String>),
}

impl CategorySelector {
    /// Build a keyword selector
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategorySelector::Keywords(keywords.into_iter().map(Into::into).collect())
    }

    /// Whether a category with the given id and name satisfies the selector
    ///
    /// # Examples
    ///
    /// ```
    /// use formlink_domain::CategorySelector;
    ///
    /// let selector = CategorySelector::keywords(["qa", "processing"]);
    /// assert!(selector.matches("1", "QA – Processing"));
    /// assert!(!selector.matches("2", "QA"));
    /// ```
    pub fn matches(&self, id: &str, name: &str) -> bool {
        match self {
            CategorySelector::Id(expected) => id == expected,
            CategorySelector::Exact(expected) => {
                name.trim().to_lowercase() == expected.trim().to_lowercase()
            }
            CategorySelector::Keywords(keywords) => {
                if keywords.is_empty() {
                    return false;
                }
                let name = name.to_lowercase();
                keywords.iter().all(|k| name.contains(&k.to_lowercase()))
            }
        }
    }

    /// Whether a category name satisfies the selector (ids never match by name)
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            CategorySelector::Id(_) => false,
            _ => self.matches("", name),
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::Id(id) => write!(f, "id {}", id),
            CategorySelector::Exact(name) => write!(f, "'{}'", name),
            CategorySelector::Keywords(keywords) => write!(f, "name containing {:?}", keywords),
        }
    }
}
