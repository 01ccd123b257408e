//! In-memory Task Store.
//!
//! Categories are plain names. Every mutation is recorded so tests can
//! assert on what the pipeline did.

use crate::error::TaskStoreError;
use formlink_domain::traits::TaskStore;
use formlink_domain::{CategorySelector, ChildRecord, WorkItem};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    categories: Vec<String>,
    items: Vec<WorkItem>,
    notes: HashMap<String, Vec<String>>,
    children: HashMap<String, Vec<ChildRecord>>,
    moves: Vec<(String, String)>,
    fail_moves: bool,
    next_id: u64,
}

/// Thread-safe in-memory store
///
/// Clones share state.
///
/// # Examples
///
/// ```
/// use formlink_tasks::InMemoryTaskStore;
/// use formlink_domain::WorkItem;
///
/// let store = InMemoryTaskStore::with_categories(["QA", "QA – Issues"]);
/// store.insert(WorkItem::new("1", "task").in_category("QA"));
/// assert_eq!(store.item("1").unwrap().category.as_deref(), Some("QA"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTaskStore {
    /// Create a store with no categories and no items
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given category names
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store.lock().categories = categories.into_iter().map(Into::into).collect();
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means another test thread panicked
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add or replace an item
    pub fn insert(&self, item: WorkItem) {
        let mut inner = self.lock();
        inner.items.retain(|i| i.id != item.id);
        inner.items.push(item);
    }

    /// Make every category move fail
    pub fn fail_moves(&self, fail: bool) {
        self.lock().fail_moves = fail;
    }

    /// Current state of an item
    pub fn item(&self, id: &str) -> Option<WorkItem> {
        self.lock().items.iter().find(|i| i.id == id).cloned()
    }

    /// Audit notes appended to an item, in order
    pub fn notes(&self, id: &str) -> Vec<String> {
        self.lock().notes.get(id).cloned().unwrap_or_default()
    }

    /// Child records created under an item
    pub fn children(&self, id: &str) -> Vec<ChildRecord> {
        self.lock().children.get(id).cloned().unwrap_or_default()
    }

    /// Every successful move as `(item id, category name)`
    pub fn moves(&self) -> Vec<(String, String)> {
        self.lock().moves.clone()
    }

    fn resolve(inner: &Inner, category: &CategorySelector) -> Result<String, TaskStoreError> {
        inner
            .categories
            .iter()
            .find(|name| match category {
                CategorySelector::Id(id) => *name == id,
                _ => category.matches_name(name),
            })
            .cloned()
            .ok_or_else(|| TaskStoreError::CategoryNotFound(category.to_string()))
    }
}

fn missing(id: &str) -> TaskStoreError {
    TaskStoreError::NotFound(id.to_string())
}

impl TaskStore for InMemoryTaskStore {
    type Error = TaskStoreError;

    async fn list_items_in_category(
        &self,
        category: &CategorySelector,
    ) -> Result<Vec<WorkItem>, Self::Error> {
        let inner = self.lock();
        let name = Self::resolve(&inner, category)?;
        Ok(inner
            .items
            .iter()
            .filter(|i| i.category.as_deref() == Some(name.as_str()))
            .cloned()
            .collect())
    }

    async fn get_item(&self, id: &str) -> Result<WorkItem, Self::Error> {
        self.item(id).ok_or_else(|| missing(id))
    }

    async fn move_item_to_category(
        &self,
        id: &str,
        category: &CategorySelector,
    ) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        if inner.fail_moves {
            return Err(TaskStoreError::Injected(format!("move of {} refused", id)));
        }
        let name = Self::resolve(&inner, category)?;
        let item = inner
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| missing(id))?;
        item.category = Some(name.clone());
        inner.moves.push((id.to_string(), name));
        Ok(())
    }

    async fn add_audit_note(&self, id: &str, text: &str) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        if !inner.items.iter().any(|i| i.id == id) {
            return Err(missing(id));
        }
        inner
            .notes
            .entry(id.to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        let item = inner
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| missing(id))?;
        item.completed = completed;
        Ok(())
    }

    async fn create_child_record(
        &self,
        parent_id: &str,
        record: &ChildRecord,
    ) -> Result<String, Self::Error> {
        let mut inner = self.lock();
        if !inner.items.iter().any(|i| i.id == parent_id) {
            return Err(missing(parent_id));
        }
        inner.next_id += 1;
        let id = format!("child-{}", inner.next_id);
        inner
            .children
            .entry(parent_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(id)
    }

    async fn create_item_in_category(
        &self,
        category: &CategorySelector,
        name: &str,
        notes: &str,
    ) -> Result<String, Self::Error> {
        let mut inner = self.lock();
        let category = Self::resolve(&inner, category)?;
        inner.next_id += 1;
        let id = format!("item-{}", inner.next_id);
        inner
            .items
            .push(WorkItem::new(&id, name).with_notes(notes).in_category(category));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryTaskStore {
        let store = InMemoryTaskStore::with_categories(["QA", "QA – Processing", "QA – Issues"]);
        store.insert(WorkItem::new("1", "first").in_category("QA"));
        store.insert(WorkItem::new("2", "second").in_category("QA – Issues"));
        store
    }

    #[tokio::test]
    async fn test_list_uses_selector() {
        let store = store();
        let backlog = store
            .list_items_in_category(&CategorySelector::Exact("qa".into()))
            .await
            .unwrap();
        assert_eq!(backlog.len(), 1);
        assert_eq!(backlog[0].id, "1");
    }

    #[tokio::test]
    async fn test_move_records_and_updates_category() {
        let store = store();
        store
            .move_item_to_category("1", &CategorySelector::keywords(["qa", "processing"]))
            .await
            .unwrap();

        assert_eq!(store.item("1").unwrap().category.as_deref(), Some("QA – Processing"));
        assert_eq!(store.moves(), vec![("1".to_string(), "QA – Processing".to_string())]);
    }

    #[tokio::test]
    async fn test_injected_move_failure() {
        let store = store();
        store.fail_moves(true);
        let result = store
            .move_item_to_category("1", &CategorySelector::Exact("QA – Issues".into()))
            .await;
        assert!(matches!(result, Err(TaskStoreError::Injected(_))));
        assert_eq!(store.item("1").unwrap().category.as_deref(), Some("QA"));
    }

    #[tokio::test]
    async fn test_missing_category_and_item() {
        let store = store();
        let result = store
            .move_item_to_category("1", &CategorySelector::keywords(["manual"]))
            .await;
        assert!(matches!(result, Err(TaskStoreError::CategoryNotFound(_))));

        let result = store.add_audit_note("404", "x").await;
        assert!(matches!(result, Err(TaskStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_children_and_created_items() {
        let store = store();
        let child = ChildRecord { name: "review".into(), notes: "n".into() };
        store.create_child_record("1", &child).await.unwrap();
        let id = store
            .create_item_in_category(&CategorySelector::Exact("QA".into()), "seeded", "notes")
            .await
            .unwrap();

        assert_eq!(store.children("1"), vec![child]);
        assert_eq!(store.item(&id).unwrap().notes, "notes");
    }
}
