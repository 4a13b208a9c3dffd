//! In-memory watch-status and custom-list state.
//!
//! Every category owns exactly four [`StatusBucket`]s, one per [`StatusLabel`],
//! and up to [`MAX_CUSTOM_LISTS`] [`CustomList`]s. A media id sits in at most
//! one status bucket of a category at a time; custom lists carry no such
//! restriction.

use orrin_models::{CustomList, MediaCategory, MediaItem, StatusBucket, StatusLabel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::ListError;

/// Hard cap on custom lists per category
pub const MAX_CUSTOM_LISTS: usize = 12;

/// How custom list names are policed on create and rename
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListNamePolicy {
    /// Several lists may share a name; item ops and delete reach all of them, rename the first
    #[default]
    AllowDuplicates,
    /// A name may be used by at most one list per category
    Unique,
}

/// Status buckets and custom lists of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryLists {
    #[serde(default)]
    statuses: Vec<StatusBucket>,
    #[serde(default)]
    custom_lists: Vec<CustomList>,
}

impl CategoryLists {
    fn new() -> Self {
        Self {
            statuses: StatusLabel::ALL.iter().map(|label| StatusBucket::new(*label)).collect(),
            custom_lists: Vec::new(),
        }
    }

    pub fn statuses(&self) -> &[StatusBucket] {
        &self.statuses
    }

    pub fn custom_lists(&self) -> &[CustomList] {
        &self.custom_lists
    }

    fn bucket_mut(&mut self, status: StatusLabel) -> Result<&mut StatusBucket, ListError> {
        self.statuses
            .iter_mut()
            .find(|bucket| bucket.label() == status)
            .ok_or_else(|| ListError::InvalidArgument(format!("unknown status bucket: {}", status)))
    }

    fn custom_list_mut(&mut self, name: &str) -> Option<&mut CustomList> {
        self.custom_lists.iter_mut().find(|list| list.name() == name)
    }

    fn has_custom_list(&self, name: &str) -> bool {
        self.custom_lists.iter().any(|list| list.name() == name)
    }
}

/// Owner of all list state. All mutation goes through the methods below so the
/// per-category invariants hold after every call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListStore {
    categories: BTreeMap<MediaCategory, CategoryLists>,
    name_policy: ListNamePolicy,
}

impl ListStore {
    /// Create a store with four empty buckets and no custom lists per category
    pub fn new() -> Self {
        let categories = MediaCategory::ALL
            .iter()
            .map(|category| (*category, CategoryLists::new()))
            .collect();

        Self {
            categories,
            name_policy: ListNamePolicy::default(),
        }
    }

    pub fn with_name_policy(mut self, policy: ListNamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    pub fn name_policy(&self) -> ListNamePolicy {
        self.name_policy
    }

    fn lists(&self, category: MediaCategory) -> Option<&CategoryLists> {
        self.categories.get(&category)
    }

    fn lists_mut(&mut self, category: MediaCategory) -> Result<&mut CategoryLists, ListError> {
        self.categories
            .get_mut(&category)
            .ok_or_else(|| ListError::InvalidArgument(format!("unknown category: {}", category)))
    }

    /// Iterate every category with its lists, in [`MediaCategory::ALL`] order
    pub fn categories(&self) -> impl Iterator<Item = (MediaCategory, &CategoryLists)> {
        self.categories.iter().map(|(category, lists)| (*category, lists))
    }

    // ---- status buckets ----

    /// Put `item` in the `status` bucket of `category`, taking it out of the
    /// other three buckets first.
    ///
    /// Returns `true` when the item was inserted and `false` when the target
    /// bucket already held it. Either way no other bucket of the category
    /// holds the id afterwards.
    pub fn move_to_status(
        &mut self,
        category: MediaCategory,
        status: StatusLabel,
        item: MediaItem,
    ) -> Result<bool, ListError> {
        let lists = self.lists_mut(category)?;
        // Validate the target before touching anything
        lists.bucket_mut(status)?;

        for bucket in lists.statuses.iter_mut().filter(|bucket| bucket.label() != status) {
            if bucket.remove(&item.id) {
                debug!(%category, from = %bucket.label(), to = %status, id = %item.id, "Moved item out of status bucket");
            }
        }

        let id = item.id.clone();
        let inserted = lists.bucket_mut(status)?.insert(item);
        if inserted {
            debug!(%category, %status, %id, "Added item to status bucket");
        } else {
            debug!(%category, %status, %id, "Item already in status bucket");
        }
        Ok(inserted)
    }

    /// Drop `item_id` from one bucket; absent ids are not an error
    pub fn remove_from_status(
        &mut self,
        category: MediaCategory,
        status: StatusLabel,
        item_id: &str,
    ) -> Result<bool, ListError> {
        let removed = self.lists_mut(category)?.bucket_mut(status)?.remove(item_id);
        debug!(%category, %status, id = item_id, removed, "Remove from status bucket");
        Ok(removed)
    }

    pub fn status_buckets(&self, category: MediaCategory) -> &[StatusBucket] {
        self.lists(category).map(|lists| lists.statuses()).unwrap_or(&[])
    }

    pub fn bucket(&self, category: MediaCategory, status: StatusLabel) -> Option<&StatusBucket> {
        self.status_buckets(category).iter().find(|bucket| bucket.label() == status)
    }

    /// Current status of an item, `None` for the initial no-status state
    pub fn status_of(&self, category: MediaCategory, item_id: &str) -> Option<StatusLabel> {
        self.status_buckets(category)
            .iter()
            .find(|bucket| bucket.contains(item_id))
            .map(|bucket| bucket.label())
    }

    // ---- custom lists ----

    /// Append an empty custom list under the trimmed `name`.
    ///
    /// Fails with [`ListError::CapacityExceeded`] once the category holds
    /// [`MAX_CUSTOM_LISTS`] lists, leaving state untouched. The cap is checked
    /// before the name.
    pub fn create_custom_list(
        &mut self,
        category: MediaCategory,
        name: impl Into<String>,
    ) -> Result<(), ListError> {
        let name = name.into().trim().to_string();
        let policy = self.name_policy;
        let lists = self.lists_mut(category)?;

        if lists.custom_lists.len() >= MAX_CUSTOM_LISTS {
            warn!(%category, name = %name, "Custom list limit of {} reached, not creating list", MAX_CUSTOM_LISTS);
            return Err(ListError::CapacityExceeded { category, limit: MAX_CUSTOM_LISTS });
        }

        if name.is_empty() {
            return Err(ListError::InvalidArgument("custom list name cannot be empty".to_string()));
        }

        if policy == ListNamePolicy::Unique && lists.has_custom_list(&name) {
            return Err(ListError::DuplicateName { category, name });
        }

        debug!(%category, name = %name, "Created custom list");
        lists.custom_lists.push(CustomList::new(name));
        Ok(())
    }

    /// Rename the first list called `old_name`, keeping its items.
    ///
    /// The new name is trimmed and must not be blank. Returns `false` when no
    /// list matches.
    pub fn rename_custom_list(
        &mut self,
        category: MediaCategory,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool, ListError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(ListError::InvalidArgument("custom list name cannot be empty".to_string()));
        }

        let policy = self.name_policy;
        let lists = self.lists_mut(category)?;

        if !lists.has_custom_list(old_name) {
            debug!(%category, name = old_name, "No custom list to rename");
            return Ok(false);
        }

        if policy == ListNamePolicy::Unique && new_name != old_name && lists.has_custom_list(new_name) {
            return Err(ListError::DuplicateName { category, name: new_name.to_string() });
        }

        if let Some(list) = lists.custom_list_mut(old_name) {
            list.rename(new_name);
            debug!(%category, from = old_name, to = new_name, "Renamed custom list");
        }
        Ok(true)
    }

    /// Remove every list called `name` with its membership, returning how many went
    pub fn delete_custom_list(&mut self, category: MediaCategory, name: &str) -> Result<usize, ListError> {
        let lists = self.lists_mut(category)?;
        let before = lists.custom_lists.len();
        lists.custom_lists.retain(|list| list.name() != name);
        let removed = before - lists.custom_lists.len();
        debug!(%category, name, removed, "Deleted custom list");
        Ok(removed)
    }

    /// Add a copy of `item` to every list called `name`.
    ///
    /// Returns `false` if no such list exists or every match already holds the id.
    pub fn add_to_custom_list(
        &mut self,
        category: MediaCategory,
        name: &str,
        item: MediaItem,
    ) -> Result<bool, ListError> {
        let lists = self.lists_mut(category)?;
        if !lists.has_custom_list(name) {
            warn!(%category, list = name, id = %item.id, "Custom list not found, item not added");
            return Ok(false);
        }

        let mut inserted = false;
        for list in lists.custom_lists.iter_mut().filter(|list| list.name() == name) {
            inserted |= list.insert(item.clone());
        }
        debug!(%category, list = name, id = %item.id, inserted, "Add to custom list");
        Ok(inserted)
    }

    /// Drop `item_id` from every list called `name`
    pub fn remove_from_custom_list(
        &mut self,
        category: MediaCategory,
        name: &str,
        item_id: &str,
    ) -> Result<bool, ListError> {
        let mut removed = false;
        for list in self
            .lists_mut(category)?
            .custom_lists
            .iter_mut()
            .filter(|list| list.name() == name)
        {
            removed |= list.remove(item_id);
        }
        debug!(%category, list = name, id = item_id, removed, "Remove from custom list");
        Ok(removed)
    }

    /// Fill the most recently created list of `category`. Used when replaying a
    /// snapshot, where names alone cannot tell duplicate-named lists apart.
    pub(crate) fn restore_custom_list_items(&mut self, category: MediaCategory, items: &[MediaItem]) {
        if let Ok(lists) = self.lists_mut(category) {
            if let Some(list) = lists.custom_lists.last_mut() {
                for item in items {
                    list.insert(item.clone());
                }
            }
        }
    }

    pub fn custom_lists(&self, category: MediaCategory) -> &[CustomList] {
        self.lists(category).map(|lists| lists.custom_lists()).unwrap_or(&[])
    }

    /// First custom list with this name
    pub fn custom_list(&self, category: MediaCategory, name: &str) -> Option<&CustomList> {
        self.custom_lists(category).iter().find(|list| list.name() == name)
    }

    /// Names of the custom lists holding `item_id`, in list order
    pub fn custom_lists_containing(&self, category: MediaCategory, item_id: &str) -> Vec<&str> {
        self.custom_lists(category)
            .iter()
            .filter(|list| list.contains(item_id))
            .map(|list| list.name())
            .collect()
    }

    /// Name the "create list" action uses: `"{prefix} {n + 1}"`
    pub fn next_default_list_name(&self, category: MediaCategory, prefix: &str) -> String {
        format!("{} {}", prefix, self.custom_lists(category).len() + 1)
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}
