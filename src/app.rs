use anyhow::Result;

use crate::domain::Theme;
use crate::persistence::{Storage, KEY_COMPLETED, KEY_STATS, KEY_THEME, KEY_TODO};
use crate::rewards::RewardLedger;
use crate::store::TaskStore;

/// Application context: owns the task store, the reward ledger and the
/// theme, plus the persistence gateway they are saved through.
///
/// Every mutating operation flags the blobs it touched and persists
/// them before returning, so a render after any operation always reads
/// post-save state. The flags are the change notifications of the
/// core: one per persisted list, set exactly when that list changed.
pub struct App {
    pub store: TaskStore,
    pub ledger: RewardLedger,
    pub theme: Theme,
    storage: Storage,
    tasks_changed: bool,
    completed_changed: bool,
    stats_changed: bool,
    theme_changed: bool,
}

impl App {
    /// Load all persisted state through `storage`. Missing or
    /// malformed blobs come back as defaults, never as errors.
    pub fn load(storage: Storage) -> Self {
        let store = TaskStore::new(storage.load_tasks(), storage.load_completed());
        let ledger = storage.load_stats();
        let theme = storage.load_theme();
        Self {
            store,
            ledger,
            theme,
            storage,
            tasks_changed: false,
            completed_changed: false,
            stats_changed: false,
            theme_changed: false,
        }
    }

    /// Append a new task. Returns false when the text was blank.
    pub fn add_task(&mut self, text: &str) -> Result<bool> {
        if self.store.add(text) {
            self.tasks_changed = true;
        }
        self.save()
    }

    /// Replace the text of the task at `index`.
    pub fn edit_task(&mut self, index: usize, new_text: &str) -> Result<bool> {
        if self.store.edit(index, new_text) {
            self.tasks_changed = true;
        }
        self.save()
    }

    /// Flip the completion state of the task at `index`, updating the
    /// reward ledger and moving the task between lists.
    pub fn toggle_task(&mut self, index: usize) -> Result<bool> {
        if self.store.toggle(index, &mut self.ledger) {
            self.tasks_changed = true;
            self.completed_changed = true;
            self.stats_changed = true;
        }
        self.save()
    }

    /// Delete the task at `index`, asking `confirm` first when the
    /// task isn't completed. A negative answer leaves all state
    /// untouched and nothing is written.
    pub fn delete_task(
        &mut self,
        index: usize,
        confirm: impl FnMut(&str) -> bool,
    ) -> Result<bool> {
        if self.store.delete(index, confirm) {
            self.tasks_changed = true;
        }
        self.save()
    }

    /// Delete every active task after confirmation.
    pub fn delete_all(&mut self, confirm: impl FnMut(&str) -> bool) -> Result<bool> {
        if self.store.delete_all(confirm) {
            self.tasks_changed = true;
        }
        self.save()
    }

    /// Move the task at `from` so it ends up at `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool> {
        if self.store.reorder(from, to) {
            self.tasks_changed = true;
        }
        self.save()
    }

    /// Move a completed task back to the top of the active list,
    /// revoking its XP.
    pub fn restore_completed(&mut self, index: usize) -> Result<bool> {
        if self.store.restore_completed(index, &mut self.ledger) {
            self.tasks_changed = true;
            self.completed_changed = true;
            self.stats_changed = true;
        }
        self.save()
    }

    /// Delete a completed task. No confirmation, no XP effect.
    pub fn delete_completed(&mut self, index: usize) -> Result<bool> {
        if self.store.delete_completed(index) {
            self.completed_changed = true;
        }
        self.save()
    }

    /// Empty the completed list after confirmation. XP is kept.
    pub fn clear_completed(&mut self, confirm: impl FnMut(&str) -> bool) -> Result<bool> {
        if self.store.clear_completed(confirm) {
            self.completed_changed = true;
        }
        self.save()
    }

    /// Update the persisted theme. Fields left as `None` keep their
    /// current value.
    pub fn set_theme(&mut self, name: Option<&str>, color: Option<&str>) -> Result<bool> {
        if let Some(name) = name {
            self.theme.name = name.to_string();
            self.theme_changed = true;
        }
        if let Some(color) = color {
            self.theme.color = color.to_string();
            self.theme_changed = true;
        }
        self.save()
    }

    /// Persist every blob touched since the last save, then clear the
    /// flags. Returns whether anything had changed.
    fn save(&mut self) -> Result<bool> {
        let changed = self.tasks_changed
            || self.completed_changed
            || self.stats_changed
            || self.theme_changed;

        if self.tasks_changed {
            self.storage.save(KEY_TODO, self.store.tasks())?;
            self.tasks_changed = false;
        }
        if self.completed_changed {
            self.storage.save(KEY_COMPLETED, self.store.completed())?;
            self.completed_changed = false;
        }
        if self.stats_changed {
            self.storage.save(KEY_STATS, &self.ledger)?;
            self.stats_changed = false;
        }
        if self.theme_changed {
            self.storage.save(KEY_THEME, &self.theme)?;
            self.theme_changed = false;
        }

        Ok(changed)
    }
}
