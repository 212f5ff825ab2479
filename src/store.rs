use crate::domain::Task;
use crate::rewards::RewardLedger;
use tracing::{debug, warn};

/// Prompt shown before deleting a task that isn't completed yet.
pub const DELETE_INCOMPLETE_PROMPT: &str =
    "This task isn't completed yet. Are you sure you want to delete it?";

/// Prompt shown before deleting every active task.
pub const DELETE_ALL_PROMPT: &str = "Delete all tasks?";

/// Prompt shown before emptying the completed list.
pub const CLEAR_COMPLETED_PROMPT: &str = "Clear the completed list? (XP is kept)";

/// Owns the active task list and the completed-task archive. Every
/// mutation to either list goes through these operations; out-of-range
/// indices are no-ops.
///
/// Operations return true when state changed, so callers know which
/// blobs to persist and re-render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStore {
    tasks: Vec<Task>,
    completed: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>, completed: Vec<Task>) -> Self {
        Self { tasks, completed }
    }

    /// Active tasks, insertion order = display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Completed tasks, most recently completed first.
    pub fn completed(&self) -> &[Task] {
        &self.completed
    }

    /// First incomplete task, falling back to the first task. Used by
    /// focus mode to pick a target.
    pub fn first_incomplete(&self) -> Option<&Task> {
        self.tasks
            .iter()
            .find(|t| !t.completed)
            .or_else(|| self.tasks.first())
    }

    /// Append a new task. No-op when the text trims to empty.
    pub fn add(&mut self, text: &str) -> bool {
        match Task::new(text) {
            Some(task) => {
                self.tasks.push(task);
                true
            }
            None => {
                debug!("add: ignoring blank task text");
                false
            }
        }
    }

    /// Replace the text of the task at `index`. No-op when the new
    /// text trims to empty or the index is out of range.
    pub fn edit(&mut self, index: usize, new_text: &str) -> bool {
        let Some(task) = self.tasks.get_mut(index) else {
            warn!(index, "edit: no active task at index");
            return false;
        };
        task.rename(new_text)
    }

    /// Flip the completion state of the active task at `index`.
    ///
    /// Completing awards XP through `ledger` (at most once per task),
    /// stamps the completion time and moves the task to the front of
    /// the completed list. The reverse flip only exists for legacy
    /// blobs that kept completed tasks in the active list; it reopens
    /// the task in place and revokes its XP.
    pub fn toggle(&mut self, index: usize, ledger: &mut RewardLedger) -> bool {
        let Some(task) = self.tasks.get_mut(index) else {
            warn!(index, "toggle: no active task at index");
            return false;
        };
        if task.completed {
            ledger.revoke(task);
            task.reopen();
        } else {
            task.complete();
            ledger.award(task);
            let task = self.tasks.remove(index);
            self.completed.insert(0, task);
        }
        true
    }

    /// Delete the active task at `index`. Incomplete tasks need an
    /// affirmative answer from `confirm`; completed ones delete
    /// immediately. XP is unaffected either way.
    pub fn delete(&mut self, index: usize, mut confirm: impl FnMut(&str) -> bool) -> bool {
        let Some(task) = self.tasks.get(index) else {
            warn!(index, "delete: no active task at index");
            return false;
        };
        if !task.completed && !confirm(DELETE_INCOMPLETE_PROMPT) {
            return false;
        }
        self.tasks.remove(index);
        true
    }

    /// Delete every active task. The completed list and XP are
    /// untouched.
    pub fn delete_all(&mut self, mut confirm: impl FnMut(&str) -> bool) -> bool {
        if !confirm(DELETE_ALL_PROMPT) {
            return false;
        }
        self.tasks.clear();
        true
    }

    /// Move the task at `from` so it ends up at `to`. No-op when the
    /// indices match or either is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.tasks.len() || to >= self.tasks.len() {
            warn!(from, to, "reorder: indices equal or out of range");
            return false;
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        true
    }

    /// Move a completed task back to the front of the active list,
    /// revoking its XP so re-completing it nets zero.
    pub fn restore_completed(&mut self, index: usize, ledger: &mut RewardLedger) -> bool {
        if index >= self.completed.len() {
            warn!(index, "restore: no completed task at index");
            return false;
        }
        let mut task = self.completed.remove(index);
        ledger.revoke(&mut task);
        task.reopen();
        self.tasks.insert(0, task);
        true
    }

    /// Delete a completed task outright. No confirmation, no XP effect.
    pub fn delete_completed(&mut self, index: usize) -> bool {
        if index >= self.completed.len() {
            warn!(index, "delete_completed: no completed task at index");
            return false;
        }
        self.completed.remove(index);
        true
    }

    /// Empty the completed list. XP already awarded stays awarded.
    pub fn clear_completed(&mut self, mut confirm: impl FnMut(&str) -> bool) -> bool {
        if !confirm(CLEAR_COMPLETED_PROMPT) {
            return false;
        }
        self.completed.clear();
        true
    }
}
