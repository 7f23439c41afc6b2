use crate::domain_model::{BackgroundTask, TaskId, TaskStatusReport};
use crate::domain_port::{LocalStore, StoreError};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 20;
pub const TASKS_KEY: &str = "background_tasks";

/// Most-recent-first list of background jobs, de-duplicated by id and capped in size.
#[derive(Debug, Clone)]
pub struct TaskBoard {
    tasks: VecDeque<BackgroundTask>,
    capacity: usize,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TaskBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&BackgroundTask> {
        self.tasks.iter().find(|task| &task.task_id == id)
    }

    pub fn snapshot(&self) -> Vec<BackgroundTask> {
        self.tasks.iter().cloned().collect()
    }

    /// Merges into an existing entry, or prepends and evicts the oldest beyond capacity.
    ///
    /// Returns the evicted task, if any.
    pub fn upsert(&mut self, task: BackgroundTask, at: DateTime<Utc>) -> Option<BackgroundTask> {
        if let Some(existing) = self.tasks.iter_mut().find(|t| t.task_id == task.task_id) {
            existing.status = task.status;
            existing.ready = task.ready;
            if task.result.is_some() {
                existing.result = task.result;
            }
            if task.error.is_some() {
                existing.error = task.error;
            }
            existing.last_updated = Some(at);
            return None;
        }

        self.tasks.push_front(task);
        if self.tasks.len() > self.capacity {
            self.tasks.pop_back()
        } else {
            None
        }
    }

    /// Applies a status report; reports for tasks no longer on the board are dropped.
    pub fn apply_report(&mut self, id: &TaskId, report: TaskStatusReport, at: DateTime<Utc>) -> bool {
        match self.tasks.iter_mut().find(|t| &t.task_id == id) {
            Some(task) => {
                task.apply(report, at);
                true
            }
            None => false,
        }
    }

    /// Ids worth re-querying: everything not yet ready.
    pub fn due_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|task| task.needs_refresh())
            .map(|task| task.task_id.clone())
            .collect()
    }

    pub fn all_ready(&self) -> bool {
        self.tasks.iter().all(|task| task.ready)
    }

    /// Restores a board previously saved with [`TaskBoard::save`].
    pub async fn load(store: &dyn LocalStore, capacity: usize) -> Result<Self, StoreError> {
        let mut board = Self::new(capacity);
        if let Some(json) = store.get(TASKS_KEY).await? {
            let tasks: Vec<BackgroundTask> =
                serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string()))?;
            board.tasks = tasks.into_iter().take(board.capacity).collect();
        }
        Ok(board)
    }

    pub async fn save(&self, store: &dyn LocalStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.tasks)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        store.set(TASKS_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::{TaskKind, TaskStatus};
    use crate::infra::MemoryStore;

    fn task(id: &str) -> BackgroundTask {
        BackgroundTask::submitted(TaskId(id.to_string()), TaskKind::TestEmail, format!("job {}", id))
    }

    #[test]
    fn upsert_of_known_id_merges_in_place() {
        let mut board = TaskBoard::default();
        board.upsert(task("a"), Utc::now());
        board.upsert(task("b"), Utc::now());

        let mut update = task("a");
        update.status = TaskStatus::Success;
        update.ready = true;
        update.description = "ignored".to_string();
        let at = Utc::now();
        assert!(board.upsert(update, at).is_none());

        assert_eq!(board.len(), 2);
        let merged = board.get(&TaskId("a".to_string())).unwrap();
        assert_eq!(merged.status, TaskStatus::Success);
        assert_eq!(merged.description, "job a");
        assert_eq!(merged.last_updated, Some(at));
        // order is unchanged: b is still newest
        assert_eq!(board.snapshot()[0].task_id, TaskId("b".to_string()));
    }

    #[test]
    fn new_id_at_capacity_evicts_oldest() {
        let mut board = TaskBoard::default();
        for n in 0..DEFAULT_CAPACITY {
            assert!(board.upsert(task(&n.to_string()), Utc::now()).is_none());
        }
        assert_eq!(board.len(), DEFAULT_CAPACITY);

        let evicted = board.upsert(task("newest"), Utc::now()).unwrap();
        assert_eq!(evicted.task_id, TaskId("0".to_string()));
        assert_eq!(board.len(), DEFAULT_CAPACITY);
        assert_eq!(board.snapshot()[0].task_id, TaskId("newest".to_string()));
        assert!(board.get(&TaskId("0".to_string())).is_none());
    }

    #[test]
    fn due_ids_skip_ready_tasks() {
        let mut board = TaskBoard::new(5);
        board.upsert(task("pending"), Utc::now());
        let mut done = task("done");
        done.status = TaskStatus::Failure;
        done.ready = true;
        board.upsert(done, Utc::now());

        assert_eq!(board.due_ids(), vec![TaskId("pending".to_string())]);
        assert!(!board.all_ready());
    }

    #[test]
    fn reports_for_evicted_tasks_are_dropped() {
        let mut board = TaskBoard::new(1);
        board.upsert(task("old"), Utc::now());
        board.upsert(task("new"), Utc::now());
        let report = TaskStatusReport {
            status: TaskStatus::Success,
            ready: true,
            result: None,
            error: None,
        };
        assert!(!board.apply_report(&TaskId("old".to_string()), report, Utc::now()));
        assert_eq!(board.len(), 1);
    }

    #[tokio::test]
    async fn board_persists_through_local_store() {
        let store = MemoryStore::new();
        let mut board = TaskBoard::new(3);
        board.upsert(task("a"), Utc::now());
        board.upsert(task("b"), Utc::now());
        board.save(&store).await.unwrap();

        let restored = TaskBoard::load(&store, 1).await.unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.snapshot()[0].task_id, TaskId("b".to_string()));
    }
}
