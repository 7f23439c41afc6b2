use super::TaskBoard;
use crate::application_port::TaskApi;
use crate::domain_model::{BackgroundTask, TaskId};
use chrono::Utc;
use futures_util::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

struct Timer {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keeps a [`TaskBoard`] fresh by re-querying unfinished tasks on a fixed interval.
///
/// The timer only runs while auto-refresh is on. It restarts whenever the flag
/// flips or a task is tracked, and is cancelled on [`TaskPoller::stop`] or drop.
pub struct TaskPoller {
    api: Arc<dyn TaskApi>,
    board: Arc<Mutex<TaskBoard>>,
    interval: Duration,
    auto_refresh: AtomicBool,
    timer: Mutex<Option<Timer>>,
}

impl TaskPoller {
    pub fn new(api: Arc<dyn TaskApi>, board: TaskBoard, interval: Duration) -> Self {
        Self {
            api,
            board: Arc::new(Mutex::new(board)),
            interval,
            auto_refresh: AtomicBool::new(false),
            timer: Mutex::new(None),
        }
    }

    fn board(&self) -> MutexGuard<'_, TaskBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<BackgroundTask> {
        self.board().snapshot()
    }

    pub fn board_copy(&self) -> TaskBoard {
        self.board().clone()
    }

    pub fn get(&self, id: &TaskId) -> Option<BackgroundTask> {
        self.board().get(id).cloned()
    }

    pub fn all_ready(&self) -> bool {
        self.board().all_ready()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Adds or merges `task`; must be called inside a tokio runtime when auto-refresh is on.
    pub fn track(&self, task: BackgroundTask) {
        let id = task.task_id.clone();
        if let Some(evicted) = self.board().upsert(task, Utc::now()) {
            debug!(task = %evicted.task_id, "evicted oldest task");
        }
        debug!(task = %id, "tracking task");
        if self.is_auto_refresh() {
            self.restart();
        }
    }

    pub fn is_auto_refresh(&self) -> bool {
        self.auto_refresh.load(Ordering::SeqCst)
    }

    pub fn start(&self) {
        self.set_auto_refresh(true);
    }

    pub fn set_auto_refresh(&self, enabled: bool) {
        self.auto_refresh.store(enabled, Ordering::SeqCst);
        if enabled {
            self.restart();
        } else {
            self.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|timer| !timer.handle.is_finished())
    }

    /// Re-queries every unfinished task once; returns how many were queried.
    pub async fn refresh_now(&self) -> usize {
        refresh_board(self.api.as_ref(), &self.board).await
    }

    fn restart(&self) {
        self.stop();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_timer(
            self.api.clone(),
            self.board.clone(),
            self.interval,
            cancel.clone(),
        ));
        *self.timer.lock().unwrap_or_else(PoisonError::into_inner) = Some(Timer { cancel, handle });
    }

    pub fn stop(&self) {
        let timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(timer) = timer {
            timer.cancel.cancel();
            debug!("task poller stopped");
        }
    }

    /// Turns auto-refresh off and waits for the timer task to finish.
    pub async fn shutdown(&self) {
        self.auto_refresh.store(false, Ordering::SeqCst);
        let timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(timer) = timer {
            timer.cancel.cancel();
            if let Err(e) = timer.handle.await {
                warn!(error = %e, "task poller ended abnormally");
            }
        }
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn refresh_board(api: &dyn TaskApi, board: &Mutex<TaskBoard>) -> usize {
    let due = board.lock().unwrap_or_else(PoisonError::into_inner).due_ids();
    if due.is_empty() {
        return 0;
    }

    let reports = join_all(due.iter().map(|id| async move { (id, api.task_status(id).await) })).await;

    let now = Utc::now();
    let mut board = board.lock().unwrap_or_else(PoisonError::into_inner);
    for (id, report) in reports {
        match report {
            Ok(report) => {
                if report.ready {
                    info!(task = %id, status = %report.status, "task finished");
                }
                board.apply_report(id, report, now);
            }
            Err(e) => warn!(task = %id, error = %e, "task status check failed"),
        }
    }
    due.len()
}

async fn run_timer(
    api: Arc<dyn TaskApi>,
    board: Arc<Mutex<TaskBoard>>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // a refresh still in flight at cancellation is dropped, never applied
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = refresh_board(api.as_ref(), &board) => {}
                }
            }
        }
    }
}
