use super::{App, Outcome, print_json, render, require_login, show_info};
use crate::application_port::{ApiResult, TaskApi};
use crate::domain_model::{BackgroundTask, TaskHandle, TaskId, TaskKind, TaskStatus};
use std::collections::HashMap;
use tracing::debug;

fn print_task(task: &BackgroundTask) {
    let updated = task
        .last_updated
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {:<8} {:<22} {}  (updated {})",
        task.task_id,
        task.status.to_string(),
        task.kind.to_string(),
        task.description,
        updated
    );
    if let Some(error) = &task.error {
        println!("    error: {}", error);
    }
}

pub async fn task_status(app: &App, task_id: String) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let id = TaskId(task_id);
    let result = app.api.task_status(&id).await;
    render(app.json, result, "Could not query task", |report| {
        println!("{}  {}  ready: {}", id, report.status, report.ready);
        if let Some(result) = &report.result {
            println!("  result: {}", result);
        }
        if let Some(error) = &report.error {
            println!("  error:  {}", error);
        }
    })
}

fn track_handle(app: &App, result: &ApiResult<TaskHandle>, kind: TaskKind, description: String) {
    if let Ok(handle) = result {
        app.poller.track(BackgroundTask::submitted(
            handle.task_id.clone(),
            kind,
            description,
        ));
    }
}

pub async fn test_task(app: &App) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.trigger_test_task().await;
    track_handle(app, &result, TaskKind::ConnectivityCheck, "worker connectivity check".to_string());
    render(app.json, result.map(|h| h.task_id), "Could not queue the test task", |id| {
        println!("Queued test task {}", id);
    })
}

pub async fn test_email(app: &App, email: &str) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.send_test_email(email).await;
    track_handle(app, &result, TaskKind::TestEmail, format!("test e-mail to {}", email));
    render(app.json, result.map(|h| h.task_id), "Could not queue the test e-mail", |id| {
        println!("Queued test e-mail {}", id);
    })
}

pub async fn tasks(app: &App, watch: bool) -> Outcome {
    if watch {
        if !require_login(app).await {
            return Outcome::Failed;
        }
        return watch_tasks(app).await;
    }
    let tasks = app.poller.snapshot();
    if app.json {
        print_json(&tasks);
    } else if tasks.is_empty() {
        println!("No background tasks tracked");
    } else {
        tasks.iter().for_each(print_task);
    }
    Outcome::Done
}

/// Polls until every tracked task is finished or the user presses Ctrl-C.
pub async fn watch_tasks(app: &App) -> Outcome {
    let mut seen: HashMap<TaskId, TaskStatus> = HashMap::new();
    let mut report = |tasks: Vec<BackgroundTask>| {
        for task in tasks {
            if seen.get(&task.task_id) != Some(&task.status) {
                seen.insert(task.task_id.clone(), task.status);
                if !app.json {
                    print_task(&task);
                }
            }
        }
    };

    app.poller.refresh_now().await;
    report(app.poller.snapshot());
    if app.poller.all_ready() {
        return finish_watch(app);
    }

    show_info(&format!(
        "Watching tasks every {}s, Ctrl-C to stop",
        app.poller.interval().as_secs()
    ));
    app.poller.set_auto_refresh(true);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                debug!("watch interrupted");
                break;
            }
            _ = tokio::time::sleep(app.poller.interval()) => {
                report(app.poller.snapshot());
                if app.poller.all_ready() {
                    break;
                }
            }
        }
    }
    app.poller.set_auto_refresh(false);
    finish_watch(app)
}

fn finish_watch(app: &App) -> Outcome {
    let tasks = app.poller.snapshot();
    if app.json {
        print_json(&tasks);
    }
    if tasks.iter().any(|t| t.status == TaskStatus::Failure) {
        Outcome::Failed
    } else {
        Outcome::Done
    }
}
