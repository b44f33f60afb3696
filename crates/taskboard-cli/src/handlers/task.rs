use super::CommandOutput;
use crate::context::CliContext;
use serde_json::json;
use taskboard_domain::{BoardStatus, TaskId, TaskStatus, TransitionRequest};

pub async fn handle_move(
    ctx: &mut CliContext,
    id: String,
    status: String,
) -> anyhow::Result<CommandOutput> {
    let Some(new_status) = TaskStatus::parse_known(&status) else {
        return CommandOutput::failed(format!("Unknown status: {}", status));
    };
    let task_id = TaskId::from(id);
    let Some(previous_status) = ctx.controller.cache().get(&task_id).map(|t| t.status) else {
        return CommandOutput::failed(format!("Task not found: {}", task_id));
    };

    let request = TransitionRequest {
        task_id: task_id.clone(),
        new_status,
        previous_status,
    };
    if let Err(e) = ctx.controller.transition(&ctx.transport, request).await {
        return CommandOutput::failed(e.user_message());
    }

    let events: Vec<String> = ctx
        .controller
        .drain_events()
        .iter()
        .map(|event| event.message())
        .collect();
    CommandOutput::data(json!({
        "task": ctx.controller.cache().get(&task_id),
        "previousStatus": previous_status,
        "events": events,
    }))
}

pub fn handle_reorder(
    ctx: &mut CliContext,
    id: String,
    before: Option<String>,
) -> anyhow::Result<CommandOutput> {
    let task_id = TaskId::from(id);
    let before = before.map(TaskId::from);

    match ctx.controller.reorder_within(&task_id, before.as_ref()) {
        Ok(status) => CommandOutput::data(json!({
            "status": status,
            "order": ctx.controller.columns().task_ids(status),
        })),
        Err(e) => CommandOutput::failed(e.user_message()),
    }
}

pub async fn handle_archive_column(
    ctx: &mut CliContext,
    status: String,
) -> anyhow::Result<CommandOutput> {
    let Some(column) = BoardStatus::parse(&status) else {
        return CommandOutput::failed(format!("Not a board column: {}", status));
    };

    let report = ctx
        .controller
        .bulk_archive_column(&ctx.transport, column)
        .await;
    let failed: Vec<_> = report
        .failed
        .iter()
        .map(|(id, error)| json!({"id": id, "error": error}))
        .collect();
    CommandOutput::data(json!({
        "status": report.status,
        "archived": report.archived,
        "failed": failed,
        "summary": report.summary(),
    }))
}
