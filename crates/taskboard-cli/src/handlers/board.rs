use super::CommandOutput;
use crate::context::CliContext;
use chrono::Utc;
use serde::Serialize;
use taskboard_domain::{BoardMetrics, ColumnState, FocusMode, Preferences, Task};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardView<'a> {
    columns: ColumnState,
    archived: &'a [Task],
    preferences: &'a Preferences,
    focus_mode: FocusMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetricsView {
    #[serde(flatten)]
    metrics: BoardMetrics,
    total: usize,
    archived: usize,
}

pub fn handle_board(ctx: &CliContext, focus: Option<String>) -> anyhow::Result<CommandOutput> {
    let mode = match focus {
        Some(raw) => match FocusMode::parse(&raw) {
            Some(mode) => mode,
            None => return CommandOutput::failed(format!("Unknown focus mode: {}", raw)),
        },
        None => ctx.prefs.focus_mode(),
    };

    let columns = ctx
        .controller
        .focused_columns(mode, Utc::now(), ctx.windows);
    CommandOutput::data(BoardView {
        columns,
        archived: ctx.controller.archived(),
        preferences: ctx.prefs.prefs(),
        focus_mode: mode,
    })
}

pub fn handle_metrics(ctx: &CliContext) -> anyhow::Result<CommandOutput> {
    let metrics = ctx.controller.metrics(Utc::now(), ctx.windows);
    CommandOutput::data(MetricsView {
        metrics,
        total: ctx.controller.columns().len(),
        archived: ctx.controller.archived().len(),
    })
}
