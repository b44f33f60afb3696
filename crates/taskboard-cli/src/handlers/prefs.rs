use super::CommandOutput;
use crate::cli::PrefsAction;
use crate::context::CliContext;
use taskboard_domain::{BoardStatus, Density, FocusMode};

pub async fn handle(ctx: &mut CliContext, action: PrefsAction) -> anyhow::Result<CommandOutput> {
    let result = match action {
        PrefsAction::Show => Ok(()),
        PrefsAction::Density { value: None } => ctx.prefs.cycle_density().await.map(|_| ()),
        PrefsAction::Density { value: Some(raw) } => match Density::parse(&raw) {
            Some(density) => ctx.prefs.set_density(density).await,
            None => return CommandOutput::failed(format!("Unknown density: {}", raw)),
        },
        PrefsAction::Focus { mode } => match FocusMode::parse(&mode) {
            Some(mode) => ctx.prefs.set_focus_mode(mode).await,
            None => return CommandOutput::failed(format!("Unknown focus mode: {}", mode)),
        },
        PrefsAction::Collapse { status } => match BoardStatus::parse(&status) {
            Some(column) => ctx.prefs.toggle_column_collapsed(column).await.map(|_| ()),
            None => return CommandOutput::failed(format!("Not a board column: {}", status)),
        },
    };

    match result {
        Ok(()) => CommandOutput::data(ctx.prefs.prefs()),
        Err(e) => CommandOutput::failed(format!("Preference not saved: {}", e.user_message())),
    }
}
