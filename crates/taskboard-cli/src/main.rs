mod cli;
mod context;
mod handlers;
mod output;
mod transport;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use handlers::CommandOutput;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        // stdout carries the JSON response.
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "taskboard", &mut std::io::stdout());
        return Ok(());
    }

    let Some(tasks_path) = cli.tasks else {
        output::output_error("--tasks is required (or set TASKBOARD_TASKS)");
    };

    let mut ctx = match CliContext::load(&tasks_path, cli.state_dir).await {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&e.to_string()),
    };

    let result = match cli.command {
        Commands::Board { focus } => handlers::board::handle_board(&ctx, focus),
        Commands::Metrics => handlers::board::handle_metrics(&ctx),
        Commands::Move { id, status } => handlers::task::handle_move(&mut ctx, id, status).await,
        Commands::Reorder(args) => {
            let before = if args.end { None } else { args.before };
            handlers::task::handle_reorder(&mut ctx, args.id, before)
        }
        Commands::ArchiveColumn { status } => {
            handlers::task::handle_archive_column(&mut ctx, status).await
        }
        Commands::Prefs(prefs_cmd) => handlers::prefs::handle(&mut ctx, prefs_cmd.action).await,
        Commands::Completions { .. } => CommandOutput::failed("completions take no board"),
    };

    ctx.finish().await?;

    match result {
        Ok(CommandOutput::Data(data)) => output::output_success(data),
        Ok(CommandOutput::Failed(message)) => output::output_error(&message),
        Err(e) => output::output_error(&e.to_string()),
    }

    Ok(())
}
