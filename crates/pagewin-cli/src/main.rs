mod atomic_writer;
mod cli;
mod context;
mod handlers;
mod output;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;

fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("PAGEWIN_DEBUG_LOG") {
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
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "pagewin", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = run(cli) {
        output::output_error(&format!("{:#}", e));
    }
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let file_path = cli
        .file
        .ok_or_else(|| anyhow::anyhow!("FILE (or PAGEWIN_FILE) is required"))?;

    let mut ctx = CliContext::load(&file_path, cli.page_size)
        .with_context(|| format!("Failed to load dataset {}", file_path))?;

    match cli.command {
        Commands::Info => handlers::info::handle(&ctx)?,
        Commands::Page(args) => handlers::page::handle(&mut ctx, args)?,
        Commands::Edit(args) => handlers::edit::handle(&mut ctx, args)?,
        Commands::Sort(args) => handlers::sort::handle(&mut ctx, args)?,
        Commands::Completions { .. } => {}
    }
    Ok(())
}
