use std::process::ExitCode;

use clap::Parser;
use client::ExpenseClient;

use crate::{
    cli::{Args, Command},
    error::Result,
};

mod cli;
mod commands;
mod config;
mod error;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let settings = match config::load(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expenses={level},client={level},mock_server={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match run(args.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            if let Some(hint) = err.hint() {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command, settings: config::AppConfig) -> Result<()> {
    if let Command::Serve { port } = command {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
        mock_server::run_with_listener(mock_server::ServerState::new(), listener).await?;
        return Ok(());
    }

    let client = ExpenseClient::builder().config(settings.client).build()?;
    if let Some(session) = client.restore_session().await {
        tracing::debug!(user_id = %session.id, "restored session");
    }

    commands::run(&client, command).await
}
