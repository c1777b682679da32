mod cli;
mod shell;

use crate::cli::CLI;
use crate::shell::{Command, Outcome, Shell};
use clap::Parser;
use snip_core::Store;
use snip_factory::{FactorySettings, KeyFactory};
use snip_generator::{KeyGenerator, RandomGenerator};
use snip_store::MemoryStore;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(
        key_length = config.key_length,
        max_attempts = config.max_attempts,
        capacity = ?config.capacity,
        reuse_existing = config.reuse_existing,
        base_url = %config.base_url,
        "starting snip shell"
    );

    let store = Arc::new(match config.capacity {
        Some(capacity) => MemoryStore::with_capacity_limit(capacity),
        None => MemoryStore::new(),
    });
    let generator = match config.seed {
        Some(seed) => RandomGenerator::seeded(config.key_length, seed)?,
        None => RandomGenerator::new(config.key_length)?,
    };
    let settings = FactorySettings::builder()
        .max_attempts(config.max_attempts)
        .reuse_existing(config.reuse_existing)
        .build();
    let factory = KeyFactory::with_settings(Arc::clone(&store), generator, settings);
    let shell = Shell::new(factory, config.base_url);

    serve(&shell, store.as_ref(), BufReader::new(tokio::io::stdin())).await
}

/// Runs the shell over `input`, then closes the store whether or not the
/// input could be read to the end.
async fn serve<S, G, R>(shell: &Shell<S, G>, store: &S, input: R) -> anyhow::Result<()>
where
    S: Store,
    G: KeyGenerator,
    R: AsyncBufRead + Unpin,
{
    let result = run_shell(shell, input).await;
    store.close().await?;
    result
}

/// Feeds `input` to the shell line by line until `quit` or end of input.
async fn run_shell<S, G, R>(shell: &Shell<S, G>, input: R) -> anyhow::Result<()>
where
    S: Store,
    G: KeyGenerator,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("error: {err}");
                continue;
            }
        };

        match shell.execute(command).await {
            Outcome::Reply(reply) => println!("{reply}"),
            Outcome::Quit => break,
        }
    }

    Ok(())
}
