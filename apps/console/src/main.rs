use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::normalize_base_url, load_settings, HttpBlogApi, Router, SessionStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod orchestration;
mod render;

use commands::ParseError;
use orchestration::Outcome;

/// Terminal admin client for the blog API.
#[derive(Parser, Debug)]
#[command(name = "blog-admin")]
struct Args {
    /// Base URL of the blog API; overrides config file and environment.
    #[arg(long)]
    api_url: Option<String>,
    /// Settings file (defaults to ./blog_admin.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = normalize_base_url(&api_url)?;
    }
    info!(api = %settings.api_base_url, "starting blog admin console");

    let api = Arc::new(
        HttpBlogApi::new(&settings.api_base_url).context("failed to build API client")?,
    );
    let mut router = Router::new(api, SessionStore::new(), settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type 'help' for commands.");
    print!("{}", render::render(&mut router));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match commands::parse(&line) {
                    Ok(command) => match orchestration::dispatch(&mut router, command).await {
                        Outcome::Continue => {}
                        Outcome::Hint(text) => {
                            println!("{text}");
                            continue;
                        }
                        Outcome::Quit => break,
                    },
                    Err(ParseError::Empty) => continue,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                }
            }
            route = router.next_navigation() => {
                let Some(route) = route else {
                    break;
                };
                router.open(route).await;
                router.process_queued().await;
            }
        }
        print!("{}", render::render(&mut router));
    }

    info!("console closed");
    Ok(())
}
