//
//  tfgit
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tfgit::api::{ApiError, ErrorKind};
use tfgit::cli::{Cancelled, Cli, Commands};
use tfgit::exit_codes;

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code(&e));
        }
    }
}

/// Logs go to stderr; `TFGIT_DEBUG` takes an `EnvFilter` directive such as
/// `debug` or `tfgit::api=trace`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("TFGIT_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if error.chain().any(|c| c.is::<Cancelled>()) {
        return exit_codes::CANCELLED;
    }
    match error
        .chain()
        .find_map(|c| c.downcast_ref::<ApiError>())
        .map(ApiError::kind)
    {
        Some(ErrorKind::Unauthorized | ErrorKind::Forbidden) => exit_codes::AUTH_ERROR,
        Some(ErrorKind::NotFound) => exit_codes::NOT_FOUND,
        Some(ErrorKind::RateLimited) => exit_codes::RATE_LIMIT,
        _ => exit_codes::ERROR,
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Repo(cmd) => cmd.run(&cli.global).await,
        Commands::Ref(cmd) => cmd.run(&cli.global).await,
        Commands::Commit(cmd) => cmd.run(&cli.global).await,
        Commands::Push(cmd) => cmd.run(&cli.global).await,
        Commands::Pr(cmd) => cmd.run(&cli.global).await,
        Commands::Item(cmd) => cmd.run(&cli.global).await,
        Commands::Tree(cmd) => cmd.run(&cli.global).await,
        Commands::Blob(cmd) => cmd.run(&cli.global).await,
        Commands::Config(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("tfgit version {}", tfgit::VERSION);
            Ok(())
        }
    }
}
