use std::process;

use clap::Parser;
use git_ai_helpers::cli::hook::PrepareCommitMsgCommand;
use git_ai_helpers::cli::{init_tracing, report_error};

/// Git prepare-commit-msg hook that drafts the message with an AI CLI.
#[derive(Parser)]
#[command(name = "prepare-commit-msg", version, long_about = None)]
struct Args {
    #[command(flatten)]
    command: PrepareCommitMsgCommand,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = Args::parse();

    if let Err(e) = args.command.execute().await {
        report_error(&e);
        process::exit(1);
    }
}
