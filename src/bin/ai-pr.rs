use std::process;

use clap::Parser;
use git_ai_helpers::cli::pr::AiPrCommand;
use git_ai_helpers::cli::{init_tracing, report_error};

/// Generate a pull request with an AI CLI and open it with gh.
#[derive(Parser)]
#[command(name = "ai-pr", version, long_about = None)]
struct Args {
    #[command(flatten)]
    command: AiPrCommand,
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
