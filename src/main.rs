use std::process;

use clap::Parser;
use git_ai_helpers::cli::{init_tracing, report_error};
use git_ai_helpers::Cli;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        report_error(&e);
        process::exit(1);
    }
}
