use clap::Parser;
use lasttweet::cli::Config;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::parse();
    lasttweet::cli::run(config).await
}
