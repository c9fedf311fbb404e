use argcache::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Key(args) => cli::key::run(args),
        Command::Probe(args) => cli::probe::run(args).await,
    }
}
