//! CGD CLI - Command line tool for COVID dashboard datasets.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "cgd-cli",
    version,
    about = "COVID-19 Global Dashboard data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: cgd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cgd_cmd::run(cli.command).await
}
