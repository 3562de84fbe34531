use clap::Parser;

mod cli;
mod commands;
mod logging;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);
    commands::run_command(cli)
}
