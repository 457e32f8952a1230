//! `gene_system` command-line entry point.
use anyhow::Result;
use clap::Parser;

use gene_system::cli::{Cli, Command};
use gene_system::commands;
use gene_system::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command = args.command.name();
    logging::init_subscriber(args.verbose, command);
    let log = Logger::new(command);

    match &args.command {
        Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        Command::Remove(opts) => commands::remove::run(&args.global, opts, &log),
        Command::Describe(opts) => commands::describe::run(opts),
        Command::New(opts) => commands::new::run(opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
