use clap::Parser;
use log::{debug, LevelFilter};
use miette::Result;

use asciidiag::cli::{Cli, Commands};
use asciidiag::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!("parsed arguments: {:?}", cli);

    let printer = Printer::new();
    match cli.command {
        Commands::Convert(args) => asciidiag::cli::convert::run(args, &printer)?,
        Commands::Inspect(args) => asciidiag::cli::inspect::run(args, &printer)?,
        Commands::Completions(args) => asciidiag::cli::completions::run(args)?,
    }

    Ok(())
}
