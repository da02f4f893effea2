//! docadmin - run an admin date filter from the command line

use anyhow::Result;
use clap::Parser as ClapParser;
use docadmin::cli::{run, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    println!("{}", run(&args)?);

    Ok(())
}
