use std::process;

use clap::Parser;
use log::LevelFilter;
use rsa_textbook::cli::{run, Cli};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        process::exit(1);
    }
}
