use std::io;

use clap::Parser;
use log::LevelFilter;
use opparen::{normalize_cli_args, run, Cli};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG, when set, takes precedence over -v.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse_from(normalize_cli_args(std::env::args_os().collect()));
    init_logging(cli.verbose);

    let code = match run(cli, &mut io::stdout().lock(), &mut io::stderr().lock()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    };
    std::process::exit(code);
}
