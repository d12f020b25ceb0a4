use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches};

mod cli;
mod exit_codes;
mod filter_params;
mod output;
mod report;
mod run;

use cli::Cli;

fn main() {
    let parsed = Cli::command()
        .after_long_help(cli::filters_help())
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches));
    let cli = match parsed {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let message = e.to_string();
            let first_line = message.lines().next().unwrap_or_default();
            println!("ERR: {}", first_line.trim_start_matches("error: "));
            std::process::exit(exit_codes::FAILURE);
        }
    };

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let exit_code = run::execute(cli);
    std::process::exit(exit_code);
}
