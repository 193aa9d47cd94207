//! LazyLift CLI
//!
//! Relationship demos and the interactive workout logbook.

use clap::{Parser, Subcommand};
use std::io;

mod commands;
mod config;

use config::{AppConfig, GlobalArgs};

#[derive(Debug, Parser)]
#[command(name = "lazylift")]
#[command(version, long_about = None)]
#[command(about = "LazyLift - relational mapping demos and a lifting logbook")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one relationship demo, or all of them
    Demo(commands::demo::DemoArgs),
    /// Record a workout from the terminal
    Log(commands::logbook::LogArgs),
    /// List workouts stored in a logbook shelf
    History(commands::history::HistoryArgs),
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli.global);

    if let Err(err) = lazylift_core::init_logging_with(&config.logging_options()) {
        eprintln!("warning: file logging disabled: {err}");
        if config.echo_sql {
            eprintln!("warning: --echo-sql is ignored without logging");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Commands::Demo(args) => commands::demo::execute(args, &config, &mut out),
        Commands::Log(args) => {
            let stdin = io::stdin();
            commands::logbook::execute(args, &config, stdin.lock(), &mut out)
        }
        Commands::History(args) => commands::history::execute(args, &config, &mut out),
    };

    if let Err(e) = result {
        log::error!("event=cli_exit module=cli status=error error={e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
