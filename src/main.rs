use clap::Parser;
use colored::Colorize;

use mindful::cli::args::{Cli, Commands};
use mindful::cli::commands;
use mindful::config::{Config, Paths};
use mindful::error::MindfulError;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), MindfulError> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    let config = Config::load_from_path(&paths.config_file)?;

    config.general.color.apply();
    mindful::logging::init(&paths, &config.general.log_level);

    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        Commands::Sit { duration } => commands::sit(&paths, &config, duration.as_deref())?,
        Commands::Durations => commands::durations(&config, format)?,
        Commands::History { limit } => commands::history(&paths, limit, format)?,
        Commands::Report { period } => commands::report(&paths, &period, format)?,
        Commands::Login { user } => commands::login(&paths, &config, &user, format)?,
        Commands::Logout => commands::logout(&paths, format)?,
        Commands::Whoami => commands::whoami(&paths, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
