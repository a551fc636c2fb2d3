mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format)?;

    match cli.command {
        Commands::Render { settings, output } => commands::render(&settings, output.as_deref())?,
        Commands::Show {
            file,
            query,
            get,
            output_type,
        } => commands::show(&file, &query, get.as_deref(), output_type)?,
        Commands::Verify {
            file,
            settings,
            json,
        } => {
            if !commands::verify(&file, &settings, json)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Diff { base, compare } => commands::diff(&base, &compare)?,
        Commands::Install {
            prefix,
            settings,
            force,
            dry_run,
        } => commands::install(prefix.as_deref(), &settings, force, dry_run)?,
        Commands::Locate => commands::locate()?,
    }

    Ok(ExitCode::SUCCESS)
}
