//! `studynotes` command-line entry point.
//!
//! # Responsibility
//! - Parse one command per invocation before touching storage.
//! - Resolve configuration, start logging, open the notes database and run it.

mod args;
mod commands;
mod config;
mod gemini;

use args::ArgParser;
use commands::Command;
use config::CliConfig;
use log::info;
use std::error::Error;
use std::process::ExitCode;
use studynotes_core::{core_version, init_logging, open_db, SqliteKeyValueRepository};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(mut args: Vec<String>) -> Result<(), Box<dyn Error>> {
    if args.is_empty() {
        print_help();
        return Ok(());
    }
    let command = args.remove(0);
    if matches!(command.as_str(), "help" | "-h" | "--help") {
        print_help();
        return Ok(());
    }
    if matches!(command.as_str(), "version" | "-V" | "--version") {
        println!("studynotes {}", core_version());
        return Ok(());
    }

    if command == "path" {
        ArgParser::new(args, &command).finish()?;
        let config = CliConfig::from_env()?;
        println!("{}", config.data_dir.display());
        println!("{}", config.database_path().display());
        return Ok(());
    }
    let parsed = Command::parse(&command, args)?
        .ok_or_else(|| format!("Unknown command: {command}. Run `studynotes help`."))?;

    let config = CliConfig::from_env()?;
    std::fs::create_dir_all(&config.data_dir).map_err(|err| {
        format!(
            "Cannot create data directory `{}`: {err}",
            config.data_dir.display()
        )
    })?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("warning: file logging disabled: {err}");
    }
    info!("event=cli_command module=cli status=start command={command}");

    let conn = open_db(config.database_path())?;
    let repo = SqliteKeyValueRepository::try_new(&conn)?;
    parsed.execute(&repo, &config)
}

fn print_help() {
    println!(
        "\
Study Notes CLI
Usage:
  studynotes subjects                          List subjects with note and progress counts
  studynotes show <subject> <block>            Print one block's notes
  studynotes edit <subject> <block> <file|->   Save a block from a file or stdin
  studynotes import <subject> <file|->         Split a full curriculum into six blocks (AI)
  studynotes format <subject> <block> <file|-> Format raw notes into one block (AI)
  studynotes enhance <subject> <block>         Reformat a block's existing notes (AI)
  studynotes ask <subject> <question...>       Ask the study assistant about a subject (AI)
  studynotes search [-s <subject>] [-n <limit>] <query...>
                                               Search all notes
  studynotes progress [toggle <subject> <block>]
                                               Show or toggle study progress
  studynotes path                              Print data directory and database file
  studynotes help                              Show this help

Subjects: biology, chemistry, ict, physics, maths, english, arabic, french, social
Blocks: 1-6

Environment:
  STUDYNOTES_DATA_DIR             Data directory (default ./.studynotes)
  STUDYNOTES_LOG_LEVEL            trace|debug|info|warn|error
  GEMINI_API_KEY                  Required for AI commands
  STUDYNOTES_GENERATION_MODEL     Model name (default gemini-2.0-flash)
  STUDYNOTES_GENERATION_ENDPOINT  API base URL"
    );
}
