mod config;
mod db;
mod error;
mod models;
mod operations;

use chrono::Local;
use clap::Parser;
use config::{Args, init_logger};
use db::store::SpendStore;
use error::EntryError;
use operations::add::{StdinPrompt, create_spend};
use operations::report::run_report;
use std::io::{self, Write};
use tracing::{debug, info, warn};

pub enum UserCommands {
    Enter,
    Analyze,
}

fn main() {
    let args = Args::parse();
    init_logger(args.log_level());
    let store = SpendStore::new(args.database());
    debug!(database = %store.path().display(), "Starting");
    let mut prompt = StdinPrompt;

    loop {
        println!("What would you like to do? Please enter the relevant number:\n1: Enter new values\n2: Show analysis");

        let input = match read_user_input() {
            Ok(Some(cmd)) => cmd,
            Ok(None) => {
                info!("Input closed, exiting");
                break;
            }
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };

        let Some(command) = check_for_command(&input) else {
            println!("Invalid input. Please enter 1 or 2.");
            continue;
        };

        match command {
            UserCommands::Enter => {
                let spend = match create_spend(&mut prompt, Local::now().date_naive()) {
                    Ok(spend) => spend,
                    Err(EntryError::Cancelled) => {
                        println!("Entry cancelled.");
                        continue;
                    }
                    Err(EntryError::Input(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                        info!("Input closed during entry, exiting");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Entry rejected");
                        println!("Error: {}", e);
                        println!("Please try again.");
                        continue;
                    }
                };
                match store.insert(&spend) {
                    Ok(record) => println!("Spending record {} saved.", record.id),
                    Err(e) => {
                        warn!(error = %e, "Insert failed");
                        println!("Error saving record: {}", e);
                    }
                }
            }
            UserCommands::Analyze => {
                if let Err(e) = run_report(&store, Local::now().naive_local()) {
                    warn!(error = %e, "Report failed");
                    println!("Error showing analysis: {}", e);
                }
            }
        }
    }
}

/// `Ok(None)` once stdin is closed.
fn read_user_input() -> io::Result<Option<String>> {
    io::stdout().flush()?;
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn check_for_command(input: &str) -> Option<UserCommands> {
    match input.parse::<u8>().ok()? {
        1 => Some(UserCommands::Enter),
        2 => Some(UserCommands::Analyze),
        _ => None,
    }
}
