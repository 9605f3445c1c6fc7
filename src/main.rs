use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ai_food_log_rs::cli::Cli;
use ai_food_log_rs::error::Result;
use ai_food_log_rs::interface::{
    display_entries, display_totals, prompt_food_query, prompt_menu, prompt_path,
    prompt_pick_suggestion, prompt_quantity, prompt_unit, prompt_yes_no, MenuChoice,
};
use ai_food_log_rs::provider::GeminiProvider;
use ai_food_log_rs::session::TrackerSession;

const DEFAULT_LEDGER_FILE: &str = "food_ledger.json";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut provider = GeminiProvider::from_env()?;
    if let Some(model) = cli.model {
        provider = provider.with_model(model);
    }

    let debounce = Duration::from_millis(cli.debounce_ms);
    let mut session = TrackerSession::with_debounce(Arc::new(provider), debounce);

    println!("AiFoodLog: type a food, get an AI nutrition estimate.");

    loop {
        match prompt_menu()? {
            MenuChoice::LogFood => cmd_log_food(&mut session, debounce).await?,
            MenuChoice::ShowTotals => {
                display_entries(&session.entries().await);
                display_totals(&session.totals().await);
            }
            MenuChoice::Export => cmd_export(&session).await?,
            MenuChoice::Import => cmd_import(&mut session).await?,
            MenuChoice::Quit => break,
        }
    }

    Ok(())
}

/// One pass of the log-a-food flow: query, suggestions, portion, add.
async fn cmd_log_food(session: &mut TrackerSession, debounce: Duration) -> Result<()> {
    let query = prompt_food_query()?;
    if query.is_empty() {
        return Ok(());
    }

    session.set_query(&query).await;

    // Give the debounced suggestion fetch a moment to land.
    tokio::time::sleep(debounce + Duration::from_millis(300)).await;

    let suggestions = session.suggestions().await;
    if !suggestions.is_empty() {
        if let Some(choice) = prompt_pick_suggestion(&query, &suggestions)? {
            session.select_suggestion(&choice).await;
        }
    }

    let quantity = match prompt_quantity(session.quantity()) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };
    let unit = prompt_unit(session.unit())?;

    session.set_quantity(quantity);
    session.set_unit(unit);

    match session.add_food().await {
        Ok(entry) => {
            println!("Added {}", entry.debug_string());
            display_totals(&session.totals().await);
        }
        Err(e) => {
            // The pending state carries the user-facing message for
            // provider failures; validation failures only have the error.
            match session.pending_add().await.error() {
                Some(message) => eprintln!("{}", message),
                None => eprintln!("Error: {}", e),
            }
        }
    }

    Ok(())
}

/// Write the ledger to a user-chosen file.
async fn cmd_export(session: &TrackerSession) -> Result<()> {
    if session.entries().await.is_empty() {
        println!("Nothing to export yet.");
        return Ok(());
    }

    let path = prompt_path("Export to", DEFAULT_LEDGER_FILE)?;
    session.export_ledger(&path).await?;
    println!("Ledger exported to {}.", path);

    Ok(())
}

/// Replace the ledger from a user-chosen file, confirming the overwrite.
async fn cmd_import(session: &mut TrackerSession) -> Result<()> {
    let path = prompt_path("Import from", DEFAULT_LEDGER_FILE)?;

    if !session.entries().await.is_empty() {
        let replace = prompt_yes_no("Importing replaces the current ledger. Continue?", true)?;
        if !replace {
            return Ok(());
        }
    }

    match session.import_ledger(&path).await {
        Ok(count) => {
            println!("Imported {} entries.", count);
            display_totals(&session.totals().await);
        }
        Err(e) => eprintln!("Import failed, ledger unchanged: {}", e),
    }

    Ok(())
}
