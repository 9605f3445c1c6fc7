use dialoguer::{Confirm, Input, Select};

use crate::error::{Result, TrackerError};
use crate::models::Unit;

/// Top-level menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    LogFood,
    ShowTotals,
    Export,
    Import,
    Quit,
}

/// Prompt for the next action.
pub fn prompt_menu() -> Result<MenuChoice> {
    let options = vec![
        "Log a food",
        "Show totals",
        "Export ledger",
        "Import ledger",
        "Quit",
    ];

    let selection = Select::new()
        .with_prompt("What next?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => MenuChoice::LogFood,
        1 => MenuChoice::ShowTotals,
        2 => MenuChoice::Export,
        3 => MenuChoice::Import,
        _ => MenuChoice::Quit,
    })
}

/// Prompt for a food name; empty input cancels the log flow.
pub fn prompt_food_query() -> Result<String> {
    let input: String = Input::new()
        .with_prompt("Food name (Enter to cancel)")
        .allow_empty(true)
        .interact_text()?;

    Ok(input.trim().to_string())
}

/// Offer the fetched suggestions, keeping the typed query as the first
/// option. Returns the accepted suggestion, or None to keep the query.
pub fn prompt_pick_suggestion(query: &str, suggestions: &[String]) -> Result<Option<String>> {
    let mut options = vec![format!("Keep '{}'", query)];
    options.extend(suggestions.iter().cloned());

    let selection = Select::new()
        .with_prompt("Did you mean?")
        .items(&options)
        .default(0)
        .interact()?;

    if selection == 0 {
        Ok(None)
    } else {
        Ok(Some(suggestions[selection - 1].clone()))
    }
}

/// Prompt for a positive portion quantity.
pub fn prompt_quantity(default: f64) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Quantity")
        .default(format!("{}", default))
        .interact_text()?;

    let quantity: f64 = input
        .parse()
        .map_err(|_| TrackerError::Validation("Invalid number".to_string()))?;

    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(TrackerError::Validation(
            "Quantity must be positive".to_string(),
        ));
    }

    Ok(quantity)
}

/// Prompt for the portion unit.
pub fn prompt_unit(default: Unit) -> Result<Unit> {
    let options = vec!["grams", "piece"];
    let default_index = match default {
        Unit::Grams => 0,
        Unit::Piece => 1,
    };

    let selection = Select::new()
        .with_prompt("Unit")
        .items(&options)
        .default(default_index)
        .interact()?;

    Ok(match selection {
        0 => Unit::Grams,
        _ => Unit::Piece,
    })
}

/// Prompt for a ledger file path.
pub fn prompt_path(prompt: &str, default: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    Ok(input.trim().to_string())
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
