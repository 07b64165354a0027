// UI layer: provides a simple interactive menu using `dialoguer`.
// Each entry maps to one of the one-shot flows an operator runs against
// a local Anki; the menu just saves invoking a separate command per flow.

use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::AnkiClient;
use crate::import::import_notes;
use crate::notes::rewrite_deck_name;

/// Main interactive menu. Receives an `AnkiClient` instance and runs a
/// simple select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: arrow keys and Enter
/// choose an option.
pub fn main_menu(api: AnkiClient) -> Result<()> {
    loop {
        let items = vec![
            "Create deck",
            "Import notes into a deck",
            "Rewrite deck names in a file",
            "List note types",
            "Sync with AnkiWeb",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_create_deck(&api)?,
            1 => handle_import(&api)?,
            2 => handle_rewrite()?,
            3 => handle_model_names(&api)?,
            4 => handle_sync(&api)?,
            5 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Create a deck, then fetch its config to verify it is usable. The
/// config fetch is reported-only: the deck may still accept notes even
/// if reading its configuration fails.
fn handle_create_deck(api: &AnkiClient) -> Result<()> {
    let deck_name: String = Input::new().with_prompt("Deck name").interact_text()?;

    match api.create_deck(&deck_name) {
        Ok(res) => {
            if let Some(err) = &res.error {
                println!("Error creating deck: {}", err);
                return Ok(());
            }
            println!("Successfully created deck: '{}'", deck_name);
        }
        Err(e) => {
            println!("Create failed: {}", e);
            return Ok(());
        }
    }

    match api.get_deck_config(&deck_name) {
        Ok(info) => {
            if let Some(err) = &info.error {
                println!("Error getting deck info: {}", err);
            } else {
                println!("Deck '{}' is ready to use", deck_name);
            }
        }
        Err(e) => println!("Request failed: {}", e),
    }
    Ok(())
}

/// Prompt for a deck name and run the bulk import. The last imported
/// deck is offered as the default, so re-running an import is a matter
/// of hitting Enter twice.
fn handle_import(api: &AnkiClient) -> Result<()> {
    let deck_name: String = match load_last_deck() {
        Ok(last) => Input::new()
            .with_prompt("Deck name")
            .default(last)
            .interact_text()?,
        Err(_) => Input::new().with_prompt("Deck name").interact_text()?,
    };

    // The workflow prints per-note progress and its own summary.
    match import_notes(api, &deck_name) {
        Ok(_) => persist_last_deck(&deck_name)?,
        Err(e) => println!("Import failed: {}", e),
    }
    Ok(())
}

/// Prompt for a notes file and a new deck name, then rewrite in place.
fn handle_rewrite() -> Result<()> {
    let path: String = Input::new().with_prompt("Notes file path").interact_text()?;
    let new_name: String = Input::new().with_prompt("New deck name").interact_text()?;

    match rewrite_deck_name(&PathBuf::from(path), &new_name) {
        Ok(count) => {
            println!("Changed all deck names to: '{}'", new_name);
            println!("Total notes modified: {}", count);
        }
        Err(e) => println!("Rewrite failed: {}", e),
    }
    Ok(())
}

/// List the note types the running Anki knows about, useful when a deck
/// file references a model name that may not exist locally.
fn handle_model_names(api: &AnkiClient) -> Result<()> {
    println!("Getting available note types...");
    match api.model_names() {
        Ok(res) => {
            if let Some(err) = &res.error {
                println!("Error getting note types: {}", err);
            } else {
                println!("Available note types: {}", res.result);
            }
        }
        Err(e) => println!("Request failed: {}", e),
    }
    Ok(())
}

/// Trigger a sync with AnkiWeb, with a spinner while the request runs.
fn handle_sync(api: &AnkiClient) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Syncing with AnkiWeb...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = api.sync();
    spinner.finish_and_clear();

    match outcome {
        Ok(res) => {
            if let Some(err) = &res.error {
                println!("Error syncing: {}", err);
            } else {
                println!("Successfully synced with AnkiWeb");
            }
        }
        Err(e) => println!("Sync failed: {}", e),
    }
    Ok(())
}

/// Remember the last deck imported so the next prompt can offer it as a
/// default. Stored as a dotfile in the user's home directory.
fn persist_last_deck(deck_name: &str) -> Result<()> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(".ankideck_last_deck");
    std::fs::write(path, deck_name)?;
    Ok(())
}

/// Load the remembered deck name. Absence is not an error worth telling
/// the user about; the prompt simply has no default.
fn load_last_deck() -> Result<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(".ankideck_last_deck");
    let data = std::fs::read_to_string(path)?;
    Ok(data.trim().to_string())
}
