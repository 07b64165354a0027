// Bulk note import: the one workflow in this tool with more than a
// single request. Mirrors what an operator would do by hand: make sure
// the deck exists, push every note from the deck file, then sync.

use anyhow::{bail, Result};
use std::path::Path;

use crate::api::AnkiClient;
use crate::notes;

/// Counts accumulated over one import run. Partial failure is normal:
/// the run finishes with whatever it managed to add.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub failed: usize,
}

/// Import all notes from `<deck_name>.json` in the current directory
/// into the deck of the same name. See `import_notes_from`.
pub fn import_notes(api: &AnkiClient, deck_name: &str) -> Result<ImportSummary> {
    let file = format!("{}.json", deck_name);
    import_notes_from(api, deck_name, Path::new(&file))
}

/// Import all notes from `notes_file` into `deck_name`, in file order.
///
/// Deck creation and file loading are fatal: if the deck cannot be
/// created the notes would land nowhere sensible, so nothing is sent.
/// A single rejected note is not fatal: one malformed note should not
/// block the rest of the deck, so the failure is counted and the run
/// continues. Sync runs exactly once at the end either way; a sync error
/// is reported without touching the counts.
pub fn import_notes_from(
    api: &AnkiClient,
    deck_name: &str,
    notes_file: &Path,
) -> Result<ImportSummary> {
    let created = api.create_deck(deck_name)?;
    if let Some(err) = &created.error {
        bail!("Error creating deck: {}", err);
    }
    println!("Successfully created/verified deck: '{}'", deck_name);

    let mut notes = notes::load_notes(notes_file)?;

    let mut summary = ImportSummary::default();
    for note in &mut notes {
        // Overwrites whatever options the file carried; duplicates are
        // accepted so re-importing a deck never drops notes.
        note.force_duplicate_options();

        let res = api.add_note(note)?;
        match &res.error {
            Some(err) => {
                println!("Error adding note: {}", err);
                summary.failed += 1;
            }
            None => {
                println!("Added note with ID: {}", res.result);
                summary.added += 1;
            }
        }
    }

    println!();
    println!("Summary:");
    println!("Successfully added: {} notes", summary.added);
    println!("Failed to add: {} notes", summary.failed);

    println!("\nSyncing with AnkiWeb...");
    let sync_res = api.sync()?;
    if let Some(err) = &sync_res.error {
        println!("Error syncing: {}", err);
    } else {
        println!("Successfully synced with AnkiWeb");
    }

    Ok(summary)
}
