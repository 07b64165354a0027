// Deck-file handling: loading and saving the JSON note collections that
// sit next to the tool (`<deckName>.json`), plus the two note attributes
// this tool is allowed to touch: `deckName` and `options`. Every other
// field belongs to Anki's note schema and round-trips untouched.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;

/// Duplicate-handling options attached to a note before it is sent to
/// `addNote`. `forced()` is the only shape this tool ever writes: scope
/// the duplicate check to the target deck and turn the check off, so an
/// import never skips a note whose content already exists in the deck.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct NoteOptions {
    #[serde(rename = "duplicateScope")]
    pub duplicate_scope: String,
    #[serde(rename = "duplicateCheck")]
    pub duplicate_check: bool,
}

impl NoteOptions {
    pub fn forced() -> Self {
        NoteOptions {
            duplicate_scope: "deck".into(),
            duplicate_check: false,
        }
    }
}

/// One note as stored in a deck file. The note shape (fields, tags,
/// model name) is defined by the remote note-type schema and is opaque
/// here: everything except `deckName` and `options` lands in `rest` and
/// is written back verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Note {
    #[serde(rename = "deckName", skip_serializing_if = "Option::is_none")]
    pub deck_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Note {
    /// Overwrite the note's options with the forced duplicate-acceptance
    /// value. Deliberately a replacement, not a merge: whatever options
    /// the file carried are discarded for the send.
    pub fn force_duplicate_options(&mut self) {
        self.options = Some(json!(NoteOptions::forced()));
    }
}

/// Load a deck file: a JSON array of note objects.
pub fn load_notes(path: &Path) -> Result<Vec<Note>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read notes file {}", path.display()))?;
    let notes: Vec<Note> = serde_json::from_str(&data)
        .with_context(|| format!("Parsing notes json in {}", path.display()))?;
    Ok(notes)
}

/// Write a deck file back to disk, pretty-printed the way the exported
/// files are: two-space indentation, non-ASCII text verbatim, trailing
/// newline.
pub fn save_notes(path: &Path, notes: &[Note]) -> Result<()> {
    let mut data = serde_json::to_string_pretty(notes).context("Serializing notes to json")?;
    data.push('\n');
    std::fs::write(path, data)
        .with_context(|| format!("Failed to write notes file {}", path.display()))?;
    Ok(())
}

/// Point every note in `file_path` at `new_deck_name`, in place, and
/// return how many notes were touched (always all of them). No backup is
/// made: this is a quick corpus-editing tool and the file is the state.
pub fn rewrite_deck_name(file_path: &Path, new_deck_name: &str) -> Result<usize> {
    let mut notes = load_notes(file_path)?;
    for note in &mut notes {
        note.deck_name = Some(new_deck_name.to_string());
    }
    save_notes(file_path, &notes)?;
    Ok(notes.len())
}
