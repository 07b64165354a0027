// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to drive a locally running Anki through
// its AnkiConnect automation endpoint.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with AnkiConnect (one POST per
//   action) and the request/response envelope shapes.
// - `notes`: Loads and saves the on-disk deck files and owns the two
//   note attributes the tool touches (`deckName`, `options`).
// - `import`: The bulk import workflow (create deck, add notes, sync).
// - `ui`: Implements the terminal menu flows and delegates to the above.
//
// Keeping this separation makes the client and workflows testable
// against a fake endpoint without going through the interactive UI.
pub mod api;
pub mod import;
pub mod notes;
pub mod ui;
