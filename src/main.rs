// Entrypoint for the CLI application.
// - With a positional deck name: run the bulk import directly and exit.
// - Without arguments: open the interactive menu.
// - Returns `anyhow::Result` so failures print with context.

use ankideck_cli::{api::AnkiClient, import::import_notes, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // Endpoint comes from the environment variable `ANKI_CONNECT_URL` or
    // defaults to the local AnkiConnect port. See `api::AnkiClient::from_env`.
    let api = AnkiClient::from_env()?;

    // A single positional argument is a deck name: import `<deck>.json`
    // into that deck without opening the menu.
    if let Some(deck_name) = std::env::args().nth(1) {
        import_notes(&api, &deck_name)?;
        return Ok(());
    }

    // Interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
