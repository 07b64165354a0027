//! End-to-end tests for the bulk import workflow against a fake
//! AnkiConnect endpoint: counter accounting, the forced duplicate
//! options on every `addNote`, the single trailing sync, and the fatal
//! deck-creation path.

use std::path::PathBuf;

use ankideck_cli::api::AnkiClient;
use ankideck_cli::import::{import_notes_from, ImportSummary};
use serde_json::json;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

fn mock_endpoint() -> (Runtime, MockServer) {
    let rt = Runtime::new().expect("tokio runtime");
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn ok(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": result, "error": null }))
}

fn err(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": null, "error": message }))
}

fn write_deck_file(dir: &TempDir, deck: &str, notes: serde_json::Value) -> PathBuf {
    let path = dir.path().join(format!("{}.json", deck));
    std::fs::write(&path, serde_json::to_string_pretty(&notes).unwrap()).unwrap();
    path
}

/// Matches an `addNote` request whose note options are EXACTLY the
/// forced duplicate-acceptance value. A merged or partially kept options
/// object would not match; the workflow must replace it wholesale.
struct ForcedOptionsExactly;

impl Match for ForcedOptionsExactly {
    fn matches(&self, request: &Request) -> bool {
        let body: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(v) => v,
            Err(_) => return false,
        };
        body["params"]["note"]["options"]
            == json!({ "duplicateScope": "deck", "duplicateCheck": false })
    }
}

#[test]
fn counts_per_note_failures_and_syncs_exactly_once() {
    let (rt, server) = mock_endpoint();

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "createDeck" })))
            .respond_with(ok(json!(1651445861967u64)))
            .expect(1)
            .mount(&server)
            .await;

        // The fake Anki rejects the note whose front is "broken". It
        // still has to carry the forced options to match at all.
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "addNote",
                "params": { "note": { "fields": { "Front": "broken" } } }
            })))
            .and(ForcedOptionsExactly)
            .respond_with(err("cannot create note because it is empty"))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        // Every other addNote succeeds, and only matches when the note
        // carries exactly the forced options.
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "addNote" })))
            .and(ForcedOptionsExactly)
            .respond_with(ok(json!(1496198395707u64)))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "sync" })))
            .respond_with(ok(json!(null)))
            .expect(1)
            .mount(&server)
            .await;
    });

    let dir = TempDir::new().unwrap();
    let file = write_deck_file(
        &dir,
        "korean",
        json!([
            {
                "deckName": "korean",
                "modelName": "Basic",
                "fields": { "Front": "안녕하세요", "Back": "hello" },
                "tags": ["greeting"]
            },
            {
                "deckName": "korean",
                "modelName": "Basic",
                "fields": { "Front": "broken", "Back": "" },
                // Pre-existing options must be overwritten, not merged.
                "options": { "allowDuplicate": true, "duplicateScope": "collection" }
            },
            {
                "deckName": "korean",
                "modelName": "Basic",
                "fields": { "Front": "감사합니다", "Back": "thank you" },
                "tags": []
            }
        ]),
    );

    let api = AnkiClient::new(server.uri()).unwrap();
    let summary = import_notes_from(&api, "korean", &file).unwrap();

    assert_eq!(summary, ImportSummary { added: 2, failed: 1 });
    rt.block_on(server.verify());
}

#[test]
fn failed_deck_creation_sends_no_notes_and_no_sync() {
    let (rt, server) = mock_endpoint();

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "createDeck" })))
            .respond_with(err("collection is not available"))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "addNote" })))
            .respond_with(ok(json!(null)))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "sync" })))
            .respond_with(ok(json!(null)))
            .expect(0)
            .mount(&server)
            .await;
    });

    // The deck file exists and is valid, so the remote error is the only
    // reason nothing gets sent.
    let dir = TempDir::new().unwrap();
    let file = write_deck_file(
        &dir,
        "korean",
        json!([
            {
                "deckName": "korean",
                "modelName": "Basic",
                "fields": { "Front": "안녕하세요", "Back": "hello" }
            }
        ]),
    );

    let api = AnkiClient::new(server.uri()).unwrap();
    assert!(import_notes_from(&api, "korean", &file).is_err());
    rt.block_on(server.verify());
}

#[test]
fn missing_deck_file_aborts_after_deck_creation_only() {
    let (rt, server) = mock_endpoint();

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "createDeck" })))
            .respond_with(ok(json!(1651445861967u64)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "addNote" })))
            .respond_with(ok(json!(null)))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "sync" })))
            .respond_with(ok(json!(null)))
            .expect(0)
            .mount(&server)
            .await;
    });

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("korean.json");

    let api = AnkiClient::new(server.uri()).unwrap();
    assert!(import_notes_from(&api, "korean", &missing).is_err());
    rt.block_on(server.verify());
}

#[test]
fn sync_error_is_reported_without_touching_the_counts() {
    let (rt, server) = mock_endpoint();

    rt.block_on(async {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "createDeck" })))
            .respond_with(ok(json!(1651445861967u64)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "addNote" })))
            .and(ForcedOptionsExactly)
            .respond_with(ok(json!(1496198395707u64)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "action": "sync" })))
            .respond_with(err("sync failed: authentication required"))
            .expect(1)
            .mount(&server)
            .await;
    });

    let dir = TempDir::new().unwrap();
    let file = write_deck_file(
        &dir,
        "korean",
        json!([
            {
                "deckName": "korean",
                "modelName": "Basic",
                "fields": { "Front": "안녕하세요", "Back": "hello" }
            }
        ]),
    );

    let api = AnkiClient::new(server.uri()).unwrap();
    let summary = import_notes_from(&api, "korean", &file).unwrap();

    // The sync failure is console-reported only; the import still
    // completed and says so.
    assert_eq!(summary, ImportSummary { added: 1, failed: 0 });
    rt.block_on(server.verify());
}
