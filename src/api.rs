// API client module: contains a small blocking HTTP client that talks to
// the AnkiConnect automation endpoint of a locally running Anki. It is
// intentionally small and synchronous: the endpoint is a same-machine
// service and the tool only ever has one request in flight.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::notes::Note;

/// Protocol version AnkiConnect expects in every request body.
pub const ANKI_CONNECT_VERSION: u32 = 6;

/// Simple API client that holds a reqwest blocking client and the URL of
/// the AnkiConnect endpoint. All calls go through `invoke`.
#[derive(Clone)]
pub struct AnkiClient {
    client: Client,
    base_url: String,
}

/// Request body sent for every action. `params` is forwarded exactly as
/// the caller built it; the client never mutates it.
#[derive(Serialize, Debug)]
pub struct ActionRequest {
    pub action: String,
    pub version: u32,
    pub params: Value,
}

/// Response envelope returned for every action. Exactly one of
/// `result`/`error` carries meaning: an absent or null `error` means the
/// action succeeded and `result` holds its value.
#[derive(Serialize, Deserialize, Debug)]
pub struct ActionResponse {
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Whether the remote reported a failure for this action.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

impl AnkiClient {
    /// Create an AnkiClient configured from the environment variable
    /// `ANKI_CONNECT_URL` or fallback to `http://127.0.0.1:8765`, the
    /// port the AnkiConnect add-on listens on by default.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("ANKI_CONNECT_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8765".into());
        Self::new(base_url)
    }

    /// Create an AnkiClient against an explicit endpoint URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(AnkiClient {
            client,
            base_url: base_url.into(),
        })
    }

    /// Invoke one action with named parameters: a single POST whose body
    /// is `{action, version, params}`, decoded into the response envelope
    /// and returned unchanged. A non-null `error` field is NOT treated as
    /// a failure here. Different actions tolerate different errors (a
    /// deck that already exists is fine, a note that fails to add is
    /// not), so interpreting it is the caller's job. Transport failures
    /// do surface as errors.
    pub fn invoke(&self, action: &str, params: Value) -> Result<ActionResponse> {
        let body = ActionRequest {
            action: action.to_string(),
            version: ANKI_CONNECT_VERSION,
            params,
        };
        let res = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .with_context(|| format!("Failed to send '{}' request to {}", action, self.base_url))?;
        let resp: ActionResponse = res
            .json()
            .with_context(|| format!("Parsing '{}' response json", action))?;
        Ok(resp)
    }

    /// Create a deck. Anki treats this as idempotent: creating a deck
    /// that already exists reports success.
    pub fn create_deck(&self, deck: &str) -> Result<ActionResponse> {
        self.invoke("createDeck", json!({ "deck": deck }))
    }

    /// Fetch a deck's configuration, used to verify the deck is usable.
    pub fn get_deck_config(&self, deck: &str) -> Result<ActionResponse> {
        self.invoke("getDeckConfig", json!({ "deck": deck }))
    }

    /// Add a single note. `note` is the full note object from the deck
    /// file, duplicate options included.
    pub fn add_note(&self, note: &Note) -> Result<ActionResponse> {
        self.invoke("addNote", json!({ "note": note }))
    }

    /// List the note types (models) known to the running Anki.
    pub fn model_names(&self) -> Result<ActionResponse> {
        self.invoke("modelNames", json!({}))
    }

    /// Trigger a sync with AnkiWeb.
    pub fn sync(&self) -> Result<ActionResponse> {
        self.invoke("sync", json!({}))
    }
}
