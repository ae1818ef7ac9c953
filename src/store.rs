//! Schema stores: documents fetched by address on demand.

use std::sync::{Arc, OnceLock};

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, HeaderError};
use crate::headers::HeaderSet;
use crate::source::read_text_with;

/// Label used in parse errors for fetched schema documents.
pub const SCHEMA_LABEL: &str = "JSON Schema";

/// Something that can produce the JSON document at an address.
///
/// Resolution code asks for one address at a time, as it discovers them
/// (for example while following `$ref` chains), and takes any implementor.
pub trait SchemaStore: Send + Sync {
    /// Fetch and parse the document at `address`.
    fn fetch(&self, address: &str) -> Result<Value, FetchError>;
}

impl<S: SchemaStore + ?Sized> SchemaStore for &S {
    fn fetch(&self, address: &str) -> Result<Value, FetchError> {
        (**self).fetch(address)
    }
}

impl<S: SchemaStore + ?Sized> SchemaStore for Arc<S> {
    fn fetch(&self, address: &str) -> Result<Value, FetchError> {
        (**self).fetch(address)
    }
}

/// Store that reads every address from stdin, HTTP(S) or disk.
///
/// Holds the header set given at construction and one HTTP client, built on
/// the first remote fetch and shared by clones. Documents are never cached
/// between fetches.
#[derive(Debug, Clone, Default)]
pub struct FetchingSchemaStore {
    headers: HeaderSet,
    client: Arc<OnceLock<Client>>,
}

impl FetchingSchemaStore {
    /// Create a store that sends no extra HTTP headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from `"Name: Value"` header lines.
    ///
    /// # Errors
    ///
    /// Returns `HeaderError::Malformed` if any non-empty line lacks a `:`.
    pub fn with_headers<I, S>(lines: I) -> Result<Self, HeaderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            headers: HeaderSet::parse(lines)?,
            client: Arc::default(),
        })
    }

    /// The headers attached to every remote fetch.
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }
}

impl SchemaStore for FetchingSchemaStore {
    fn fetch(&self, address: &str) -> Result<Value, FetchError> {
        debug!(address, "fetching schema");
        let text = read_text_with(address, &self.headers, &self.client)?;
        parse_json(&text, SCHEMA_LABEL, address)
    }
}

/// Parse text as JSON, naming what was parsed and where it came from.
///
/// # Errors
///
/// Returns `FetchError::ParseFailure` if the text isn't valid JSON.
pub fn parse_json(text: &str, label: &str, address: &str) -> Result<Value, FetchError> {
    serde_json::from_str(text).map_err(|source| FetchError::ParseFailure {
        address: address.to_string(),
        label: label.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn fetch_valid_file() {
        let file = temp_file(r#"{"type":"string"}"#);
        let store = FetchingSchemaStore::new();

        let schema = store.fetch(file.path().to_str().unwrap()).unwrap();
        assert_eq!(schema, json!({ "type": "string" }));
    }

    #[test]
    fn fetch_invalid_json_is_parse_failure() {
        let file = temp_file("{type:}");
        let address = file.path().to_str().unwrap();

        let err = FetchingSchemaStore::new().fetch(address).unwrap_err();
        match err {
            FetchError::ParseFailure {
                address: failed,
                label,
                ..
            } => {
                assert_eq!(failed, address);
                assert_eq!(label, SCHEMA_LABEL);
            }
            other => panic!("expected ParseFailure, got {:?}", other),
        }
    }

    #[test]
    fn fetch_missing_address() {
        let err = FetchingSchemaStore::new()
            .fetch("no/such/schema.json")
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound { ref address } if address == "no/such/schema.json"));
    }

    #[test]
    fn fetch_is_repeatable_and_uncached() {
        let file = temp_file(r#"{"type":"string"}"#);
        let address = file.path().to_str().unwrap().to_string();
        let store = FetchingSchemaStore::new();
        assert_eq!(store.fetch(&address).unwrap()["type"], "string");

        std::fs::write(&address, r#"{"type":"integer"}"#).unwrap();

        assert_eq!(store.fetch(&address).unwrap()["type"], "integer");
    }

    #[test]
    fn with_headers_rejects_malformed_line() {
        let result = FetchingSchemaStore::with_headers(["Accept: application/json", "oops"]);
        assert!(matches!(result, Err(HeaderError::Malformed { .. })));
    }

    #[test]
    fn with_headers_keeps_parsed_set() {
        let store = FetchingSchemaStore::with_headers(["Authorization: Bearer t"]).unwrap();
        assert_eq!(store.headers().get("Authorization"), Some("Bearer t"));
    }

    #[test]
    fn store_usable_through_reference_and_arc() {
        fn fetch_type(store: impl SchemaStore, address: &str) -> Value {
            store.fetch(address).unwrap()["type"].clone()
        }

        let file = temp_file(r#"{"type":"boolean"}"#);
        let address = file.path().to_str().unwrap();
        let store = FetchingSchemaStore::new();

        assert_eq!(fetch_type(&store, address), "boolean");
        assert_eq!(fetch_type(Arc::new(store), address), "boolean");
    }

    #[test]
    fn http_client_built_once_and_shared() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/schema.json")
            .with_body(r#"{"type":"string"}"#)
            .expect(2)
            .create();
        let url = format!("{}/schema.json", server.url());
        let store = FetchingSchemaStore::new();
        let file = temp_file("{}");

        store.fetch(file.path().to_str().unwrap()).unwrap();
        assert!(store.client.get().is_none());

        store.fetch(&url).unwrap();
        let first = store.client.get().unwrap() as *const Client;
        let clone = store.clone();
        clone.fetch(&url).unwrap();
        assert_eq!(clone.client.get().unwrap() as *const Client, first);
        mock.assert();
    }

    #[test]
    fn parse_json_uses_given_label() {
        let err = parse_json("[1,", "JSON instance", "-").unwrap_err();
        assert!(matches!(err, FetchError::ParseFailure { ref label, .. } if label == "JSON instance"));
    }
}
