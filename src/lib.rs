//! Schema Fetch
//!
//! Reads text from standard input, an HTTP(S) URL or a local file behind one
//! contract, and fetches JSON Schema documents by address on demand.
//!
//! # Addresses
//!
//! | Address | Source |
//! |---------|--------|
//! | `-` | standard input |
//! | scheme + authority (`https://host/x.json`) | HTTP GET with configured headers |
//! | existing path | local file |
//! | anything else | `DriverInputFileDoesNotExist` |
//!
//! # Example
//!
//! ```no_run
//! use schema_fetch::{FetchingSchemaStore, SchemaStore};
//!
//! let store = FetchingSchemaStore::with_headers(["Authorization: Bearer token"]).unwrap();
//! let schema = store.fetch("https://example.com/schemas/order.json").unwrap();
//! assert!(schema.is_object());
//! ```
//!
//! Any [`SchemaStore`] can back `$ref` resolution during validation:
//!
//! ```no_run
//! use schema_fetch::{validate, FetchingSchemaStore};
//! use serde_json::json;
//!
//! let store = FetchingSchemaStore::new();
//! validate(&store, "schemas/order.json", &json!({ "id": "A-1" })).unwrap();
//! ```

mod error;
mod headers;
mod retriever;
mod source;
mod store;
mod validator;

pub use error::{FetchError, HeaderError, SchemaError, ValidateError, UNKNOWN_ERROR};
pub use headers::HeaderSet;
pub use retriever::{address_for_uri, StoreRetriever};
pub use source::{is_url, open_stream, read_text, Source, STDIN_ADDRESS};
pub use store::{parse_json, FetchingSchemaStore, SchemaStore, SCHEMA_LABEL};
pub use validator::{root_schema, validate, validate_instance, validator_for};
