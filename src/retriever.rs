//! Bridge from a [`SchemaStore`] to the `jsonschema` reference resolver.

use jsonschema::{Retrieve, Uri};
use reqwest::Url;
use serde_json::Value;

use crate::store::SchemaStore;

/// Scheme `jsonschema` uses as the base for schemas without an `$id`.
const DEFAULT_BASE_SCHEME: &str = "json-schema";

/// Resolves external `$ref` targets by fetching them through a store.
///
/// The resolver calls this once per document it has not seen yet.
#[derive(Debug, Clone)]
pub struct StoreRetriever<S> {
    store: S,
}

impl<S: SchemaStore> StoreRetriever<S> {
    /// Wrap a store for use as a `jsonschema` retriever.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: SchemaStore> Retrieve for StoreRetriever<S> {
    fn retrieve(&self, uri: &Uri<&str>) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let address = address_for_uri(uri.as_str());
        Ok(self.store.fetch(&address)?)
    }
}

/// Map a resolver URI to a store address.
///
/// `file:` URIs become filesystem paths, URIs under the resolver's default
/// base become percent-decoded paths relative to the working directory,
/// anything else is passed through unchanged.
pub fn address_for_uri(uri: &str) -> String {
    let Ok(url) = Url::parse(uri) else {
        return uri.to_string();
    };
    match url.scheme() {
        "file" => match url.to_file_path() {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(()) => uri.to_string(),
        },
        DEFAULT_BASE_SCHEME => {
            let path = url.path().trim_start_matches('/');
            match urlencoding::decode(path) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => path.to_string(),
            }
        }
        _ => uri.to_string(),
    }
}
