//! Instance validation against schemas fetched by address.

use jsonschema::Validator;
use reqwest::Url;
use serde_json::{Map, Value};

use crate::error::{FetchError, SchemaError, ValidateError};
use crate::retriever::StoreRetriever;
use crate::source::Source;
use crate::store::SchemaStore;

/// Fetch the root schema at `address`, giving it a base URI.
///
/// When the schema has no base of its own, one is stamped from where it was
/// read (the URL itself, or the `file:` URL of the canonical path) so that
/// relative `$ref`s resolve next to the root document. Draft-03 and draft-04
/// schemas get `id`, later drafts `$id`. Schemas read from stdin keep the
/// resolver's default base.
pub fn root_schema(store: &impl SchemaStore, address: &str) -> Result<Value, FetchError> {
    let mut schema = store.fetch(address)?;
    if let Value::Object(map) = &mut schema {
        let key = id_keyword(map);
        if !map.contains_key(key) {
            if let Some(base) = base_uri(address) {
                map.insert(key.to_string(), Value::String(base));
            }
        }
    }
    Ok(schema)
}

/// The keyword that carries a schema's base URI under its declared draft.
fn id_keyword(schema: &Map<String, Value>) -> &'static str {
    match schema.get("$schema").and_then(Value::as_str) {
        Some(uri) if uri.contains("draft-03") || uri.contains("draft-04") => "id",
        _ => "$id",
    }
}

fn base_uri(address: &str) -> Option<String> {
    match Source::classify(address).ok()? {
        Source::Stdin => None,
        Source::Url(url) => Some(url.into()),
        Source::File(path) => {
            let absolute = std::fs::canonicalize(path).ok()?;
            Url::from_file_path(absolute).ok().map(Into::into)
        }
    }
}

/// Compile a validator whose external `$ref`s are fetched through `store`.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` if the schema doesn't compile,
/// including when a referenced document cannot be fetched.
pub fn validator_for<S: SchemaStore + 'static>(
    schema: &Value,
    store: S,
) -> Result<Validator, ValidateError> {
    jsonschema::options()
        .with_retriever(StoreRetriever::new(store))
        .build(schema)
        .map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })
}

/// Validate an instance with an already-compiled validator.
///
/// Use this when validating several instances against the same schema.
pub fn validate_instance(validator: &Validator, instance: &Value) -> Result<(), ValidateError> {
    let errors: Vec<SchemaError> = validator
        .iter_errors(instance)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::Invalid { errors })
    }
}

/// Validate an instance against the schema at `schema_address`.
///
/// # Errors
///
/// Returns `ValidateError::Fetch` if the root schema can't be fetched,
/// `ValidateError::InvalidSchema` if it doesn't compile, or
/// `ValidateError::Invalid` if the instance doesn't match.
pub fn validate<S: SchemaStore + Clone + 'static>(
    store: &S,
    schema_address: &str,
    instance: &Value,
) -> Result<(), ValidateError> {
    let schema = root_schema(store, schema_address)?;
    let validator = validator_for(&schema, store.clone())?;
    validate_instance(&validator, instance)
}
