//! HTTP header configuration for remote fetches.

use std::collections::HashMap;

use crate::error::HeaderError;

/// Header names mapped to values, attached to every remote request.
///
/// Built once from `"Name: Value"` lines. Names keep the case they were given;
/// a repeated name overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: HashMap<String, String>,
}

impl HeaderSet {
    /// An empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse header lines of the form `"Name: Value"`.
    ///
    /// Name and value are trimmed and the value may itself contain `:`.
    /// Empty lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `HeaderError::Malformed` for the first non-empty line without a
    /// `:` separator.
    pub fn parse<I, S>(lines: I) -> Result<Self, HeaderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = HashMap::new();
        for line in lines {
            let line = line.as_ref();
            if line.is_empty() {
                continue;
            }
            let (name, value) = line.split_once(':').ok_or_else(|| HeaderError::Malformed {
                line: line.to_string(),
            })?;
            entries.insert(name.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { entries })
    }

    /// The value for `name`, matched exactly as supplied.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no headers are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
