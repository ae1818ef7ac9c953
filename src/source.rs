//! Source reading: standard input, HTTP(S) URLs and local files.
//!
//! Every address goes through [`Source::classify`], and every failure while
//! opening or draining a source is normalized into a [`FetchError`] in this
//! module, so callers see the same error shapes whatever the source kind.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use tracing::debug;

use crate::error::{FetchError, UNKNOWN_ERROR};
use crate::headers::HeaderSet;

/// Address that selects the process's standard input.
pub const STDIN_ADDRESS: &str = "-";

/// The kind of source an address refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Url(Url),
    File(PathBuf),
}

impl Source {
    /// Classify an address.
    ///
    /// Checks run in a fixed order and the first match wins: the `-`
    /// sentinel, then URL syntax, then existence on the local filesystem.
    /// URL-shaped addresses never touch the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotFound` if the address matches none of them.
    pub fn classify(address: &str) -> Result<Self, FetchError> {
        if address == STDIN_ADDRESS {
            return Ok(Source::Stdin);
        }
        if let Some(url) = parse_url(address) {
            return Ok(Source::Url(url));
        }
        let path = Path::new(address);
        if path.exists() {
            return Ok(Source::File(path.to_path_buf()));
        }
        Err(FetchError::NotFound {
            address: address.to_string(),
        })
    }
}

/// Check if a string looks like a URL (a scheme plus a non-empty authority).
///
/// This is a syntactic check only. `ftp://host/x` counts as a URL here and
/// fails later at request time.
pub fn is_url(s: &str) -> bool {
    parse_url(s).is_some()
}

fn parse_url(s: &str) -> Option<Url> {
    let url = Url::parse(s).ok()?;
    url.host_str().filter(|host| !host.is_empty())?;
    Some(url)
}

/// Open a readable stream for an address.
///
/// `headers` are attached to the GET request for URL addresses and ignored
/// otherwise. The request is sent once, with no retry and no timeout.
///
/// # Errors
///
/// Returns `FetchError::NotFound` for unresolvable addresses and
/// `FetchError::ReadFailure` if the source cannot be opened.
pub fn open_stream(address: &str, headers: &HeaderSet) -> Result<Box<dyn Read>, FetchError> {
    open_stream_with(address, headers, &OnceLock::new())
}

/// Like [`open_stream`], reusing the HTTP client held in `client`.
///
/// The client is built on the first URL address and kept for later calls.
pub(crate) fn open_stream_with(
    address: &str,
    headers: &HeaderSet,
    client: &OnceLock<Client>,
) -> Result<Box<dyn Read>, FetchError> {
    match Source::classify(address)? {
        Source::Stdin => {
            debug!("reading from stdin");
            Ok(Box::new(io::stdin()))
        }
        Source::Url(url) => {
            debug!(%url, headers = headers.len(), "fetching over HTTP");
            let response = http_get(client, url, headers).map_err(|e| read_failure(address, &e))?;
            Ok(Box::new(response))
        }
        Source::File(path) => {
            debug!(path = %path.display(), "opening file");
            let file = File::open(&path).map_err(|e| read_failure(address, &e))?;
            Ok(Box::new(file))
        }
    }
}

/// Read the full text content at an address.
///
/// # Errors
///
/// Same as [`open_stream`], plus `FetchError::ReadFailure` if the stream
/// breaks off or is not valid UTF-8.
pub fn read_text(address: &str, headers: &HeaderSet) -> Result<String, FetchError> {
    read_text_with(address, headers, &OnceLock::new())
}

/// Like [`read_text`], reusing the HTTP client held in `client`.
pub(crate) fn read_text_with(
    address: &str,
    headers: &HeaderSet,
    client: &OnceLock<Client>,
) -> Result<String, FetchError> {
    let stream = open_stream_with(address, headers, client)?;
    drain(address, stream)
}

/// Consume a stream to the end as UTF-8 text.
pub(crate) fn drain(address: &str, mut stream: impl Read) -> Result<String, FetchError> {
    let mut text = String::new();
    stream
        .read_to_string(&mut text)
        .map_err(|e| read_failure(address, &e))?;
    Ok(text)
}

fn http_get(client: &OnceLock<Client>, url: Url, headers: &HeaderSet) -> Result<Response, HttpError> {
    let client = match client.get() {
        Some(client) => client,
        None => {
            let built = Client::builder().timeout(None::<Duration>).build()?;
            client.get_or_init(|| built)
        }
    };
    let response = client.get(url).headers(header_map(headers)?).send()?;
    // Check for HTTP errors before handing out the body
    Ok(response.error_for_status()?)
}

fn header_map(headers: &HeaderSet) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| HttpError::Header(format!("invalid header name \"{}\"", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| HttpError::Header(format!("invalid value for header \"{}\"", name)))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

/// Failures on the HTTP path before the body is read.
#[derive(Debug, thiserror::Error)]
enum HttpError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Header(String),
}

/// Normalize any source failure into `FetchError::ReadFailure`.
fn read_failure(address: &str, err: &dyn std::fmt::Display) -> FetchError {
    let message = err.to_string();
    let message = if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    };
    debug!(address, %message, "read failed");
    FetchError::ReadFailure {
        address: address.to_string(),
        message,
    }
}
