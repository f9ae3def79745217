//! Declarative endpoint descriptors.
//!
//! An `Endpoint` describes one request: where it goes, which method it uses,
//! which headers it carries, its parameters and any files to upload. It is
//! built fresh per call and dropped when the call completes.

use serde_json::{Map, Value};
use url::Url;

use crate::error::NetworkError;
use crate::http::HttpMethod;
use crate::multipart::MultipartFile;

/// Parameters of an endpoint. Insertion order is preserved so query strings
/// and multipart bodies come out in the order fields were added.
pub type Parameters = Map<String, Value>;

/// A single HTTP request, described as data.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub base_url: String,
    pub path: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    /// Query parameters for GET, a JSON body otherwise.
    pub parameters: Option<Parameters>,
    pub files: Vec<MultipartFile>,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            method,
            headers: Vec::new(),
            parameters: None,
            files: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds one parameter, creating the parameter map if needed.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_file(mut self, file: MultipartFile) -> Self {
        self.files.push(file);
        self
    }

    /// Resolves the absolute URL, without query parameters.
    pub fn url(&self) -> Result<Url, NetworkError> {
        join_url(&self.base_url, &self.path)
    }

    /// Resolves the absolute URL. For GET requests the parameters are
    /// appended as query pairs; `null` values are left out.
    pub fn url_with_query(&self) -> Result<Url, NetworkError> {
        let mut url = self.url()?;
        if self.method == HttpMethod::Get {
            let pairs: Vec<(&String, String)> = self
                .parameters
                .iter()
                .flatten()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key, value_text(value)))
                .collect();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        Ok(url)
    }
}

/// Joins `base_url` and `path` with exactly one `/` between them.
///
/// The base path gains a trailing `/` if it lacks one; the path is stripped
/// of leading and trailing `/`. An empty path leaves the base URL unchanged.
pub fn join_url(base_url: &str, path: &str) -> Result<Url, NetworkError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| NetworkError::InvalidUrl(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(NetworkError::InvalidUrl(base_url.to_string()));
    }

    if !path.is_empty() {
        let base_path = url.path();
        let base_path = if base_path.ends_with('/') {
            base_path.to_string()
        } else {
            format!("{base_path}/")
        };
        url.set_path(&format!("{base_path}{}", path.trim_matches('/')));
    }
    Ok(url)
}

/// Text form of a parameter value: strings verbatim, everything else as JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
