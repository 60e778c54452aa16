use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{QUERY_RESPONSE, QUERY_TRANSACTION_ID};
use crate::error::DpmError;

/// Where to send the payer after a relay response, as a named target plus
/// query parameters. Resolving the target to an absolute URL belongs to the
/// caller's router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectDescriptor {
    pub target: String,
    pub query: Vec<(String, String)>,
}

impl RedirectDescriptor {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            query: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Render against the absolute URL the caller resolved [`Self::target`] to.
    ///
    /// Parameters are form-urlencoded and appended to any query `base` has.
    pub fn to_url(&self, base: &str) -> Result<Url, DpmError> {
        Ok(Url::parse_with_params(base, &self.query)?)
    }
}

/// Parameters shown on the success or failure page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub response: String,
    pub transaction_id: Option<String>,
}

impl ResultPage {
    /// Parse the query string of a result page request (without the `?`).
    pub fn from_query(query: &str) -> Self {
        let mut page = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                QUERY_RESPONSE => page.response = value.into_owned(),
                QUERY_TRANSACTION_ID => page.transaction_id = Some(value.into_owned()),
                _ => {}
            }
        }
        page
    }
}
