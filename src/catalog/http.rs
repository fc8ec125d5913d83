use crate::error::SearchError;
use crate::task::CancelToken;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Thin JSON-over-HTTP client used by remote catalogs.
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }

    /// GETs `url` and decodes the JSON body.
    ///
    /// `Ok(None)` means the server answered 404. The token is checked around
    /// the call: the request itself runs to completion, but an aborted
    /// lookup always reports `SearchError::Cancelled`.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<Option<T>, SearchError> {
        cancel.check()?;
        debug!(url, "GET");

        let response = match self
            .agent
            .get(url)
            .set("Content-Type", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => {
                cancel.check()?;
                return Ok(None);
            }
            Err(err) => {
                cancel.check()?;
                return Err(err.into());
            }
        };

        let body = response.into_string()?;
        cancel.check()?;
        Ok(Some(serde_json::from_str(body.as_str())?))
    }
}

/// RFC 3986 unreserved characters pass through a path segment unescaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes one URL path segment.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}
