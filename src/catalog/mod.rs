pub mod countries;
pub mod http;
pub mod static_catalog;

use crate::core::suggestion::Suggestion;
use crate::error::SearchError;
use crate::task::CancelToken;

pub use countries::{Country, CountryCatalog, offline_countries};
pub use http::HttpClient;
pub use static_catalog::StaticCatalog;

/// Remote (or local) source of suggestions.
///
/// `search` runs on a worker thread and may block. Implementations should
/// return `SearchError::Cancelled` once `cancel` is tripped so an abort is
/// never mistaken for a genuine failure.
pub trait SearchService: Send + Sync + 'static {
    type Item: Send + 'static;

    fn search(
        &self,
        query: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<Suggestion<Self::Item>>, SearchError>;
}
