//! Generic record endpoints (`records/<uri>/...`).

use tracing::instrument;

use super::CerbClient;
use crate::envelope::Envelope;
use crate::error::CerbError;
use crate::form::{Fields, FormPairs, flatten_fields};
use crate::method::RestMethod;

/// Page size used by searches that do not set one.
pub const DEFAULT_SEARCH_LIMIT: u32 = 100;

fn expand_param(expand: &[&str]) -> FormPairs {
    FormPairs::new().with("expand", expand.join(","))
}

/// Parameters for a `records/<uri>/search` call.
///
/// ## Examples
///
/// ```rust
/// use cerb::SearchQuery;
///
/// let query = SearchQuery::new()
///     .query("status:open")
///     .expand(["custom_", "links"])
///     .limit(25);
///
/// assert_eq!(
///     query.to_params().encode(),
///     "expand=custom_%2Clinks&limit=25&page=&q=status%3Aopen"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    expand: Vec<String>,
    limit: Option<u32>,
    page: Option<u32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Cerb search query (`q`).
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the keys to expand in each result.
    pub fn expand<I, S>(mut self, expand: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand = expand.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the page size. Defaults to [`DEFAULT_SEARCH_LIMIT`].
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Encodes as `expand`, `limit`, `page`, `q`, in that order.
    pub fn to_params(&self) -> FormPairs {
        FormPairs::new()
            .with("expand", self.expand.join(","))
            .with(
                "limit",
                self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).to_string(),
            )
            .with("page", self.page.map(|p| p.to_string()).unwrap_or_default())
            .with("q", self.query.as_str())
    }
}

impl CerbClient {
    /// Fetches one record.
    #[instrument(skip(self))]
    pub async fn get_record(
        &self,
        uri: &str,
        id: u64,
        expand: &[&str],
    ) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Get,
            &format!("records/{uri}/{id}"),
            &FormPairs::new(),
            &expand_param(expand),
        )
        .await
    }

    /// Creates a record from `fields`.
    #[instrument(skip(self, fields))]
    pub async fn create_record(
        &self,
        uri: &str,
        expand: &[&str],
        fields: &Fields,
    ) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Post,
            &format!("records/{uri}/create"),
            &flatten_fields(fields),
            &expand_param(expand),
        )
        .await
    }

    /// Updates the given fields of one record.
    #[instrument(skip(self, fields))]
    pub async fn update_record(
        &self,
        uri: &str,
        id: u64,
        expand: &[&str],
        fields: &Fields,
    ) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Put,
            &format!("records/{uri}/{id}"),
            &flatten_fields(fields),
            &expand_param(expand),
        )
        .await
    }

    /// Updates the record matching `query`, or creates one.
    #[instrument(skip(self, fields))]
    pub async fn upsert_record(
        &self,
        uri: &str,
        query: &str,
        expand: &[&str],
        fields: &Fields,
    ) -> Result<Envelope, CerbError> {
        let params = expand_param(expand).with("query", query);
        self.send(
            RestMethod::Patch,
            &format!("records/{uri}/upsert"),
            &flatten_fields(fields),
            &params,
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_record(&self, uri: &str, id: u64) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Delete,
            &format!("records/{uri}/{id}"),
            &FormPairs::new(),
            &FormPairs::new(),
        )
        .await
    }

    /// Runs a search. The response carries a `results` array.
    #[instrument(skip(self))]
    pub async fn search_records(
        &self,
        uri: &str,
        query: &SearchQuery,
    ) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Get,
            &format!("records/{uri}/search"),
            &FormPairs::new(),
            &query.to_params(),
        )
        .await
    }
}
