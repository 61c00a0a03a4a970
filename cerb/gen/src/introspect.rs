//! Live schema discovery.
//!
//! [`Introspector`] lists contexts and pulls a few example records for
//! each one. Per-context failures are contained: a context that fails to
//! deserialize becomes a [`SkippedContext`], and an example search the
//! server refuses becomes [`Examples::Inaccessible`]. Only client-level
//! failures (transport, the context list itself) abort discovery.

use std::fmt;

use cerb::{CerbClient, CerbError, SearchQuery};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::schema::SchemaContext;

/// The server refused or garbled the example search for one context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SchemaAccessError {
    /// Alias of the context whose examples were requested.
    pub alias: String,
    pub message: String,
}

/// A `contexts/list` entry that could not be read as a [`SchemaContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedContext {
    /// Position in the `results` array.
    pub index: usize,
    /// The entry's `id`, when it had a readable one.
    pub id: Option<String>,
    pub reason: String,
}

impl fmt::Display for SkippedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "context #{} ({id}): {}", self.index, self.reason),
            None => write!(f, "context #{}: {}", self.index, self.reason),
        }
    }
}

/// Outcome of an example-record search.
#[derive(Debug, Clone, PartialEq)]
pub enum Examples {
    Found(Vec<Map<String, Value>>),
    /// The search succeeded with no results.
    Empty,
    Inaccessible(SchemaAccessError),
}

impl Examples {
    /// The first example, if any.
    pub fn first(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Found(records) => records.first(),
            _ => None,
        }
    }
}

/// How many examples to pull per context, and what to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleQuery {
    pub limit: u32,
    pub expand: &'static [&'static str],
}

impl ExampleQuery {
    /// One example with custom fields, enough to infer accessors.
    pub const RECORDS: Self = Self {
        limit: 1,
        expand: &["custom_"],
    };

    /// Up to three examples with custom fields and links.
    pub const CHEAT_SHEET: Self = Self {
        limit: 3,
        expand: &["custom_", "link"],
    };

    fn to_search(self) -> SearchQuery {
        SearchQuery::new()
            .expand(self.expand.iter().copied())
            .limit(self.limit)
    }
}

/// A context together with its raw listing and examples.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredContext {
    pub context: SchemaContext,
    /// The `contexts/list` entry exactly as received.
    pub raw: Value,
    pub examples: Examples,
}

/// The parsed `contexts/list` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaListing {
    /// Readable contexts with their raw entries, in server order.
    pub contexts: Vec<(SchemaContext, Value)>,
    pub skipped: Vec<SkippedContext>,
}

/// Everything a generator run needs, captured up front.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSnapshot {
    pub version: String,
    pub build: String,
    pub captured_at: DateTime<Utc>,
    pub contexts: Vec<DiscoveredContext>,
    pub skipped: Vec<SkippedContext>,
}

/// Reads the schema of a connected Cerb instance.
#[derive(Debug, Clone, Copy)]
pub struct Introspector<'a> {
    client: &'a CerbClient,
}

impl<'a> Introspector<'a> {
    pub fn new(client: &'a CerbClient) -> Self {
        Self { client }
    }

    /// Lists every context.
    ///
    /// ## Errors
    ///
    /// Fails only when the listing call itself fails or has no `results`.
    #[instrument(skip(self))]
    pub async fn list_schemas(&self) -> Result<SchemaListing, CerbError> {
        let envelope = self.client.get_contexts().await?;
        let mut listing = SchemaListing::default();

        for (index, raw) in envelope.results()?.iter().enumerate() {
            match serde_json::from_value::<SchemaContext>(raw.clone()) {
                Ok(context) => listing.contexts.push((context, raw.clone())),
                Err(e) => {
                    let id = raw.get("id").and_then(Value::as_str).map(str::to_string);
                    warn!(index, ?id, error = %e, "Skipping unreadable context");
                    listing.skipped.push(SkippedContext {
                        index,
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            contexts = listing.contexts.len(),
            skipped = listing.skipped.len(),
            "Listed contexts"
        );
        Ok(listing)
    }

    /// Searches `alias` for example records.
    ///
    /// Remote API refusals and malformed search responses are returned as
    /// [`Examples::Inaccessible`].
    ///
    /// ## Errors
    ///
    /// Transport and configuration failures surface.
    #[instrument(skip(self))]
    pub async fn fetch_examples(
        &self,
        alias: &str,
        query: ExampleQuery,
    ) -> Result<Examples, CerbError> {
        if alias.is_empty() {
            return Ok(Examples::Inaccessible(SchemaAccessError {
                alias: String::new(),
                message: "context has no alias".to_string(),
            }));
        }

        let envelope = match self.client.search_records(alias, &query.to_search()).await {
            Ok(envelope) => envelope,
            Err(CerbError::RemoteApi(e)) => {
                debug!(error = %e, "Example search refused");
                return Ok(Examples::Inaccessible(SchemaAccessError {
                    alias: alias.to_string(),
                    message: e.message,
                }));
            }
            Err(e) => return Err(e),
        };

        let results = match envelope.results() {
            Ok(results) => results,
            Err(e) => {
                return Ok(Examples::Inaccessible(SchemaAccessError {
                    alias: alias.to_string(),
                    message: e.to_string(),
                }));
            }
        };

        let records: Vec<Map<String, Value>> = results
            .iter()
            .filter_map(Value::as_object)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(if records.is_empty() {
            Examples::Empty
        } else {
            Examples::Found(records)
        })
    }

    /// Lists every context and fetches its examples, one context at a time.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, query: ExampleQuery) -> Result<SchemaSnapshot, CerbError> {
        let listing = self.list_schemas().await?;
        let mut contexts = Vec::with_capacity(listing.contexts.len());

        for (context, raw) in listing.contexts {
            let examples = self.fetch_examples(&context.alias, query).await?;
            contexts.push(DiscoveredContext {
                context,
                raw,
                examples,
            });
        }

        info!(
            contexts = contexts.len(),
            skipped = listing.skipped.len(),
            build = self.client.build(),
            "Captured schema snapshot"
        );

        Ok(SchemaSnapshot {
            version: self.client.version().to_string(),
            build: self.client.build().to_string(),
            captured_at: Utc::now(),
            contexts,
            skipped: listing.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_query_presets() {
        assert_eq!(
            ExampleQuery::RECORDS.to_search().to_params().encode(),
            "expand=custom_&limit=1&page=&q="
        );
        assert_eq!(
            ExampleQuery::CHEAT_SHEET.to_search().to_params().encode(),
            "expand=custom_%2Clink&limit=3&page=&q="
        );
    }

    #[test]
    fn first_example() {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::from(1));
        assert_eq!(Examples::Found(vec![record.clone()]).first(), Some(&record));
        assert_eq!(Examples::Empty.first(), None);
    }

    #[test]
    fn skipped_context_display() {
        let skipped = SkippedContext {
            index: 3,
            id: Some("cerb.contexts.broken".to_string()),
            reason: "missing field `id`".to_string(),
        };
        assert_eq!(
            skipped.to_string(),
            "context #3 (cerb.contexts.broken): missing field `id`"
        );
    }
}
