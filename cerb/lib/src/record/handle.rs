//! The record handle behind every generated wrapper.

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::RecordDescriptor;
use crate::client::{CerbClient, SearchQuery};
use crate::error::{CerbError, ProtocolError, RecordError};
use crate::form::Fields;

/// Result limit used by [`Record::find_one`] and [`Record::load_links`].
pub const FIND_LIMIT: u32 = 10_000;

/// Number of ids per search when loading linked records.
pub const LINK_CHUNK_SIZE: usize = 1000;

const RELOAD_EXPAND: &[&str] = &["links", "custom_"];
const SEARCH_EXPAND: [&str; 2] = ["custom_", "links"];

/// One Cerb record: its context descriptor, id and last-fetched data.
///
/// Two records are equal when they share a context alias and id,
/// regardless of the data loaded.
#[derive(Debug, Clone)]
pub struct Record {
    client: CerbClient,
    descriptor: &'static RecordDescriptor,
    id: u64,
    data: Map<String, Value>,
}

fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Builds the `id:[..]` search query for a chunk of ids.
fn id_query(ids: &[u64]) -> String {
    format!("id:{}", serde_json::json!(ids))
}

impl Record {
    /// Wraps data the server already returned, without a remote call.
    ///
    /// ## Errors
    ///
    /// Returns [`RecordError::MissingId`] if `data` has no numeric `id`.
    pub fn from_server_data(
        client: &CerbClient,
        descriptor: &'static RecordDescriptor,
        data: Map<String, Value>,
    ) -> Result<Self, CerbError> {
        let id = data
            .get("id")
            .and_then(parse_id)
            .ok_or_else(|| RecordError::MissingId {
                type_name: descriptor.type_name.to_string(),
            })?;

        Ok(Self {
            client: client.clone(),
            descriptor,
            id,
            data,
        })
    }

    /// Creates a new record on the server.
    ///
    /// ## Errors
    ///
    /// Returns [`RecordError::NotPermitted`] if the context does not allow
    /// `create`, and any client error from the create call.
    #[instrument(skip_all, fields(context = descriptor.context_id))]
    pub async fn create(
        client: &CerbClient,
        descriptor: &'static RecordDescriptor,
        fields: &Fields,
    ) -> Result<Self, CerbError> {
        descriptor.require("create")?;
        let envelope = client.create_record(descriptor.alias, &[], fields).await?;
        Self::from_server_data(client, descriptor, envelope.into_record_data())
    }

    /// Fetches one record by id.
    pub async fn load(
        client: &CerbClient,
        descriptor: &'static RecordDescriptor,
        id: u64,
    ) -> Result<Self, CerbError> {
        let mut record = Self {
            client: client.clone(),
            descriptor,
            id,
            data: Map::new(),
        };
        record.reload().await?;
        Ok(record)
    }

    /// Replaces the local data with a fresh copy, links and custom fields
    /// expanded.
    pub async fn reload(&mut self) -> Result<(), CerbError> {
        let envelope = self
            .client
            .get_record(self.descriptor.alias, self.id, RELOAD_EXPAND)
            .await?;
        self.data = envelope.into_record_data();
        Ok(())
    }

    /// Searches the context, expanding custom fields and links.
    #[instrument(skip_all, fields(context = descriptor.context_id, query = %query))]
    pub async fn search(
        client: &CerbClient,
        descriptor: &'static RecordDescriptor,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Self>, CerbError> {
        let search = SearchQuery::new()
            .query(query)
            .expand(SEARCH_EXPAND)
            .limit(limit);
        let envelope = client.search_records(descriptor.alias, &search).await?;

        let records = envelope
            .results()?
            .iter()
            .map(|item| match item {
                Value::Object(data) => Self::from_server_data(client, descriptor, data.clone()),
                _ => Err(ProtocolError::unexpected_type("results", "an array of objects").into()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = records.len(), "Search returned records");
        Ok(records)
    }

    /// Returns the single record matching `query`.
    ///
    /// ## Errors
    ///
    /// Returns [`RecordError::NotFound`] or [`RecordError::Ambiguous`] unless
    /// exactly one record matches.
    pub async fn find_one(
        client: &CerbClient,
        descriptor: &'static RecordDescriptor,
        query: &str,
    ) -> Result<Self, CerbError> {
        let mut records = Self::search(client, descriptor, query, FIND_LIMIT).await?;
        match records.len() {
            1 => Ok(records.remove(0)),
            0 => Err(RecordError::NotFound {
                type_name: descriptor.type_name.to_string(),
                query: query.to_string(),
            }
            .into()),
            count => Err(RecordError::Ambiguous {
                type_name: descriptor.type_name.to_string(),
                query: query.to_string(),
                count,
            }
            .into()),
        }
    }

    /// Sends `fields` as an update. Local data is left as-is; call
    /// [`reload`](Self::reload) to refresh it.
    pub async fn update(&self, fields: &Fields) -> Result<(), CerbError> {
        self.client
            .update_record(self.descriptor.alias, self.id, &[], fields)
            .await?;
        Ok(())
    }

    /// Updates a single field by its storage key.
    pub async fn update_field(&self, key: &str, value: Value) -> Result<(), CerbError> {
        let mut fields = Fields::new();
        fields.insert(key.to_string(), value);
        self.update(&fields).await
    }

    /// The `<context>:<id>` reference used by the link endpoints.
    pub fn context_ref(&self) -> String {
        format!("{}:{}", self.descriptor.context_id, self.id)
    }

    pub async fn link(&self, others: &[&Record]) -> Result<(), CerbError> {
        let targets: Vec<String> = others.iter().map(|r| r.context_ref()).collect();
        self.client.link(&self.context_ref(), &targets).await?;
        Ok(())
    }

    pub async fn unlink(&self, others: &[&Record]) -> Result<(), CerbError> {
        let targets: Vec<String> = others.iter().map(|r| r.context_ref()).collect();
        self.client.unlink(&self.context_ref(), &targets).await?;
        Ok(())
    }

    /// The expanded `links` object: context id to linked record ids.
    pub fn links(&self) -> Option<&Map<String, Value>> {
        self.data.get("links").and_then(Value::as_object)
    }

    /// Ids of linked records in `context_id`, in server order.
    pub fn linked_ids(&self, context_id: &str) -> Vec<u64> {
        self.links()
            .and_then(|links| links.get(context_id))
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(parse_id).collect())
            .unwrap_or_default()
    }

    /// Loads the full linked records of the `target` context.
    ///
    /// Ids are searched in chunks of [`LINK_CHUNK_SIZE`].
    #[instrument(skip_all, fields(id = self.id, target = target.context_id))]
    pub async fn load_links(
        &self,
        target: &'static RecordDescriptor,
    ) -> Result<Vec<Record>, CerbError> {
        let ids = self.linked_ids(target.context_id);
        let mut records = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(LINK_CHUNK_SIZE) {
            let found = Self::search(&self.client, target, &id_query(chunk), FIND_LIMIT).await?;
            records.extend(found);
        }
        Ok(records)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn descriptor(&self) -> &'static RecordDescriptor {
        self.descriptor
    }

    pub fn client(&self) -> &CerbClient {
        &self.client
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Pretty-printed JSON of the local data.
    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", Value::Object(self.data.clone()))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.alias == other.descriptor.alias && self.id == other.id
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.get("name") {
            Some(Value::String(name)) => {
                write!(f, "{}({}, {})", self.descriptor.type_name, self.id, name)
            }
            Some(name) => write!(f, "{}({}, {})", self.descriptor.type_name, self.id, name),
            None => write!(f, "{}({})", self.descriptor.type_name, self.id),
        }
    }
}
