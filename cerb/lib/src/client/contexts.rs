//! Context endpoints: links, the context list and activity events.

use serde_json::Value;
use tracing::instrument;

use super::CerbClient;
use crate::envelope::Envelope;
use crate::error::CerbError;
use crate::form::FormPairs;
use crate::method::RestMethod;

fn json_list(value: Option<&Value>) -> String {
    value.map_or_else(|| "[]".to_string(), Value::to_string)
}

fn link_payload(on: &str, targets: &[String]) -> FormPairs {
    FormPairs::new()
        .with("on", on)
        .with("targets", serde_json::json!(targets).to_string())
}

impl CerbClient {
    /// Links `on` (`<context>:<id>`) to every target (`<context>:<id>`).
    #[instrument(skip(self))]
    pub async fn link(&self, on: &str, targets: &[String]) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Post,
            "contexts/link",
            &link_payload(on, targets),
            &FormPairs::new(),
        )
        .await
    }

    /// Removes links from `on` to every target.
    #[instrument(skip(self))]
    pub async fn unlink(&self, on: &str, targets: &[String]) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Post,
            "contexts/unlink",
            &link_payload(on, targets),
            &FormPairs::new(),
        )
        .await
    }

    /// Lists every context (record type) with its custom fields.
    pub async fn get_contexts(&self) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Get,
            "contexts/list",
            &FormPairs::new(),
            &FormPairs::new(),
        )
        .await
    }

    pub async fn get_activity_events(&self) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Get,
            "contexts/activity/events",
            &FormPairs::new(),
            &FormPairs::new(),
        )
        .await
    }

    /// Records an activity event on `on`.
    ///
    /// `variables` and `urls` are sent as JSON text, `[]` when absent.
    #[instrument(skip(self, variables, urls))]
    pub async fn create_activity_event(
        &self,
        on: &str,
        activity_point: &str,
        variables: Option<&Value>,
        urls: Option<&Value>,
    ) -> Result<Envelope, CerbError> {
        let payload = FormPairs::new()
            .with("on", on)
            .with("activity_point", activity_point)
            .with("variables", json_list(variables))
            .with("urls", json_list(urls));

        self.send(
            RestMethod::Post,
            "contexts/activity/create",
            &payload,
            &FormPairs::new(),
        )
        .await
    }
}
