//! Package import.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::instrument;

use super::CerbClient;
use crate::envelope::Envelope;
use crate::error::CerbError;
use crate::form::FormPairs;
use crate::method::RestMethod;

fn import_payload(package_json: &Value, prompts: &BTreeMap<String, String>) -> FormPairs {
    let mut payload: FormPairs = prompts
        .iter()
        .map(|(k, v)| (format!("prompts[{k}]"), v.as_str()))
        .collect();
    payload.push("package_json", package_json.to_string());
    payload
}

impl CerbClient {
    /// Imports a package, answering its prompts.
    ///
    /// Prompts are sent as `prompts[<name>]`, sorted by name, followed by
    /// the package itself as JSON text.
    #[instrument(skip(self, package_json))]
    pub async fn import_package(
        &self,
        package_json: &Value,
        prompts: &BTreeMap<String, String>,
    ) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Post,
            "packages/import",
            &import_payload(package_json, prompts),
            &FormPairs::new(),
        )
        .await
    }
}
