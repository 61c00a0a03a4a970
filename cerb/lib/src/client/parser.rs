//! Email parser endpoint (`parser/parse`).

use tracing::instrument;

use super::CerbClient;
use crate::envelope::Envelope;
use crate::error::CerbError;
use crate::form::FormPairs;
use crate::method::RestMethod;

/// Body used when a parsed message has none.
pub const DEFAULT_MESSAGE_BODY: &str = "No Content";

/// Builds the raw message handed to the parser.
pub fn compose_message(from: &str, to: &str, subject: &str, body: &str) -> String {
    [
        format!("From: {from}"),
        format!("To: {to}"),
        format!("Subject: {subject}"),
        String::new(),
        body.to_string(),
    ]
    .join("\n")
}

impl CerbClient {
    /// Parses a new inbound message, opening a ticket.
    #[instrument(skip(self, message))]
    pub async fn parse_new_message(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        message: Option<&str>,
    ) -> Result<Envelope, CerbError> {
        let raw = compose_message(from, to, subject, message.unwrap_or(DEFAULT_MESSAGE_BODY));
        self.parse_raw(raw).await
    }

    /// Parses a reply to the ticket with `ticket_mask`.
    #[instrument(skip(self, message))]
    pub async fn parse_reply(
        &self,
        from: &str,
        to: &str,
        ticket_mask: &str,
        message: Option<&str>,
    ) -> Result<Envelope, CerbError> {
        let subject = format!("[parser #{ticket_mask}] Reply");
        let raw = compose_message(from, to, &subject, message.unwrap_or(DEFAULT_MESSAGE_BODY));
        self.parse_raw(raw).await
    }

    async fn parse_raw(&self, raw: String) -> Result<Envelope, CerbError> {
        self.send(
            RestMethod::Post,
            "parser/parse",
            &FormPairs::new().with("message", raw),
            &FormPairs::new(),
        )
        .await
    }
}
