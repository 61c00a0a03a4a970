//! `Cerb-Auth` request signatures.
//!
//! The server recomputes the signature from the bytes it receives, so the
//! canonical string must match exactly:
//!
//! ```text
//! VERB\nDATE\nPATH\nQUERY\nBODY\nSECRET_DIGEST\n
//! ```
//!
//! The trailing newline is an empty sixth separator, not an accident.

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

use crate::method::RestMethod;

/// Returns the lowercase hex MD5 digest of `input`.
///
/// Used both for the one-time secret digest and for every request
/// signature; the server verifier uses the same hash for both.
pub fn md5_hex(input: impl AsRef<[u8]>) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_ref());
    hex::encode(hasher.finalize())
}

/// Formats a timestamp the way the `Date` header expects (RFC 2822).
pub fn format_request_date(at: DateTime<Utc>) -> String {
    at.to_rfc2822()
}

/// The six values that make up one request signature.
///
/// ## Examples
///
/// ```rust
/// use cerb::RestMethod;
/// use cerb::signature::SignatureContext;
///
/// let ctx = SignatureContext {
///     verb: RestMethod::Get,
///     date: "Mon, 19 Oct 2026 10:00:00 +0000",
///     path: "/index.php/rest/contexts/list.json",
///     query: "",
///     body: "",
///     secret_digest: "5ebe2294ecd0e0f08eab7690d2a6ee69",
/// };
/// assert_eq!(ctx.sign(), ctx.sign());
/// assert_eq!(ctx.sign().len(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureContext<'a> {
    pub verb: RestMethod,
    pub date: &'a str,
    /// URL path only: no scheme, host or query.
    pub path: &'a str,
    /// URL-encoded query string without the leading `?`.
    pub query: &'a str,
    /// URL-encoded request body.
    pub body: &'a str,
    pub secret_digest: &'a str,
}

impl SignatureContext<'_> {
    /// Builds the newline-joined canonical string, trailing empty field included.
    pub fn canonical_string(&self) -> String {
        let verb = self.verb.to_string();
        [
            verb.as_str(),
            self.date,
            self.path,
            self.query,
            self.body,
            self.secret_digest,
            "",
        ]
        .join("\n")
    }

    /// Computes the hex signature for this request.
    pub fn sign(&self) -> String {
        md5_hex(self.canonical_string())
    }

    /// Formats the `Cerb-Auth` header value for `access_key`.
    pub fn auth_header_value(&self, access_key: &str) -> String {
        format!("{access_key}:{}", self.sign())
    }
}
