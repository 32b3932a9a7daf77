use thiserror::Error;

/// Top-level error type for the `upsnap-api` crate.
///
/// Every failure path of a session or resource operation lands here with
/// enough context (status code, raw body) for the caller to report it.
/// A `404` on Read is *not* an error; see [`ReadOutcome`](crate::ReadOutcome).
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The auth endpoint answered with a non-success status.
    #[error("Authentication failed (HTTP {status}): {body}")]
    Authentication { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value (e.g. the bearer token) contains illegal bytes.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-success status from a resource endpoint, body kept verbatim.
    #[error("Backend error (HTTP {status}): {body}")]
    Backend { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Record lifecycle ────────────────────────────────────────────
    /// Create was requested for a record that already has an identifier.
    #[error("Record already exists remotely with id '{id}'")]
    AlreadyCreated { id: String },

    /// An identifier-keyed operation was requested before Create.
    #[error("Record has no identifier -- create it first")]
    NotCreated,
}

impl Error {
    /// Returns `true` if re-authenticating might resolve this error.
    ///
    /// Sessions are never refreshed in place; a `401` from a resource
    /// endpoint means the token expired and a new session is needed.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Backend { status: 401, .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying the
    /// whole operation for.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Backend { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Backend { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The raw response body carried by this error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Authentication { body, .. }
            | Self::Backend { body, .. }
            | Self::Deserialization { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_401_counts_as_expired_session() {
        let err = Error::Backend {
            status: 401,
            body: "{}".into(),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn gateway_errors_are_transient() {
        let err = Error::Backend {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_transient());
        assert!(
            !Error::Backend {
                status: 400,
                body: String::new()
            }
            .is_transient()
        );
    }

    #[test]
    fn deserialization_keeps_raw_body() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "not json".into(),
        };
        assert_eq!(err.body(), Some("not json"));
        assert_eq!(err.status(), None);
    }
}
