// Password authentication against the backend's users collection.
//
// One credential exchange per run yields a bearer token and the subject id.
// The session is immutable: an expired token is replaced by logging in
// again, never refreshed in place.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::response::{decode, require_non_empty};
use crate::transport::{Transport, TransportConfig};

/// Password-auth endpoint of the users collection.
pub const AUTH_PATH: &str = "/api/collections/users/auth-with-password";

/// Login material supplied once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub identity: String,
    pub secret: SecretString,
    /// Backend root, e.g. `http://upsnap.lan:8090`.
    pub base_url: Url,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: SecretString, base_url: Url) -> Self {
        Self {
            identity: identity.into(),
            secret,
            base_url,
        }
    }

    /// Build a transport for `base_url` and authenticate over it.
    pub async fn connect(&self, config: &TransportConfig) -> Result<(Transport, Session), Error> {
        let transport = Transport::new(self.base_url.clone(), config)?;
        let session = Session::login(&transport, &self.identity, &self.secret).await?;
        Ok((transport, session))
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    record: AuthRecord,
}

#[derive(Deserialize)]
struct AuthRecord {
    id: String,
}

/// Authenticated context attached to every resource call.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    subject_id: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("subject_id", &self.subject_id)
            .finish()
    }
}

impl Session {
    /// Wrap a token obtained elsewhere.
    pub fn new(token: SecretString, subject_id: impl Into<String>) -> Self {
        Self {
            token,
            subject_id: subject_id.into(),
        }
    }

    /// Exchange identity + password for a bearer token.
    ///
    /// Sends one unauthenticated `POST` to [`AUTH_PATH`]. A non-success
    /// status yields `Error::Authentication` with the status and body;
    /// a success body lacking `token` or `record.id` yields
    /// `Error::Deserialization`. Unknown response fields are ignored.
    pub async fn login(
        transport: &Transport,
        identity: &str,
        secret: &SecretString,
    ) -> Result<Self, Error> {
        let url = transport.endpoint(AUTH_PATH, None)?;

        let body = json!({
            "identity": identity,
            "password": secret.expose_secret(),
        });

        let resp = transport
            .call(reqwest::Method::POST, url, None, Some(&body))
            .await?;

        let status = resp.status();
        let text = resp.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Authentication {
                status: status.as_u16(),
                body: text,
            });
        }

        let AuthResponse { token, record } = decode(&text)?;
        let token = require_non_empty(token, "token", &text)?;
        let subject_id = require_non_empty(record.id, "record.id", &text)?;

        debug!(subject = %subject_id, "login successful");
        Ok(Self {
            token: SecretString::from(token),
            subject_id,
        })
    }

    /// The bearer token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// The authenticated user's record id.
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }
}
