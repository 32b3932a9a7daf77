//! CLI error types with miette diagnostics.
//!
//! Maps `upsnap_api::Error` and `ConfigError` into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use upsnap_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(upsnap::connection_failed),
        help(
            "Check that UpSnap is running and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(upsnap::tls_error),
        help(
            "Check the ca_cert path in your profile,\n\
             or use --insecure (-k) to accept any certificate."
        )
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(upsnap::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed (HTTP {status})")]
    #[diagnostic(
        code(upsnap::auth_failed),
        help(
            "Verify the username and password.\n\
             Run: upsnapctl config set-password --profile <name>\n\
             Backend said: {body}"
        )
    )]
    AuthFailed { status: u16, body: String },

    #[error("Session token was rejected")]
    #[diagnostic(
        code(upsnap::session_expired),
        help(
            "The bearer token expired or was revoked. Run the command again.\n\
             Backend said: {body}"
        )
    )]
    SessionExpired { body: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(upsnap::no_credentials),
        help(
            "Configure a profile with: upsnapctl config init --host <url> --username <name>\n\
             Or set UPSNAP_USERNAME and UPSNAP_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(upsnap::not_found),
        help("The record may have been deleted outside this tool.")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(code(upsnap::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── Backend ──────────────────────────────────────────────────────

    #[error("Backend rejected the request (HTTP {status})")]
    #[diagnostic(code(upsnap::backend), help("{body}"))]
    Backend { status: u16, body: String },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(code(upsnap::invalid_response))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(upsnap::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(upsnap::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: upsnapctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(upsnap::no_config),
        help(
            "Create a profile with: upsnapctl config init --host <url> --username <name>\n\
             Or pass --host. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(upsnap::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::SessionExpired { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── upsnap_api::Error → CliError ─────────────────────────────────────

impl From<upsnap_api::Error> for CliError {
    fn from(err: upsnap_api::Error) -> Self {
        use upsnap_api::Error;

        match err {
            Error::Authentication { status, body } => CliError::AuthFailed { status, body },

            Error::Transport(e) if e.is_timeout() => CliError::Timeout,

            Error::Transport(e) => CliError::ConnectionFailed {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: Box::new(e),
            },

            Error::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },

            Error::InvalidHeader(e) => CliError::InvalidResponse {
                message: format!("token is not a valid header value: {e}"),
            },

            Error::Tls(message) => CliError::TlsError { message },

            Error::Backend { status: 401, body } => CliError::SessionExpired { body },

            Error::Backend { status, body } => CliError::Backend { status, body },

            Error::Deserialization { message, .. } => CliError::InvalidResponse { message },

            Error::AlreadyCreated { id } => CliError::Conflict {
                resource_type: "record".into(),
                identifier: id,
            },

            Error::NotCreated => CliError::Validation {
                field: "id".into(),
                reason: "record has no identifier".into(),
            },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config(other),
        }
    }
}
