// Response reading and decoding shared by the session and resource adapters.

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::transport::RawResponse;

/// Read the whole body, returning it for a success status and
/// `Error::Backend` (status + raw body) otherwise.
pub(crate) async fn success_body(resp: RawResponse) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::Backend {
            status: status.as_u16(),
            body,
        })
    }
}

/// Decode a JSON body, keeping the raw text on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview = body.get(..body.len().min(200)).unwrap_or(body);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Reject a decoded-but-empty required string.
pub(crate) fn require_non_empty(value: String, field: &str, body: &str) -> Result<String, Error> {
    if value.is_empty() {
        Err(Error::Deserialization {
            message: format!("required field `{field}` is empty"),
            body: body.to_owned(),
        })
    } else {
        Ok(value)
    }
}

#[derive(serde::Deserialize)]
struct IdOnly {
    id: String,
}

/// Decode the backend-assigned `id` from a record body; every other field
/// is ignored.
pub(crate) fn decode_id(body: &str) -> Result<String, Error> {
    let IdOnly { id } = decode(body)?;
    require_non_empty(id, "id", body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_id_ignores_extra_fields() {
        let id = decode_id(r#"{"id":"r1","name":"nas","created":"2024-01-01"}"#).unwrap();
        assert_eq!(id, "r1");
    }

    #[test]
    fn decode_id_rejects_missing_and_empty() {
        assert!(matches!(
            decode_id(r#"{"name":"nas"}"#),
            Err(Error::Deserialization { .. })
        ));
        assert!(matches!(
            decode_id(r#"{"id":""}"#),
            Err(Error::Deserialization { .. })
        ));
    }

    #[test]
    fn decode_failure_keeps_full_body() {
        let body = "<html>bad gateway</html>";
        match decode::<IdOnly>(body) {
            Err(Error::Deserialization { body: raw, .. }) => assert_eq!(raw, body),
            _ => panic!("expected Deserialization error"),
        }
    }
}
