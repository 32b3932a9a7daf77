// Resource adapters
//
// One adapter per resource kind, each driving Create/Read/Update/Delete
// against the kind's records collection. The HTTP exchange and status
// interpretation live here once; the per-kind modules own only the
// field mapping.

pub mod device;
pub mod device_group;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::response::{decode, decode_id, success_body};
use crate::session::Session;
use crate::transport::Transport;

pub use device::{DeviceAdapter, DeviceFields};
pub use device_group::{DeviceGroupAdapter, DeviceGroupFields};

/// The manageable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Device,
    DeviceGroup,
}

impl ResourceKind {
    /// Records collection path for this kind.
    pub fn collection_path(self) -> &'static str {
        match self {
            Self::Device => "/api/collections/devices/records",
            Self::DeviceGroup => "/api/collections/device_groups/records",
        }
    }
}

/// Result of reading a record by identifier.
///
/// `NotFound` is an ordinary outcome: the record is gone remotely and the
/// caller should drop its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> ReadOutcome<T> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(v) => Some(v),
            Self::NotFound => None,
        }
    }
}

/// CRUD capability of one resource kind.
///
/// Implementations hold no mutable state; every call is a single
/// independent request/response exchange authorized by `session`.
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// The kind's declared field set.
    type Fields: Clone + Send + Sync;

    fn kind(&self) -> ResourceKind;

    /// Create the resource and return its backend-assigned identifier.
    ///
    /// Not idempotent: each call creates a new remote resource.
    async fn create(&self, session: &Session, fields: &Self::Fields) -> Result<String, Error>;

    /// Fetch the full field set, or `NotFound` on `404`.
    async fn read(&self, session: &Session, id: &str) -> Result<ReadOutcome<Self::Fields>, Error>;

    /// Replace every mutable field and return the field set now stored.
    async fn update(
        &self,
        session: &Session,
        id: &str,
        fields: &Self::Fields,
    ) -> Result<Self::Fields, Error>;

    /// Delete the resource. Succeeds when it is already absent.
    async fn delete(&self, session: &Session, id: &str) -> Result<(), Error>;
}

// ── Shared CRUD exchanges ───────────────────────────────────────────

/// `POST` to the collection and decode the assigned `id`.
pub(crate) async fn create_record<B>(
    transport: &Transport,
    session: &Session,
    kind: ResourceKind,
    body: &B,
) -> Result<String, Error>
where
    B: Serialize + Sync,
{
    let url = transport.endpoint(kind.collection_path(), None)?;
    let resp = transport
        .call(Method::POST, url, Some(session.token()), Some(body))
        .await?;
    let text = success_body(resp).await?;
    let id = decode_id(&text)?;
    debug!(%kind, %id, "created");
    Ok(id)
}

/// URL of one record. An empty identifier would address the collection
/// itself, so it is refused as `NotCreated`.
fn record_url(transport: &Transport, kind: ResourceKind, id: &str) -> Result<Url, Error> {
    if id.is_empty() {
        return Err(Error::NotCreated);
    }
    transport.endpoint(kind.collection_path(), Some(id))
}

/// `GET` one record; `404` maps to `ReadOutcome::NotFound`.
pub(crate) async fn read_record<T>(
    transport: &Transport,
    session: &Session,
    kind: ResourceKind,
    id: &str,
) -> Result<ReadOutcome<T>, Error>
where
    T: DeserializeOwned,
{
    let url = record_url(transport, kind, id)?;
    let resp = transport
        .call_empty(Method::GET, url, Some(session.token()))
        .await?;

    if resp.status() == StatusCode::NOT_FOUND {
        debug!(%kind, %id, "not found remotely");
        return Ok(ReadOutcome::NotFound);
    }

    let text = success_body(resp).await?;
    trace!(%kind, %id, "decoding record");
    decode(&text).map(ReadOutcome::Found)
}

/// `PATCH` one record with a full-replace body.
pub(crate) async fn update_record<B>(
    transport: &Transport,
    session: &Session,
    kind: ResourceKind,
    id: &str,
    body: &B,
) -> Result<(), Error>
where
    B: Serialize + Sync,
{
    let url = record_url(transport, kind, id)?;
    let resp = transport
        .call(Method::PATCH, url, Some(session.token()), Some(body))
        .await?;
    let text = success_body(resp).await?;
    let echoed = decode_id(&text)?;
    trace!(%kind, %id, %echoed, "updated");
    Ok(())
}

/// `DELETE` one record; `404` counts as deleted.
pub(crate) async fn delete_record(
    transport: &Transport,
    session: &Session,
    kind: ResourceKind,
    id: &str,
) -> Result<(), Error> {
    let url = record_url(transport, kind, id)?;
    let resp = transport
        .call_empty(Method::DELETE, url, Some(session.token()))
        .await?;

    if resp.status() == StatusCode::NOT_FOUND {
        debug!(%kind, %id, "already absent");
        return Ok(());
    }

    success_body(resp).await?;
    debug!(%kind, %id, "deleted");
    Ok(())
}

// ── Field decoding helpers ──────────────────────────────────────────

/// Absent, `null` and `""` all decode to `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Absent and `null` sequences decode to empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat `Some("")` like `None`.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}
