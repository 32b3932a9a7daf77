// Device adapter: network-bootable hosts in the `devices` collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    ReadOutcome, ResourceAdapter, ResourceKind, create_record, delete_record, empty_as_none,
    non_empty, null_as_empty, read_record, update_record,
};
use crate::error::Error;
use crate::session::Session;
use crate::transport::Transport;

/// Value of the `link_open` flag sent alongside every non-empty `link`.
pub const LINK_OPEN_NEW_TAB: &str = "new_tab";

/// Declared field set of a device.
///
/// `description` and `link` are `None` when unset; the backend reports a
/// cleared field and a never-set field identically, so both read back as
/// `None`. `groups` keeps the order the backend returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFields {
    pub name: String,
    pub ip: String,
    pub mac: String,
    pub netmask: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub link: Option<String>,
    /// Ids of the device groups this device belongs to.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groups: Vec<String>,
}

impl DeviceFields {
    pub fn new(
        name: impl Into<String>,
        ip: impl Into<String>,
        mac: impl Into<String>,
        netmask: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ip: ip.into(),
            mac: mac.into(),
            netmask: netmask.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Fold `Some("")` into `None`, matching what a Read returns.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.filter(|s| !s.is_empty());
        self.link = self.link.filter(|s| !s.is_empty());
        self
    }

    /// Create body: unset optional fields are left out entirely.
    fn create_body(&self) -> CreateBody<'_> {
        let link = non_empty(self.link.as_ref());
        CreateBody {
            name: &self.name,
            ip: &self.ip,
            mac: &self.mac,
            netmask: &self.netmask,
            description: non_empty(self.description.as_ref()),
            link,
            link_open: link.map(|_| LINK_OPEN_NEW_TAB),
            groups: (!self.groups.is_empty()).then_some(self.groups.as_slice()),
        }
    }

    /// Update body: unset optional fields are sent empty so they clear.
    fn update_body(&self) -> UpdateBody<'_> {
        let link = non_empty(self.link.as_ref());
        UpdateBody {
            name: &self.name,
            ip: &self.ip,
            mac: &self.mac,
            netmask: &self.netmask,
            description: non_empty(self.description.as_ref()).unwrap_or_default(),
            link: link.unwrap_or_default(),
            link_open: link.map(|_| LINK_OPEN_NEW_TAB),
            groups: &self.groups,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateBody<'a> {
    name: &'a str,
    ip: &'a str,
    mac: &'a str,
    netmask: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_open: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    groups: Option<&'a [String]>,
}

#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    name: &'a str,
    ip: &'a str,
    mac: &'a str,
    netmask: &'a str,
    description: &'a str,
    link: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_open: Option<&'static str>,
    groups: &'a [String],
}

/// Adapter for the `devices` collection.
#[derive(Debug, Clone)]
pub struct DeviceAdapter {
    transport: Transport,
}

impl DeviceAdapter {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceAdapter for DeviceAdapter {
    type Fields = DeviceFields;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Device
    }

    async fn create(&self, session: &Session, fields: &DeviceFields) -> Result<String, Error> {
        create_record(&self.transport, session, self.kind(), &fields.create_body()).await
    }

    async fn read(&self, session: &Session, id: &str) -> Result<ReadOutcome<DeviceFields>, Error> {
        read_record(&self.transport, session, self.kind(), id).await
    }

    async fn update(
        &self,
        session: &Session,
        id: &str,
        fields: &DeviceFields,
    ) -> Result<DeviceFields, Error> {
        update_record(
            &self.transport,
            session,
            self.kind(),
            id,
            &fields.update_body(),
        )
        .await?;
        Ok(fields.clone().normalized())
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), Error> {
        delete_record(&self.transport, session, self.kind(), id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    fn nas() -> DeviceFields {
        DeviceFields::new("nas", "10.0.0.5", "AA:BB:CC:DD:EE:FF", "255.255.255.0")
    }

    fn to_value(body: &impl Serialize) -> Value {
        serde_json::to_value(body).unwrap()
    }

    #[test]
    fn create_body_omits_unset_optionals() {
        assert_eq!(
            to_value(&nas().create_body()),
            json!({
                "name": "nas",
                "ip": "10.0.0.5",
                "mac": "AA:BB:CC:DD:EE:FF",
                "netmask": "255.255.255.0"
            })
        );
    }

    #[test]
    fn create_body_attaches_link_open_with_link() {
        let fields = nas()
            .with_description("rack 2")
            .with_link("http://nas.lan")
            .with_groups(["g2", "g1"]);
        assert_eq!(
            to_value(&fields.create_body()),
            json!({
                "name": "nas",
                "ip": "10.0.0.5",
                "mac": "AA:BB:CC:DD:EE:FF",
                "netmask": "255.255.255.0",
                "description": "rack 2",
                "link": "http://nas.lan",
                "link_open": "new_tab",
                "groups": ["g2", "g1"]
            })
        );
    }

    #[test]
    fn create_body_treats_empty_string_as_unset() {
        let body = to_value(&nas().with_link("").create_body());
        assert!(body.get("link").is_none());
        assert!(body.get("link_open").is_none());
    }

    #[test]
    fn update_body_clears_unset_optionals() {
        assert_eq!(
            to_value(&nas().update_body()),
            json!({
                "name": "nas",
                "ip": "10.0.0.5",
                "mac": "AA:BB:CC:DD:EE:FF",
                "netmask": "255.255.255.0",
                "description": "",
                "link": "",
                "groups": []
            })
        );
    }

    #[test]
    fn update_body_keeps_link_open_for_set_link() {
        let body = to_value(&nas().with_link("http://x").update_body());
        assert_eq!(body["link"], "http://x");
        assert_eq!(body["link_open"], "new_tab");
    }

    #[test]
    fn decode_tolerates_null_and_missing_optionals() {
        let fields: DeviceFields = serde_json::from_value(json!({
            "id": "d1",
            "name": "nas",
            "ip": "10.0.0.5",
            "mac": "AA:BB:CC:DD:EE:FF",
            "netmask": "255.255.255.0",
            "description": null,
            "link": "",
            "wake_cron": "",
            "collectionName": "devices"
        }))
        .unwrap();
        assert_eq!(fields, nas());
    }

    #[test]
    fn decode_preserves_group_order() {
        let fields: DeviceFields = serde_json::from_value(json!({
            "name": "nas",
            "ip": "10.0.0.5",
            "mac": "AA:BB:CC:DD:EE:FF",
            "netmask": "255.255.255.0",
            "groups": ["zeta", "alpha", "mid"]
        }))
        .unwrap();
        assert_eq!(fields.groups, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn decode_rejects_missing_required_field() {
        let result = serde_json::from_value::<DeviceFields>(json!({
            "name": "nas",
            "ip": "10.0.0.5",
            "netmask": "255.255.255.0"
        }));
        assert!(result.is_err());
    }
}
