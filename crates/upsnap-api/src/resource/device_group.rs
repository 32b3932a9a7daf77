// Device group adapter: named groupings in the `device_groups` collection.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    ReadOutcome, ResourceAdapter, ResourceKind, create_record, delete_record, read_record,
    update_record,
};
use crate::error::Error;
use crate::session::Session;
use crate::transport::Transport;

/// Declared field set of a device group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroupFields {
    pub name: String,
}

impl DeviceGroupFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Adapter for the `device_groups` collection.
#[derive(Debug, Clone)]
pub struct DeviceGroupAdapter {
    transport: Transport,
}

impl DeviceGroupAdapter {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceAdapter for DeviceGroupAdapter {
    type Fields = DeviceGroupFields;

    fn kind(&self) -> ResourceKind {
        ResourceKind::DeviceGroup
    }

    async fn create(&self, session: &Session, fields: &DeviceGroupFields) -> Result<String, Error> {
        create_record(&self.transport, session, self.kind(), fields).await
    }

    async fn read(
        &self,
        session: &Session,
        id: &str,
    ) -> Result<ReadOutcome<DeviceGroupFields>, Error> {
        read_record(&self.transport, session, self.kind(), id).await
    }

    async fn update(
        &self,
        session: &Session,
        id: &str,
        fields: &DeviceGroupFields,
    ) -> Result<DeviceGroupFields, Error> {
        update_record(&self.transport, session, self.kind(), id, fields).await?;
        Ok(fields.clone())
    }

    async fn delete(&self, session: &Session, id: &str) -> Result<(), Error> {
        delete_record(&self.transport, session, self.kind(), id).await
    }
}
