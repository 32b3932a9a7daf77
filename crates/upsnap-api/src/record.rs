// Host-owned identifier slot for one declared resource instance.
//
// Tracks whether the instance exists remotely and enforces the lifecycle:
// create once, refresh or update by id, delete clears the id whether or
// not the backend still had the resource.

use tracing::{debug, warn};

use crate::error::Error;
use crate::resource::{ReadOutcome, ResourceAdapter};
use crate::session::Session;

/// Local view of one remote resource.
///
/// `id` is `Some` exactly when the resource is known to exist on the
/// backend. `fields` holds the last field set read from or written to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<F> {
    id: Option<String>,
    fields: Option<F>,
}

impl<F> Default for Record<F> {
    fn default() -> Self {
        Self {
            id: None,
            fields: None,
        }
    }
}

impl<F: Clone + Send + Sync> Record<F> {
    /// A record not yet created remotely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an existing remote resource by identifier (import).
    ///
    /// Fields stay unknown until the next [`refresh`](Self::refresh).
    /// An empty identifier means "not yet created".
    pub fn adopt(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self {
            id: (!id.is_empty()).then_some(id),
            fields: None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn fields(&self) -> Option<&F> {
        self.fields.as_ref()
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    /// Create the remote resource.
    ///
    /// Refuses when an identifier is already held, since a second Create
    /// would leave a duplicate resource on the backend.
    pub async fn create<A>(
        &mut self,
        adapter: &A,
        session: &Session,
        desired: F,
    ) -> Result<&str, Error>
    where
        A: ResourceAdapter<Fields = F> + ?Sized,
    {
        if let Some(id) = &self.id {
            return Err(Error::AlreadyCreated { id: id.clone() });
        }

        let id = adapter.create(session, &desired).await?;
        self.fields = Some(desired);
        Ok(self.id.insert(id).as_str())
    }

    /// Re-read remote state.
    ///
    /// Returns `false` (and clears the record) when the resource was
    /// removed out-of-band.
    pub async fn refresh<A>(&mut self, adapter: &A, session: &Session) -> Result<bool, Error>
    where
        A: ResourceAdapter<Fields = F> + ?Sized,
    {
        let id = self.id.as_deref().ok_or(Error::NotCreated)?;

        match adapter.read(session, id).await? {
            ReadOutcome::Found(fields) => {
                self.fields = Some(fields);
                Ok(true)
            }
            ReadOutcome::NotFound => {
                warn!(kind = %adapter.kind(), %id, "resource vanished remotely, dropping id");
                self.clear();
                Ok(false)
            }
        }
    }

    /// Overwrite every mutable field remotely.
    pub async fn update<A>(
        &mut self,
        adapter: &A,
        session: &Session,
        desired: &F,
    ) -> Result<&F, Error>
    where
        A: ResourceAdapter<Fields = F> + ?Sized,
    {
        let id = self.id.as_deref().ok_or(Error::NotCreated)?;
        let stored = adapter.update(session, id, desired).await?;
        Ok(&*self.fields.insert(stored))
    }

    /// Delete the remote resource; the record always ends cleared.
    ///
    /// A record that was never created is already deleted.
    pub async fn delete<A>(&mut self, adapter: &A, session: &Session) -> Result<(), Error>
    where
        A: ResourceAdapter<Fields = F> + ?Sized,
    {
        let Some(id) = self.id.as_deref() else {
            debug!(kind = %adapter.kind(), "delete on uncreated record, nothing to do");
            return Ok(());
        };

        adapter.delete(session, id).await?;
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.id = None;
        self.fields = None;
    }
}
