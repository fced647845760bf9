/*!
    Thread-safe side-data contract and its carrier-scoped implementation.
*/

use std::fmt;

use parking_lot::RwLock;
use tracing::trace;

use sidechannel_types::{Result, SideDataKind, SideDataPayload};

use crate::store::{SideDataBytes, SideDataStore, sized_prefix};

/**
    Side-data contract exposed by a carrier to other pipeline stages.

    Implementations serialize sets and gets with a lock owned by the carrier,
    never a global one, so distinct units do not contend.
*/
pub trait SideData: Send + Sync {
    /**
        Store a copy of `data` under `kind`, replacing any previous entry.
    */
    fn set_side_data(&self, kind: SideDataKind, data: &[u8]) -> Result<()>;

    /**
        Get the payload stored under `kind`, or `NotFound`.
    */
    fn side_data(&self, kind: SideDataKind) -> Result<SideDataBytes>;

    /**
        Store the first `size` bytes of `data` under `kind`.

        Fails with `InvalidArgument` if `size` is zero while `data` is not
        empty, or if `size` exceeds the length of `data`.
    */
    fn set_side_data_sized(&self, kind: SideDataKind, data: &[u8], size: usize) -> Result<()> {
        self.set_side_data(kind, sized_prefix(data, size)?)
    }
}

/**
    Typed helpers available on every [`SideData`] implementation, including
    trait objects.
*/
pub trait SideDataExt: SideData {
    /**
        Store a fixed-layout payload under its well-known kind.
    */
    fn set_payload<P: SideDataPayload>(&self, payload: &P) -> Result<()> {
        payload.validate()?;
        self.set_side_data(P::KIND, payload.as_bytes())
    }

    /**
        Decode the fixed-layout payload stored under its well-known kind.
    */
    fn payload<P: SideDataPayload>(&self) -> Result<P> {
        P::from_bytes(&self.side_data(P::KIND)?)
    }

    /**
        Decode a payload, falling back to `default` when it is absent.

        Other errors, such as a size mismatch, are still reported.
    */
    fn payload_or<P: SideDataPayload>(&self, default: P) -> Result<P> {
        match self.payload::<P>() {
            Err(e) if e.is_not_found() => Ok(default),
            other => other,
        }
    }
}

impl<T: SideData + ?Sized> SideDataExt for T {}

/**
    A [`SideDataStore`] guarded by its own lock.

    One of these is attached to each carrier. Readers get
    [`SideDataBytes`] views that stay valid on their own, so no lock is held
    once a get returns.
*/
#[derive(Default)]
pub struct SharedSideData {
    store: RwLock<SideDataStore>,
}

impl SharedSideData {
    /**
        Create an empty shared store.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Wrap an existing store.
    */
    pub fn from_store(store: SideDataStore) -> Self {
        Self {
            store: RwLock::new(store),
        }
    }

    /**
        Take a point-in-time copy of every entry.
    */
    pub fn snapshot(&self) -> SideDataStore {
        self.store.read().clone()
    }

    /**
        Run `f` with shared access to the store.

        Do not call back into this carrier's side-data from inside `f`.
    */
    pub fn read<R>(&self, f: impl FnOnce(&SideDataStore) -> R) -> R {
        f(&self.store.read())
    }

    /**
        Copy every entry of `other` into this store.

        Entries of kinds `other` does not hold are left in place.
    */
    pub fn copy_from(&self, other: &SharedSideData) {
        if std::ptr::eq(self, other) {
            return;
        }
        let source = other.snapshot();
        trace!(entries = source.len(), "copying side-data between carriers");
        self.store.write().merge_from(&source);
    }

    /**
        Merge a plain store into this one.
    */
    pub fn merge_store(&self, source: &SideDataStore) {
        self.store.write().merge_from(source);
    }

    /**
        Add the entries of `source` whose kinds are not stored yet.

        Entries already present win. Returns the number of entries added.
    */
    pub fn fill_missing(&self, source: &SideDataStore) -> usize {
        self.store.write().merge_missing_from(source)
    }

    /**
        Remove the entry for `kind`. Returns true if one existed.
    */
    pub fn remove(&self, kind: SideDataKind) -> bool {
        self.store.write().remove(kind)
    }

    /**
        Remove all entries.
    */
    pub fn clear(&self) {
        self.store.write().clear();
    }

    /**
        Number of stored entries.
    */
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /**
        Returns true if no entries are stored.
    */
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }
}

impl SideData for SharedSideData {
    fn set_side_data(&self, kind: SideDataKind, data: &[u8]) -> Result<()> {
        let mut store = self.store.write();
        let replaced = store.contains(kind);
        store.set(kind, data)?;
        trace!(%kind, len = data.len(), replaced, "side-data set");
        Ok(())
    }

    fn side_data(&self, kind: SideDataKind) -> Result<SideDataBytes> {
        self.store.read().get_shared(kind)
    }
}

impl Clone for SharedSideData {
    fn clone(&self) -> Self {
        Self::from_store(self.snapshot())
    }
}

impl fmt::Debug for SharedSideData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedSideData")
            .field(&*self.store.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(SharedSideData: Send, Sync, SideData);
