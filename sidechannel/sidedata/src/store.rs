/*!
    Unsynchronized side-data storage.
*/

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use sidechannel_types::{Error, Result, SideDataKind, SideDataPayload};

/**
    An immutable, reference-counted view of a stored side-data buffer.

    Handed out by the locked [`crate::SideData`] API. The view keeps the
    bytes it was created from alive even if the entry is replaced afterwards,
    so it never dangles, but it goes stale: re-query after any set of the
    same kind to see the current value.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct SideDataBytes(Arc<[u8]>);

impl SideDataBytes {
    /**
        Copy the bytes into an owned vector.
    */
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Deref for SideDataBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for SideDataBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SideDataBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SideDataBytes({} bytes)", self.0.len())
    }
}

#[derive(Clone)]
struct Entry {
    kind: SideDataKind,
    data: Arc<[u8]>,
}

/**
    Side-data entries for a single carrier, at most one per kind.

    Payloads are copied in on set and never alias caller memory. Reads borrow
    from the store, so the borrow checker rules out holding a read across a
    later set. Wrap in [`crate::SharedSideData`] to share between threads.

    Entries keep insertion order; replacing an entry keeps its position.
*/
#[derive(Clone, Default)]
pub struct SideDataStore {
    entries: Vec<Entry>,
}

impl SideDataStore {
    /**
        Create an empty store.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Store a copy of `data` under `kind`, replacing any previous entry.

        Empty payloads are allowed. Fails with `InvalidArgument` for the nil kind.
    */
    pub fn set(&mut self, kind: SideDataKind, data: &[u8]) -> Result<()> {
        kind.validate()?;
        self.insert(kind, Arc::from(data));
        Ok(())
    }

    /**
        Store the first `size` bytes of `data` under `kind`.

        Fails with `InvalidArgument` if `size` is zero while `data` is not
        empty, or if `size` exceeds the length of `data`.
    */
    pub fn set_sized(&mut self, kind: SideDataKind, data: &[u8], size: usize) -> Result<()> {
        let data = sized_prefix(data, size)?;
        self.set(kind, data)
    }

    /**
        Borrow the stored payload for `kind`.

        Fails with `NotFound` if nothing is stored under `kind`.
    */
    pub fn get(&self, kind: SideDataKind) -> Result<&[u8]> {
        self.find(kind)
            .map(|entry| &*entry.data)
            .ok_or_else(|| not_found(kind))
    }

    /**
        Get a shared view of the stored payload for `kind`.
    */
    pub fn get_shared(&self, kind: SideDataKind) -> Result<SideDataBytes> {
        self.find(kind)
            .map(|entry| SideDataBytes(Arc::clone(&entry.data)))
            .ok_or_else(|| not_found(kind))
    }

    /**
        Store a fixed-layout payload under its well-known kind.
    */
    pub fn set_payload<P: SideDataPayload>(&mut self, payload: &P) -> Result<()> {
        payload.validate()?;
        self.set(P::KIND, payload.as_bytes())
    }

    /**
        Decode the fixed-layout payload stored under its well-known kind.

        Fails with `NotFound` if absent and `InvalidArgument` if the stored
        size does not match the payload layout.
    */
    pub fn payload<P: SideDataPayload>(&self) -> Result<P> {
        P::from_bytes(self.get(P::KIND)?)
    }

    /**
        Returns true if an entry exists for `kind`.
    */
    pub fn contains(&self, kind: SideDataKind) -> bool {
        self.find(kind).is_some()
    }

    /**
        Remove the entry for `kind`. Returns true if one existed.
    */
    pub fn remove(&mut self, kind: SideDataKind) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.kind != kind);
        self.entries.len() != before
    }

    /**
        Remove all entries.
    */
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /**
        Number of stored entries.
    */
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /**
        Returns true if no entries are stored.
    */
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /**
        Iterate over the stored kinds in insertion order.
    */
    pub fn kinds(&self) -> impl Iterator<Item = SideDataKind> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }

    /**
        Iterate over `(kind, payload)` pairs in insertion order.
    */
    pub fn iter(&self) -> impl Iterator<Item = (SideDataKind, &[u8])> + '_ {
        self.entries.iter().map(|entry| (entry.kind, &*entry.data))
    }

    /**
        Copy every entry of `other` into this store, replacing entries of the
        same kind and leaving all other entries in place.
    */
    pub fn merge_from(&mut self, other: &SideDataStore) {
        for entry in &other.entries {
            // Stored buffers are immutable, sharing them is a copy.
            self.insert(entry.kind, Arc::clone(&entry.data));
        }
    }

    /**
        Copy the entries of `other` whose kinds this store does not hold yet.

        Returns the number of entries added.
    */
    pub fn merge_missing_from(&mut self, other: &SideDataStore) -> usize {
        let mut added = 0;
        for entry in &other.entries {
            if !self.contains(entry.kind) {
                self.entries.push(entry.clone());
                added += 1;
            }
        }
        added
    }

    fn find(&self, kind: SideDataKind) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }

    fn insert(&mut self, kind: SideDataKind, data: Arc<[u8]>) {
        match self.entries.iter_mut().find(|entry| entry.kind == kind) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry { kind, data }),
        }
    }
}

impl fmt::Debug for SideDataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (e.kind, e.data.len())))
            .finish()
    }
}

pub(crate) fn sized_prefix(data: &[u8], size: usize) -> Result<&[u8]> {
    if size == 0 && !data.is_empty() {
        return Err(Error::invalid_argument(
            "side-data size is zero but data is not empty",
        ));
    }
    data.get(..size).ok_or_else(|| {
        Error::invalid_argument(format!(
            "side-data size {size} exceeds buffer length {}",
            data.len()
        ))
    })
}

fn not_found(kind: SideDataKind) -> Error {
    Error::not_found(format!("side-data {kind}"))
}
