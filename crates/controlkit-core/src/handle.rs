//! Native handles and the handle → control lookup table.
//!
//! The native windowing layer hands out opaque [`NativeHandle`] values. The
//! toolkit never inspects them beyond identity; it only needs to find the
//! control that owns a handle when a native callback arrives. That lookup is
//! the [`HandleTable`], owned by the application context and mutated only at
//! control registration and deregistration.

use std::collections::HashMap;
use std::fmt;

use crate::logging::targets;

/// Opaque reference to a native-layer resource.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(u64);

impl NativeHandle {
    /// Wrap a raw native handle value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value, for handing back to the native layer.
    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeHandle({:#x})", self.0)
    }
}

/// Maps native handles to the key of the control that owns them.
///
/// A handle must never be reachable here once its native resource has been
/// released, because the native layer may hand the same value out again.
/// Callers therefore [`deregister`](Self::deregister) before releasing.
#[derive(Debug)]
pub struct HandleTable<K> {
    entries: HashMap<NativeHandle, K>,
}

impl<K: Copy + fmt::Debug> HandleTable<K> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Map `handle` to `key`, returning the key it previously mapped to.
    pub fn register(&mut self, handle: NativeHandle, key: K) -> Option<K> {
        let previous = self.entries.insert(handle, key);
        if let Some(previous) = previous {
            tracing::warn!(
                target: targets::LIFECYCLE,
                ?handle,
                ?previous,
                ?key,
                "native handle registered twice"
            );
        } else {
            tracing::trace!(target: targets::LIFECYCLE, ?handle, ?key, "registered handle");
        }
        previous
    }

    /// Remove `handle` from the table.
    pub fn deregister(&mut self, handle: NativeHandle) -> Option<K> {
        let removed = self.entries.remove(&handle);
        tracing::trace!(
            target: targets::LIFECYCLE,
            ?handle,
            found = removed.is_some(),
            "deregistered handle"
        );
        removed
    }

    /// Look up the owner of `handle`.
    #[inline]
    pub fn get(&self, handle: NativeHandle) -> Option<K> {
        self.entries.get(&handle).copied()
    }

    /// Whether `handle` is currently registered.
    #[inline]
    pub fn contains(&self, handle: NativeHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Copy + fmt::Debug> Default for HandleTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_lookup_deregister() {
        let mut table = HandleTable::new();
        let handle = NativeHandle::from_raw(0x10);

        assert_eq!(table.register(handle, 7_u32), None);
        assert_eq!(table.get(handle), Some(7));
        assert!(table.contains(handle));

        assert_eq!(table.deregister(handle), Some(7));
        assert_eq!(table.get(handle), None);
        assert!(table.is_empty());
    }

    #[test]
    fn re_registration_replaces_owner() {
        let mut table = HandleTable::new();
        let handle = NativeHandle::from_raw(1);
        table.register(handle, 'a');
        assert_eq!(table.register(handle, 'b'), Some('a'));
        assert_eq!(table.get(handle), Some('b'));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn deregister_unknown_is_none() {
        let mut table: HandleTable<u8> = HandleTable::new();
        assert_eq!(table.deregister(NativeHandle::from_raw(99)), None);
    }
}
