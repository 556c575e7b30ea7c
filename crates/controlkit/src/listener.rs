//! Per-control listener registry.
//!
//! A [`ListenerRegistry`] maps each [`EventType`] to the ordered sequence of
//! listeners hooked for it. Order is insertion order and duplicates are kept:
//! hooking the same listener twice delivers twice and needs two removals.
//!
//! Compound listener kinds ([`ListenerKind`]) cover several tags at once.
//! They are registered and removed through one static table so that removal
//! always strips every tag the kind installed.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use controlkit_core::logging::targets;

use crate::event::{Event, EventType};

/// A listener callback with pointer identity.
///
/// Two `Listener`s are equal when they were cloned from the same value, or
/// when they adapt the same typed listener object. Equality never looks at
/// what the callback does.
#[derive(Clone)]
pub struct Listener {
    callback: Rc<dyn Fn(&mut Event)>,
    identity: *const (),
}

impl Listener {
    /// Wrap a closure as a listener with its own identity.
    pub fn new(callback: impl Fn(&mut Event) + 'static) -> Self {
        let callback: Rc<dyn Fn(&mut Event)> = Rc::new(callback);
        let identity = Rc::as_ptr(&callback).cast::<()>();
        Self { callback, identity }
    }

    /// Build a listener whose identity is the address of `target`.
    ///
    /// Used by the typed adapters: adapting the same `Rc` twice yields equal
    /// listeners, so removal by the typed object works.
    pub(crate) fn with_identity<T: ?Sized>(
        target: &Rc<T>,
        callback: impl Fn(&mut Event) + 'static,
    ) -> Self {
        Self {
            callback: Rc::new(callback),
            identity: Rc::as_ptr(target).cast::<()>(),
        }
    }

    /// Invoke the callback.
    #[inline]
    pub fn handle_event(&self, event: &mut Event) {
        (self.callback)(event);
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.identity, other.identity)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", self.identity)
    }
}

impl<F: Fn(&mut Event) + 'static> From<F> for Listener {
    fn from(callback: F) -> Self {
        Self::new(callback)
    }
}

/// Compound listener kinds and the tags each one covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Control,
    Focus,
    Help,
    Key,
    Mouse,
    MouseMove,
    MouseTrack,
    Paint,
    Traverse,
}

impl ListenerKind {
    /// Every kind, for iteration.
    pub const ALL: [Self; 9] = [
        Self::Control,
        Self::Focus,
        Self::Help,
        Self::Key,
        Self::Mouse,
        Self::MouseMove,
        Self::MouseTrack,
        Self::Paint,
        Self::Traverse,
    ];

    /// The tags this kind is registered under.
    pub const fn tags(self) -> &'static [EventType] {
        match self {
            Self::Control => &[EventType::Resize, EventType::Move],
            Self::Focus => &[EventType::FocusIn, EventType::FocusOut],
            Self::Help => &[EventType::Help],
            Self::Key => &[EventType::KeyDown, EventType::KeyUp],
            Self::Mouse => &[
                EventType::MouseDown,
                EventType::MouseUp,
                EventType::MouseDoubleClick,
            ],
            Self::MouseMove => &[EventType::MouseMove],
            Self::MouseTrack => &[
                EventType::MouseEnter,
                EventType::MouseExit,
                EventType::MouseHover,
            ],
            Self::Paint => &[EventType::Paint],
            Self::Traverse => &[EventType::Traverse],
        }
    }
}

/// Ordered tag → listeners table for one control.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    table: HashMap<EventType, Vec<Listener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the sequence for `tag`.
    pub fn hook(&mut self, tag: EventType, listener: Listener) {
        tracing::trace!(target: targets::LISTENER, ?tag, ?listener, "hook");
        self.table.entry(tag).or_default().push(listener);
    }

    /// Remove the first occurrence of `listener` from `tag`.
    ///
    /// Returns whether anything was removed.
    pub fn unhook(&mut self, tag: EventType, listener: &Listener) -> bool {
        let Some(listeners) = self.table.get_mut(&tag) else {
            return false;
        };
        let Some(index) = listeners.iter().position(|l| l == listener) else {
            return false;
        };
        listeners.remove(index);
        if listeners.is_empty() {
            self.table.remove(&tag);
        }
        tracing::trace!(target: targets::LISTENER, ?tag, ?listener, "unhook");
        true
    }

    /// Hook `listener` under every tag of `kind`.
    pub fn hook_kind(&mut self, kind: ListenerKind, listener: &Listener) {
        for &tag in kind.tags() {
            self.hook(tag, listener.clone());
        }
    }

    /// Remove `listener` from every tag of `kind`.
    pub fn unhook_kind(&mut self, kind: ListenerKind, listener: &Listener) {
        for &tag in kind.tags() {
            self.unhook(tag, listener);
        }
    }

    /// Whether any listener is hooked for `tag`.
    #[inline]
    pub fn hooks(&self, tag: EventType) -> bool {
        self.table.get(&tag).is_some_and(|l| !l.is_empty())
    }

    /// Whether `listener` is currently hooked for `tag`.
    pub fn contains(&self, tag: EventType, listener: &Listener) -> bool {
        self.table.get(&tag).is_some_and(|l| l.contains(listener))
    }

    /// A snapshot of the listeners for `tag`, in delivery order.
    pub fn listeners(&self, tag: EventType) -> Vec<Listener> {
        self.table.get(&tag).cloned().unwrap_or_default()
    }

    /// Total number of entries across all tags.
    pub fn len(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Whether the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
