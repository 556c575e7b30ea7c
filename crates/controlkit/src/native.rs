//! The seam to the native windowing system.
//!
//! Controls never talk to a windowing API directly. Everything they need
//! from the native layer goes through [`NativePlatform`], and everything the
//! native layer reports comes back as a [`NativeEvent`] handed to
//! [`Display::dispatch_native_event`](crate::Display::dispatch_native_event).
//!
//! # Coordinates
//!
//! Native control bounds are relative to the root control of the owning
//! window. The window's content area is positioned in screen coordinates.
//! Mouse locations arrive in screen coordinates; paint damage arrives in
//! control-local coordinates.

use std::fmt;

use controlkit_core::{Modifiers, NativeHandle, Point, Rect};

use crate::event::{KeyCode, MouseButton};

/// Opaque drawing surface handed to Paint listeners.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaintContextId(u64);

impl PaintContextId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for PaintContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaintContextId({})", self.0)
    }
}

/// Native event kinds a control subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    BoundsChanged,
    ContextualMenuClick,
    Deactivate,
    Draw,
    SetFocusPart,
    MouseDown,
    MouseUp,
    MouseMoved,
    MouseDragged,
    MouseEntered,
    MouseExited,
    MouseHovered,
    RawKeyDown,
    RawKeyRepeat,
    RawKeyUp,
    ModifiersChanged,
    HelpRequested,
}

impl NativeEventKind {
    /// The set installed, once, on every control at creation.
    pub const HOOKED: [Self; 17] = [
        Self::BoundsChanged,
        Self::ContextualMenuClick,
        Self::Deactivate,
        Self::Draw,
        Self::SetFocusPart,
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseMoved,
        Self::MouseDragged,
        Self::MouseEntered,
        Self::MouseExited,
        Self::MouseHovered,
        Self::RawKeyDown,
        Self::RawKeyRepeat,
        Self::RawKeyUp,
        Self::ModifiersChanged,
        Self::HelpRequested,
    ];
}

/// Pointer data carried by native mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeMouse {
    /// Pointer location in screen coordinates.
    pub location: Point,
    pub button: Option<MouseButton>,
    pub click_count: u32,
    pub modifiers: Modifiers,
    pub time: u32,
}

/// Key data carried by native key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NativeKey {
    pub key_code: KeyCode,
    pub character: Option<char>,
    pub modifiers: Modifiers,
    pub time: u32,
}

/// A native callback, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    BoundsChanged {
        position_changed: bool,
        size_changed: bool,
    },
    ContextualMenuClick {
        /// Click location in screen coordinates.
        location: Point,
    },
    Deactivate,
    Draw {
        /// The view being drawn. Containers also see draws of their subviews.
        target: NativeHandle,
        /// Damage bounds in control-local coordinates.
        damage: Rect,
    },
    SetFocusPart {
        /// Nonzero when the control gains focus.
        part: i16,
    },
    MouseDown(NativeMouse),
    MouseUp(NativeMouse),
    MouseMoved(NativeMouse),
    MouseDragged(NativeMouse),
    MouseEntered(NativeMouse),
    MouseExited(NativeMouse),
    MouseHovered(NativeMouse),
    RawKeyDown(NativeKey),
    RawKeyRepeat(NativeKey),
    RawKeyUp(NativeKey),
    ModifiersChanged {
        /// Modifiers held after the change.
        modifiers: Modifiers,
        time: u32,
    },
    HelpRequested {
        time: u32,
    },
}

impl NativeEvent {
    /// The subscription kind this event belongs to.
    pub fn kind(&self) -> NativeEventKind {
        match self {
            Self::BoundsChanged { .. } => NativeEventKind::BoundsChanged,
            Self::ContextualMenuClick { .. } => NativeEventKind::ContextualMenuClick,
            Self::Deactivate => NativeEventKind::Deactivate,
            Self::Draw { .. } => NativeEventKind::Draw,
            Self::SetFocusPart { .. } => NativeEventKind::SetFocusPart,
            Self::MouseDown(_) => NativeEventKind::MouseDown,
            Self::MouseUp(_) => NativeEventKind::MouseUp,
            Self::MouseMoved(_) => NativeEventKind::MouseMoved,
            Self::MouseDragged(_) => NativeEventKind::MouseDragged,
            Self::MouseEntered(_) => NativeEventKind::MouseEntered,
            Self::MouseExited(_) => NativeEventKind::MouseExited,
            Self::MouseHovered(_) => NativeEventKind::MouseHovered,
            Self::RawKeyDown(_) => NativeEventKind::RawKeyDown,
            Self::RawKeyRepeat(_) => NativeEventKind::RawKeyRepeat,
            Self::RawKeyUp(_) => NativeEventKind::RawKeyUp,
            Self::ModifiersChanged { .. } => NativeEventKind::ModifiersChanged,
            Self::HelpRequested { .. } => NativeEventKind::HelpRequested,
        }
    }
}

/// What the toolkit tells the native layer after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeResult {
    /// The toolkit consumed the event; skip the native default.
    Handled,
    /// Let the native default handler run.
    NotHandled,
}

impl NativeResult {
    #[inline]
    pub fn was_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Where to move a view among its siblings.
///
/// `sibling: None` means the very top (for `Above`) or bottom (for `Below`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Above(Option<NativeHandle>),
    Below(Option<NativeHandle>),
}

/// Operations the control layer needs from the native windowing system.
///
/// All methods take `&self`; implementations use interior mutability. They
/// must not call back into controls synchronously: native events produced
/// as a side effect (bounds changes, for instance) are queued and returned
/// from [`take_pending_events`](Self::take_pending_events).
pub trait NativePlatform {
    /// Create a native view inside `parent`, or a root view for a new window
    /// when `parent` is `None`. `None` when the native layer is out of
    /// handles.
    fn create_control(&self, parent: Option<NativeHandle>) -> Option<NativeHandle>;

    /// Release a native view. The handle may be reused afterwards.
    fn dispose_control(&self, handle: NativeHandle);

    /// Install the control's event subscription.
    fn install_event_handler(&self, handle: NativeHandle, kinds: &[NativeEventKind]);

    /// The native parent view, `None` for a root view.
    fn super_control(&self, handle: NativeHandle) -> Option<NativeHandle>;

    /// The root view of the window that owns `handle`.
    fn root_control(&self, handle: NativeHandle) -> Option<NativeHandle>;

    /// The content area of the owning window, in screen coordinates.
    fn window_bounds(&self, handle: NativeHandle) -> Rect;

    /// View bounds relative to the window's root view.
    fn control_bounds(&self, handle: NativeHandle) -> Rect;

    /// Set view bounds relative to the window's root view.
    fn set_control_bounds(&self, handle: NativeHandle, bounds: Rect);

    fn set_visible(&self, handle: NativeHandle, visible: bool);

    /// Whether the view and all of its native ancestors are visible.
    fn is_visible(&self, handle: NativeHandle) -> bool;

    fn set_enabled(&self, handle: NativeHandle, enabled: bool);

    /// Turn drawing of the view on or off.
    fn set_drawing_enabled(&self, handle: NativeHandle, enabled: bool);

    /// Mark a region (view-local) or the whole view as needing display.
    fn invalidate(&self, handle: NativeHandle, region: Option<Rect>);

    /// Flush pending drawing for the view.
    fn flush(&self, _handle: NativeHandle) {}

    /// Move keyboard focus to the view. Returns whether the native layer
    /// accepted.
    fn set_keyboard_focus(&self, handle: NativeHandle) -> bool;

    /// The view that currently has keyboard focus.
    fn keyboard_focus(&self) -> Option<NativeHandle>;

    fn set_z_order(&self, handle: NativeHandle, order: ZOrder);

    /// Acquire a drawing surface for the view. `None` when unavailable.
    fn create_paint_context(&self, handle: NativeHandle, damage: Rect) -> Option<PaintContextId>;

    fn release_paint_context(&self, context: PaintContextId);

    /// Native events queued since the last call.
    fn take_pending_events(&self) -> Vec<(NativeHandle, NativeEvent)> {
        Vec::new()
    }
}

/// Scoped paint context: released when dropped, on every exit path.
pub(crate) struct PaintGuard<'a> {
    platform: &'a dyn NativePlatform,
    context: PaintContextId,
}

impl<'a> PaintGuard<'a> {
    pub(crate) fn acquire(
        platform: &'a dyn NativePlatform,
        handle: NativeHandle,
        damage: Rect,
    ) -> Option<Self> {
        let context = platform.create_paint_context(handle, damage)?;
        Some(Self { platform, context })
    }

    #[inline]
    pub(crate) fn context(&self) -> PaintContextId {
        self.context
    }
}

impl Drop for PaintGuard<'_> {
    fn drop(&mut self) {
        self.platform.release_paint_context(self.context);
    }
}
