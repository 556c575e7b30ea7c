//! The portable event record delivered to listeners.
//!
//! Every native callback, whatever its shape, is normalized into one
//! [`Event`]. Fields that do not apply to a given [`EventType`] keep their
//! defaults. Coordinates are integer pixels with a top-left origin.

use std::fmt;

use controlkit_core::{Modifiers, Point, Rect};

use crate::control::Control;
use crate::native::PaintContextId;

/// Portable event tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Resize,
    Move,
    FocusIn,
    FocusOut,
    MouseDown,
    MouseUp,
    MouseDoubleClick,
    MouseMove,
    MouseEnter,
    MouseExit,
    MouseHover,
    KeyDown,
    KeyUp,
    Paint,
    Traverse,
    Help,
    Show,
    Hide,
}

impl EventType {
    /// Whether clearing `doit` on this event suppresses a default action.
    pub fn is_vetoable(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp | Self::Traverse)
    }
}

/// Mouse buttons reported on press and release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left,
    /// Secondary button (usually right).
    Right,
    /// Middle button.
    Middle,
    /// Additional button 1 (browser back).
    Button4,
    /// Additional button 2 (browser forward).
    Button5,
}

/// Converts a winit mouse button to a portable [`MouseButton`].
///
/// Buttons without a portable equivalent map to `None`.
#[cfg(feature = "winit")]
pub fn from_winit_mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    use winit::event::MouseButton as WinitMouseButton;

    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        WinitMouseButton::Back => Some(MouseButton::Button4),
        WinitMouseButton::Forward => Some(MouseButton::Button5),
        WinitMouseButton::Other(_) => None,
    }
}

/// Keys the control layer distinguishes.
///
/// Only keys that take part in traversal or modifier synthesis get their own
/// variant; everything else is carried as a raw native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyCode {
    #[default]
    None,
    Tab,
    Escape,
    Return,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Shift,
    Control,
    Command,
    Option,
    /// A key identified only by its native virtual key code.
    Raw(u32),
}

/// Converts a winit named key to a portable [`KeyCode`].
#[cfg(feature = "winit")]
pub fn from_winit_named_key(key: &winit::keyboard::NamedKey) -> KeyCode {
    use winit::keyboard::NamedKey;

    match key {
        NamedKey::Tab => KeyCode::Tab,
        NamedKey::Escape => KeyCode::Escape,
        NamedKey::Enter => KeyCode::Return,
        NamedKey::ArrowUp => KeyCode::ArrowUp,
        NamedKey::ArrowDown => KeyCode::ArrowDown,
        NamedKey::ArrowLeft => KeyCode::ArrowLeft,
        NamedKey::ArrowRight => KeyCode::ArrowRight,
        NamedKey::PageUp => KeyCode::PageUp,
        NamedKey::PageDown => KeyCode::PageDown,
        NamedKey::Shift => KeyCode::Shift,
        NamedKey::Control => KeyCode::Control,
        NamedKey::Super => KeyCode::Command,
        NamedKey::Alt => KeyCode::Option,
        _ => KeyCode::None,
    }
}

/// What a Traverse event asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TraversalIntent {
    #[default]
    None,
    Escape,
    Return,
    TabNext,
    TabPrevious,
    ArrowNext,
    ArrowPrevious,
    Mnemonic,
    PageNext,
    PagePrevious,
}

impl TraversalIntent {
    /// Map a key press to the traversal it requests, if any.
    ///
    /// Tab moves between tab groups (Shift reverses), arrows move between
    /// items of a group, Control-PageUp/PageDown move between pages.
    pub fn from_key(key_code: KeyCode, modifiers: Modifiers) -> Self {
        match key_code {
            KeyCode::Tab if modifiers.contains(Modifiers::SHIFT) => Self::TabPrevious,
            KeyCode::Tab => Self::TabNext,
            KeyCode::Escape => Self::Escape,
            KeyCode::Return => Self::Return,
            KeyCode::ArrowDown | KeyCode::ArrowRight => Self::ArrowNext,
            KeyCode::ArrowUp | KeyCode::ArrowLeft => Self::ArrowPrevious,
            KeyCode::PageDown if modifiers.contains(Modifiers::CONTROL) => Self::PageNext,
            KeyCode::PageUp if modifiers.contains(Modifiers::CONTROL) => Self::PagePrevious,
            _ => Self::None,
        }
    }
}

/// A portable event.
#[derive(Clone)]
pub struct Event {
    /// The event tag. Set by the sender.
    pub kind: EventType,
    /// The control the event is delivered to.
    pub widget: Option<Control>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Button pressed or released, for mouse events.
    pub button: Option<MouseButton>,
    /// Native click count for mouse presses.
    pub click_count: u32,
    /// Modifiers held when the event was generated.
    pub state_mask: Modifiers,
    pub key_code: KeyCode,
    pub character: Option<char>,
    /// Traversal requested, for Traverse events.
    pub detail: TraversalIntent,
    /// Native timestamp in milliseconds.
    pub time: u32,
    /// Cleared by a listener to veto the default action.
    pub doit: bool,
    /// Paint context for Paint events, valid only during delivery.
    pub gc: Option<PaintContextId>,
}

impl Event {
    /// Create an event of the given type with `doit` set and every other
    /// field defaulted.
    pub fn new(kind: EventType) -> Self {
        Self {
            kind,
            widget: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            button: None,
            click_count: 0,
            state_mask: Modifiers::empty(),
            key_code: KeyCode::None,
            character: None,
            detail: TraversalIntent::None,
            time: 0,
            doit: true,
            gc: None,
        }
    }

    /// The event location.
    #[inline]
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The event rectangle (damage area for Paint events).
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Set the event rectangle.
    pub fn set_bounds(&mut self, rect: Rect) {
        self.x = rect.origin.x;
        self.y = rect.origin.y;
        self.width = rect.size.width;
        self.height = rect.size.height;
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("widget", &self.widget.as_ref().map(Control::id))
            .field("bounds", &self.bounds())
            .field("button", &self.button)
            .field("click_count", &self.click_count)
            .field("state_mask", &self.state_mask)
            .field("key_code", &self.key_code)
            .field("detail", &self.detail)
            .field("doit", &self.doit)
            .finish_non_exhaustive()
    }
}
