//! controlkit - the per-widget control layer of a native GUI toolkit.
//!
//! Every widget is a [`Control`] bound to a native view. This crate sits
//! between the native windowing layer and application listeners:
//!
//! - **Event routing**: native callbacks arrive through
//!   [`Display::dispatch_native_event`] and are normalized into portable
//!   [`Event`]s (mouse, key, focus, paint, move/resize, traverse)
//! - **Listeners**: per-control registries of [`Listener`]s keyed by
//!   [`EventType`], with compound [`ListenerKind`]s and typed adapters
//! - **Coordinates**: parent-relative bounds and screen/control point
//!   translation over root-relative native bounds
//! - **Focus**: tab groups, tab lists and the vetoable traversal protocol
//! - **Lifecycle**: liveness checks, the disposal cascade, handle
//!   registration and nested redraw suppression
//!
//! The native side is abstracted by [`NativePlatform`]; [`HeadlessPlatform`]
//! is an in-memory implementation for tests and headless use.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use controlkit::{
//!     CompositeBehavior, Control, Display, EventType, HeadlessPlatform, Listener, NativeEvent,
//!     NativeResult,
//! };
//!
//! fn main() -> controlkit::Result<()> {
//!     let platform = Rc::new(HeadlessPlatform::new());
//!     let display = Display::new(platform.clone());
//!     let shell = display.create_shell()?;
//!     let panel = Control::new(&shell, CompositeBehavior)?;
//!
//!     panel.add_listener(EventType::Help, Listener::new(|event| {
//!         assert_eq!(event.kind, EventType::Help);
//!     }))?;
//!
//!     let result = display.dispatch_native_event(
//!         panel.handle()?,
//!         &NativeEvent::HelpRequested { time: 0 },
//!     );
//!     assert_eq!(result, NativeResult::Handled);
//!
//!     shell.dispose();
//!     assert!(panel.is_disposed());
//!     Ok(())
//! }
//! ```
//!
//! # Threading
//!
//! A [`Display`] and its controls belong to the thread that created them;
//! neither is `Send` nor `Sync`.

pub mod behavior;
pub mod control;
pub mod display;
pub mod event;
pub mod headless;
pub mod listener;
pub mod menu;
pub mod native;
pub mod resource;
pub mod typed_listener;

pub use controlkit_core::{
    ControlError, HandleTable, ModifierEdge, ModifierRole, Modifiers, NativeHandle, Point, Rect,
    Result, Size, logging,
};

pub use behavior::{
    CompositeBehavior, ControlBehavior, FocusableBehavior, PlainBehavior, ShellBehavior,
};
pub use control::{Control, ControlId, Delivery};
pub use display::{
    DEFAULT_CONTROL_SIZE, DEFAULT_DOUBLE_CLICK_COUNT, Display, DisplayBuilder, DisplayConfig,
};
pub use event::{Event, EventType, KeyCode, MouseButton, TraversalIntent};
pub use headless::HeadlessPlatform;
pub use listener::{Listener, ListenerKind, ListenerRegistry};
pub use menu::{Menu, MenuStyle};
pub use native::{
    NativeEvent, NativeEventKind, NativeKey, NativeMouse, NativePlatform, NativeResult,
    PaintContextId, ZOrder,
};
pub use resource::{Color, Cursor, SystemColor};
pub use typed_listener::{
    ControlListener, FocusListener, KeyListener, MouseListener, MouseTrackListener,
};

#[cfg(feature = "winit")]
pub use event::{from_winit_mouse_button, from_winit_named_key};
