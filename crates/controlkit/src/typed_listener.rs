//! Typed listener traits and their adapters.
//!
//! Each trait has one method per tag of the matching [`ListenerKind`], all
//! defaulting to no-ops. The adapter functions turn an `Rc` of an
//! implementation into a single [`Listener`] that fans out by event type.
//! The listener's identity is the `Rc` allocation, so adapting the same
//! object again yields an equal listener and removal works by object.
//!
//! [`ListenerKind`]: crate::listener::ListenerKind

use std::rc::Rc;

use crate::event::{Event, EventType};
use crate::listener::Listener;

/// Move and resize notifications.
pub trait ControlListener {
    fn control_moved(&self, _event: &mut Event) {}
    fn control_resized(&self, _event: &mut Event) {}
}

/// Keyboard focus gained or lost.
pub trait FocusListener {
    fn focus_gained(&self, _event: &mut Event) {}
    fn focus_lost(&self, _event: &mut Event) {}
}

/// Key presses and releases. Clearing `doit` suppresses the native default.
pub trait KeyListener {
    fn key_pressed(&self, _event: &mut Event) {}
    fn key_released(&self, _event: &mut Event) {}
}

/// Button presses, releases and double clicks.
pub trait MouseListener {
    fn mouse_down(&self, _event: &mut Event) {}
    fn mouse_up(&self, _event: &mut Event) {}
    fn mouse_double_click(&self, _event: &mut Event) {}
}

/// Pointer entering, leaving and hovering over a control.
pub trait MouseTrackListener {
    fn mouse_enter(&self, _event: &mut Event) {}
    fn mouse_exit(&self, _event: &mut Event) {}
    fn mouse_hover(&self, _event: &mut Event) {}
}

/// Adapt a [`ControlListener`].
pub fn control_listener<T: ControlListener + ?Sized + 'static>(target: &Rc<T>) -> Listener {
    let inner = Rc::clone(target);
    Listener::with_identity(target, move |event| match event.kind {
        EventType::Move => inner.control_moved(event),
        EventType::Resize => inner.control_resized(event),
        _ => {}
    })
}

/// Adapt a [`FocusListener`].
pub fn focus_listener<T: FocusListener + ?Sized + 'static>(target: &Rc<T>) -> Listener {
    let inner = Rc::clone(target);
    Listener::with_identity(target, move |event| match event.kind {
        EventType::FocusIn => inner.focus_gained(event),
        EventType::FocusOut => inner.focus_lost(event),
        _ => {}
    })
}

/// Adapt a [`KeyListener`].
pub fn key_listener<T: KeyListener + ?Sized + 'static>(target: &Rc<T>) -> Listener {
    let inner = Rc::clone(target);
    Listener::with_identity(target, move |event| match event.kind {
        EventType::KeyDown => inner.key_pressed(event),
        EventType::KeyUp => inner.key_released(event),
        _ => {}
    })
}

/// Adapt a [`MouseListener`].
pub fn mouse_listener<T: MouseListener + ?Sized + 'static>(target: &Rc<T>) -> Listener {
    let inner = Rc::clone(target);
    Listener::with_identity(target, move |event| match event.kind {
        EventType::MouseDown => inner.mouse_down(event),
        EventType::MouseUp => inner.mouse_up(event),
        EventType::MouseDoubleClick => inner.mouse_double_click(event),
        _ => {}
    })
}

/// Adapt a [`MouseTrackListener`].
pub fn mouse_track_listener<T: MouseTrackListener + ?Sized + 'static>(
    target: &Rc<T>,
) -> Listener {
    let inner = Rc::clone(target);
    Listener::with_identity(target, move |event| match event.kind {
        EventType::MouseEnter => inner.mouse_enter(event),
        EventType::MouseExit => inner.mouse_exit(event),
        EventType::MouseHover => inner.mouse_hover(event),
        _ => {}
    })
}
