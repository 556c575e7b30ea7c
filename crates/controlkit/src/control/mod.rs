//! Controls: the per-widget abstraction over a native view.
//!
//! A [`Control`] is a cheap handle (an arena key plus its [`Display`]). The
//! state lives in the display's arena as [`ControlData`]; every public
//! operation first checks that the control and its display are still alive
//! and fails with [`ControlError::WidgetDisposed`] otherwise.
//!
//! Functionality is split by concern:
//!
//! - `lifecycle`: creation, disposal, redraw suppression, z-order
//! - `coords`: bounds and point translation
//! - `router`: native event normalization and listener delivery
//! - `focus`: tab groups, tab lists and traversal
//!
//! # Re-entrancy
//!
//! Listener and behavior code may do anything to any control, including
//! disposing the one currently dispatching. No arena borrow is held while
//! such code runs, and every multi-step operation re-checks liveness after
//! each call out.

mod coords;
mod focus;
mod lifecycle;
mod router;

#[cfg(test)]
mod tests;

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use bitflags::bitflags;
use controlkit_core::{ControlError, NativeHandle, Result};
use slotmap::new_key_type;

use crate::behavior::ControlBehavior;
use crate::display::Display;
use crate::event::{Event, EventType};
use crate::listener::{Listener, ListenerKind, ListenerRegistry};
use crate::menu::{Menu, MenuStyle};
use crate::resource::{Color, Cursor, SystemColor};
use crate::typed_listener::{
    self, ControlListener, FocusListener, KeyListener, MouseListener, MouseTrackListener,
};

pub use router::Delivery;

new_key_type! {
    /// Arena key of a control within its display.
    ///
    /// Keys are generational: a key of a disposed control never resolves to
    /// a control created later.
    pub struct ControlId;
}

bitflags! {
    /// Control state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct StateFlags: u32 {
        const DISABLED = 1 << 0;
        const HIDDEN = 1 << 1;
        const DISPOSED = 1 << 2;
    }
}

/// Arena record for one control.
pub(crate) struct ControlData {
    pub(crate) handle: NativeHandle,
    pub(crate) parent: Option<ControlId>,
    /// Children in z-order, topmost first. Also the default tab order.
    pub(crate) children: Vec<ControlId>,
    pub(crate) state: StateFlags,
    pub(crate) behavior: Rc<dyn ControlBehavior>,
    pub(crate) foreground: Option<Color>,
    pub(crate) background: Option<Color>,
    pub(crate) cursor: Option<Cursor>,
    pub(crate) tooltip: Option<String>,
    pub(crate) layout_data: Option<Rc<dyn Any>>,
    pub(crate) menu: Option<Menu>,
    /// Nesting depth of `set_redraw(false)`.
    pub(crate) draw_count: u32,
    /// Created on first registration.
    pub(crate) listeners: Option<ListenerRegistry>,
    /// Explicit tab order for containers.
    pub(crate) tab_list: Option<Vec<ControlId>>,
}

impl ControlData {
    pub(crate) fn new(
        handle: NativeHandle,
        parent: Option<ControlId>,
        behavior: Rc<dyn ControlBehavior>,
    ) -> Self {
        Self {
            handle,
            parent,
            children: Vec::new(),
            state: StateFlags::empty(),
            behavior,
            foreground: None,
            background: None,
            cursor: None,
            tooltip: None,
            layout_data: None,
            menu: None,
            draw_count: 0,
            listeners: None,
            tab_list: None,
        }
    }
}

/// Handle to a control.
///
/// Cloning is cheap; clones refer to the same control. Once the control is
/// disposed every operation except [`is_disposed`](Self::is_disposed) and
/// [`dispose`](Self::dispose) fails with `WidgetDisposed`.
#[derive(Clone)]
pub struct Control {
    id: ControlId,
    display: Display,
}

static_assertions::assert_not_impl_any!(Control: Send, Sync);

impl Control {
    pub(crate) fn from_id(display: &Display, id: ControlId) -> Self {
        Self {
            id,
            display: display.clone(),
        }
    }

    #[inline]
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The display this control belongs to. Available even after disposal.
    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Whether the control, or its display, has been disposed.
    pub fn is_disposed(&self) -> bool {
        if self.display.is_disposed() {
            return true;
        }
        self.display
            .inner
            .controls
            .borrow()
            .get(self.id)
            .is_none_or(|data| data.state.contains(StateFlags::DISPOSED))
    }

    /// Fail with `WidgetDisposed` unless the control and display are alive.
    pub(crate) fn check_widget(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(ControlError::WidgetDisposed);
        }
        Ok(())
    }

    /// Read from the arena record after a liveness check.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&ControlData) -> R) -> Result<R> {
        self.check_widget()?;
        let controls = self.display.inner.controls.borrow();
        controls.get(self.id).map(f).ok_or(ControlError::WidgetDisposed)
    }

    /// Mutate the arena record after a liveness check.
    ///
    /// `f` must not call into listeners, behaviors or the native platform.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut ControlData) -> R) -> Result<R> {
        self.check_widget()?;
        let mut controls = self.display.inner.controls.borrow_mut();
        controls.get_mut(self.id).map(f).ok_or(ControlError::WidgetDisposed)
    }

    fn wrap(&self, id: ControlId) -> Control {
        Control::from_id(&self.display, id)
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// The native handle.
    pub fn handle(&self) -> Result<NativeHandle> {
        self.read(|data| data.handle)
    }

    /// The kind of this control.
    pub fn behavior(&self) -> Result<Rc<dyn ControlBehavior>> {
        self.read(|data| Rc::clone(&data.behavior))
    }

    /// The parent container, `None` for a shell.
    pub fn parent(&self) -> Result<Option<Control>> {
        Ok(self.read(|data| data.parent)?.map(|id| self.wrap(id)))
    }

    /// Direct children, topmost first.
    pub fn children(&self) -> Result<Vec<Control>> {
        let ids = self.read(|data| data.children.clone())?;
        Ok(ids.into_iter().map(|id| self.wrap(id)).collect())
    }

    /// The shell (root container) this control lives in.
    pub fn shell(&self) -> Result<Control> {
        self.check_widget()?;
        let controls = self.display.inner.controls.borrow();
        let mut current = self.id;
        while let Some(parent) = controls.get(current).and_then(|data| data.parent) {
            current = parent;
        }
        Ok(self.wrap(current))
    }

    /// Controls from just below the shell down to this one.
    pub fn path(&self) -> Result<Vec<Control>> {
        self.check_widget()?;
        let controls = self.display.inner.controls.borrow();
        let mut path = Vec::new();
        let mut current = self.id;
        while let Some(parent) = controls.get(current).and_then(|data| data.parent) {
            path.push(self.wrap(current));
            current = parent;
        }
        path.reverse();
        Ok(path)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// The control's own enabled flag, as last set.
    pub fn get_enabled(&self) -> Result<bool> {
        self.read(|data| !data.state.contains(StateFlags::DISABLED))
    }

    /// Whether this control and every ancestor are enabled.
    pub fn is_enabled(&self) -> Result<bool> {
        if !self.get_enabled()? {
            return Ok(false);
        }
        match self.parent()? {
            Some(parent) => parent.is_enabled(),
            None => Ok(true),
        }
    }

    /// Enable or disable the control.
    ///
    /// The state flag changes before the native call, so `get_enabled`
    /// reflects it immediately.
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        let changed = self.write(|data| {
            if data.state.contains(StateFlags::DISABLED) != enabled {
                return None;
            }
            data.state.set(StateFlags::DISABLED, !enabled);
            Some(data.handle)
        })?;
        if let Some(handle) = changed {
            self.display.platform().set_enabled(handle, enabled);
        }
        Ok(())
    }

    /// The control's own visibility flag, as last set.
    pub fn get_visible(&self) -> Result<bool> {
        self.read(|data| !data.state.contains(StateFlags::HIDDEN))
    }

    /// Whether the control is showing: visible itself and in every native
    /// ancestor.
    pub fn is_visible(&self) -> Result<bool> {
        let handle = self.handle()?;
        Ok(self.display.platform().is_visible(handle))
    }

    /// Show or hide the control, sending Show or Hide after a real change.
    pub fn set_visible(&self, visible: bool) -> Result<()> {
        let changed = self.write(|data| {
            if data.state.contains(StateFlags::HIDDEN) != visible {
                return None;
            }
            data.state.set(StateFlags::HIDDEN, !visible);
            Some(data.handle)
        })?;
        if let Some(handle) = changed {
            self.display.platform().set_visible(handle, visible);
            let kind = if visible { EventType::Show } else { EventType::Hide };
            self.send_event(kind, &mut Event::new(kind));
        }
        Ok(())
    }

    // =========================================================================
    // Resources
    // =========================================================================

    /// The foreground color, or the display's black when unset.
    pub fn get_foreground(&self) -> Result<Color> {
        match self.read(|data| data.foreground.clone())? {
            Some(color) => Ok(color),
            None => Ok(self.display.system_color(SystemColor::Black)),
        }
    }

    /// Set or clear the foreground color. A disposed color is rejected.
    pub fn set_foreground(&self, color: Option<Color>) -> Result<()> {
        self.check_widget()?;
        if color.as_ref().is_some_and(Color::is_disposed) {
            return Err(ControlError::InvalidArgument);
        }
        self.write(|data| data.foreground = color)
    }

    /// The background color, or the display's white when unset.
    pub fn get_background(&self) -> Result<Color> {
        match self.read(|data| data.background.clone())? {
            Some(color) => Ok(color),
            None => Ok(self.display.system_color(SystemColor::White)),
        }
    }

    /// Set or clear the background color. A disposed color is rejected.
    pub fn set_background(&self, color: Option<Color>) -> Result<()> {
        self.check_widget()?;
        if color.as_ref().is_some_and(Color::is_disposed) {
            return Err(ControlError::InvalidArgument);
        }
        self.write(|data| data.background = color)
    }

    pub fn get_cursor(&self) -> Result<Option<Cursor>> {
        self.read(|data| data.cursor.clone())
    }

    /// Set or clear the cursor override. A disposed cursor is rejected.
    pub fn set_cursor(&self, cursor: Option<Cursor>) -> Result<()> {
        self.check_widget()?;
        if cursor.as_ref().is_some_and(Cursor::is_disposed) {
            return Err(ControlError::InvalidArgument);
        }
        self.write(|data| data.cursor = cursor)
    }

    pub fn get_tool_tip_text(&self) -> Result<Option<String>> {
        self.read(|data| data.tooltip.clone())
    }

    pub fn set_tool_tip_text(&self, text: Option<&str>) -> Result<()> {
        let text = text.map(str::to_owned);
        self.write(|data| data.tooltip = text)
    }

    /// The opaque layout payload set by the parent's layout.
    pub fn get_layout_data(&self) -> Result<Option<Rc<dyn Any>>> {
        self.read(|data| data.layout_data.clone())
    }

    pub fn set_layout_data(&self, layout_data: Option<Rc<dyn Any>>) -> Result<()> {
        self.write(|data| data.layout_data = layout_data)
    }

    pub fn get_menu(&self) -> Result<Option<Menu>> {
        self.read(|data| data.menu.clone())
    }

    /// Attach or detach a popup menu.
    ///
    /// The menu must be live, a popup, and belong to this control's shell;
    /// checks run in that order.
    pub fn set_menu(&self, menu: Option<Menu>) -> Result<()> {
        self.check_widget()?;
        if let Some(menu) = &menu {
            if menu.is_disposed() {
                return Err(ControlError::InvalidArgument);
            }
            if menu.style() != MenuStyle::PopUp {
                return Err(ControlError::MenuNotPopup);
            }
            if menu.shell_id() != self.shell()?.id() {
                return Err(ControlError::InvalidParent);
            }
        }
        self.write(|data| data.menu = menu)
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Register `listener` for `tag`. `None` is a `NullArgument` error.
    pub fn add_listener(
        &self,
        tag: EventType,
        listener: impl Into<Option<Listener>>,
    ) -> Result<()> {
        self.check_widget()?;
        let listener = listener.into().ok_or(ControlError::NullArgument)?;
        self.write(|data| {
            data.listeners
                .get_or_insert_with(ListenerRegistry::new)
                .hook(tag, listener);
        })
    }

    /// Remove one registration of `listener` for `tag`. Absent listeners are
    /// ignored; `None` is a `NullArgument` error.
    pub fn remove_listener(
        &self,
        tag: EventType,
        listener: impl Into<Option<Listener>>,
    ) -> Result<()> {
        self.check_widget()?;
        let listener = listener.into().ok_or(ControlError::NullArgument)?;
        self.write(|data| {
            if let Some(registry) = data.listeners.as_mut() {
                registry.unhook(tag, &listener);
            }
        })
    }

    /// Register `listener` under every tag of `kind`.
    pub fn add_listener_kind(
        &self,
        kind: ListenerKind,
        listener: impl Into<Option<Listener>>,
    ) -> Result<()> {
        self.check_widget()?;
        let listener = listener.into().ok_or(ControlError::NullArgument)?;
        self.write(|data| {
            data.listeners
                .get_or_insert_with(ListenerRegistry::new)
                .hook_kind(kind, &listener);
        })
    }

    /// Remove `listener` from every tag of `kind`.
    pub fn remove_listener_kind(
        &self,
        kind: ListenerKind,
        listener: impl Into<Option<Listener>>,
    ) -> Result<()> {
        self.check_widget()?;
        let listener = listener.into().ok_or(ControlError::NullArgument)?;
        self.write(|data| {
            if let Some(registry) = data.listeners.as_mut() {
                registry.unhook_kind(kind, &listener);
            }
        })
    }

    pub fn add_control_listener<T: ControlListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.add_listener_kind(ListenerKind::Control, typed_listener::control_listener(listener))
    }

    pub fn remove_control_listener<T: ControlListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.remove_listener_kind(ListenerKind::Control, typed_listener::control_listener(listener))
    }

    pub fn add_focus_listener<T: FocusListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.add_listener_kind(ListenerKind::Focus, typed_listener::focus_listener(listener))
    }

    pub fn remove_focus_listener<T: FocusListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.remove_listener_kind(ListenerKind::Focus, typed_listener::focus_listener(listener))
    }

    pub fn add_key_listener<T: KeyListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.add_listener_kind(ListenerKind::Key, typed_listener::key_listener(listener))
    }

    pub fn remove_key_listener<T: KeyListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.remove_listener_kind(ListenerKind::Key, typed_listener::key_listener(listener))
    }

    pub fn add_mouse_listener<T: MouseListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.add_listener_kind(ListenerKind::Mouse, typed_listener::mouse_listener(listener))
    }

    pub fn remove_mouse_listener<T: MouseListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.remove_listener_kind(ListenerKind::Mouse, typed_listener::mouse_listener(listener))
    }

    pub fn add_mouse_track_listener<T: MouseTrackListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.add_listener_kind(
            ListenerKind::MouseTrack,
            typed_listener::mouse_track_listener(listener),
        )
    }

    pub fn remove_mouse_track_listener<T: MouseTrackListener + ?Sized + 'static>(
        &self,
        listener: &Rc<T>,
    ) -> Result<()> {
        self.remove_listener_kind(
            ListenerKind::MouseTrack,
            typed_listener::mouse_track_listener(listener),
        )
    }

    /// Whether any listener is registered for `tag`.
    pub fn is_listening(&self, tag: EventType) -> Result<bool> {
        self.read(|data| data.listeners.as_ref().is_some_and(|r| r.hooks(tag)))
    }

    /// Number of registrations across all tags.
    pub fn listener_count(&self) -> Result<usize> {
        self.read(|data| data.listeners.as_ref().map_or(0, ListenerRegistry::len))
    }

    /// Deliver `event` as `tag` to this control's listeners.
    pub fn notify_listeners(&self, tag: EventType, event: &mut Event) -> Result<Delivery> {
        self.check_widget()?;
        Ok(self.send_event(tag, event))
    }
}

impl PartialEq for Control {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.display.ptr_eq(&other.display)
    }
}

impl Eq for Control {}

impl Hash for Control {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self
            .display
            .inner
            .controls
            .try_borrow()
            .ok()
            .and_then(|controls| controls.get(self.id).map(|data| data.behavior.class_name()));
        f.debug_struct("Control")
            .field("id", &self.id)
            .field("class", &class)
            .finish()
    }
}
