//! Creation, disposal, redraw suppression and z-order.

use std::rc::Rc;

use controlkit_core::logging::{span_names, targets};
use controlkit_core::{ControlError, NativeHandle, Rect, Result};

use super::{Control, ControlData, ControlId, StateFlags};
use crate::behavior::{ControlBehavior, ShellBehavior};
use crate::display::Display;
use crate::native::{NativeEventKind, ZOrder};

impl Control {
    /// Create a control of kind `behavior` inside `parent`.
    ///
    /// Fails with `InvalidArgument` if `parent` is disposed, `InvalidParent`
    /// if it cannot hold children, and `NoHandles` if the native layer
    /// refuses to create a view.
    pub fn new(parent: &Control, behavior: impl ControlBehavior + 'static) -> Result<Control> {
        Self::with_behavior(parent, Rc::new(behavior))
    }

    /// Like [`new`](Self::new), with a shared behavior.
    pub fn with_behavior(parent: &Control, behavior: Rc<dyn ControlBehavior>) -> Result<Control> {
        if parent.is_disposed() {
            return Err(ControlError::InvalidArgument);
        }
        let (parent_handle, is_container) =
            parent.read(|data| (data.handle, data.behavior.is_container()))?;
        if !is_container {
            return Err(ControlError::InvalidParent);
        }
        Self::create(&parent.display, Some((parent.id, parent_handle)), behavior)
    }

    /// Create a shell: the root container of a new window.
    pub(crate) fn new_shell(display: &Display) -> Result<Control> {
        display.check_device()?;
        Self::create(display, None, Rc::new(ShellBehavior))
    }

    fn create(
        display: &Display,
        parent: Option<(ControlId, NativeHandle)>,
        behavior: Rc<dyn ControlBehavior>,
    ) -> Result<Control> {
        let platform = display.platform();
        let handle = platform
            .create_control(parent.map(|(_, handle)| handle))
            .ok_or(ControlError::NoHandles)?;
        let class = behavior.class_name();

        let id = {
            let mut controls = display.inner.controls.borrow_mut();
            let parent_id = parent.map(|(id, _)| id);
            let id = controls.insert(ControlData::new(handle, parent_id, behavior));
            if let Some(parent_data) = parent_id.and_then(|p| controls.get_mut(p)) {
                parent_data.children.push(id);
            }
            id
        };
        display.inner.handles.borrow_mut().register(handle, id);
        platform.install_event_handler(handle, &NativeEventKind::HOOKED);

        tracing::trace!(target: targets::LIFECYCLE, ?id, ?handle, class, "control created");
        Ok(Control::from_id(display, id))
    }

    /// Dispose the control and everything below it.
    ///
    /// Children are disposed first. For each control the attached menu is
    /// disposed (if still live), the handle is deregistered, the native view
    /// is released, owned references are dropped, and the parent link is
    /// cleared last. Disposing again is a no-op.
    pub fn dispose(&self) {
        if self.is_disposed() {
            return;
        }
        let span =
            tracing::trace_span!(target: targets::LIFECYCLE, span_names::DISPOSE, id = ?self.id);
        let _enter = span.enter();

        let children = self.read(|data| data.children.clone()).unwrap_or_default();
        for child in children {
            self.wrap(child).dispose();
        }
        self.release();
    }

    fn release(&self) {
        let taken = self.write(|data| {
            data.state.insert(StateFlags::DISPOSED);
            (data.handle, data.menu.take())
        });
        let Ok((handle, menu)) = taken else {
            return;
        };
        let inner = &self.display.inner;

        if let Some(menu) = menu.filter(|menu| !menu.is_disposed()) {
            menu.dispose();
        }

        inner.handles.borrow_mut().deregister(handle);
        inner.platform.dispose_control(handle);

        let removed = {
            let mut controls = inner.controls.borrow_mut();
            let removed = controls.remove(self.id);
            let parent = removed.as_ref().and_then(|data| data.parent);
            if let Some(parent_data) = parent.and_then(|p| controls.get_mut(p)) {
                parent_data.children.retain(|&c| c != self.id);
                if let Some(tab_list) = parent_data.tab_list.as_mut() {
                    tab_list.retain(|&c| c != self.id);
                }
            }
            removed
        };
        if inner.grab_control.get() == Some(self.id) {
            inner.grab_control.set(None);
        }

        // Owned values are dropped outside the arena borrow. The parent link
        // goes last.
        if let Some(mut data) = removed {
            drop(data.listeners.take());
            drop(data.layout_data.take());
            drop(data.foreground.take());
            drop(data.background.take());
            drop(data.cursor.take());
            drop(data.tooltip.take());
            drop(data.tab_list.take());
            data.parent = None;
        }

        tracing::trace!(target: targets::LIFECYCLE, id = ?self.id, ?handle, "control disposed");
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    /// Suppress (`false`) or restore (`true`) drawing.
    ///
    /// Calls nest: drawing is disabled on the first `false` and re-enabled,
    /// with a full repaint, on the `true` that balances it. A `true` with no
    /// outstanding `false` is ignored.
    pub fn set_redraw(&self, redraw: bool) -> Result<()> {
        let transition = self.write(|data| {
            if redraw {
                if data.draw_count == 0 {
                    return None;
                }
                data.draw_count -= 1;
                (data.draw_count == 0).then_some(data.handle)
            } else {
                data.draw_count += 1;
                (data.draw_count == 1).then_some(data.handle)
            }
        })?;

        if let Some(handle) = transition {
            let platform = self.display.platform();
            platform.set_drawing_enabled(handle, redraw);
            if redraw {
                platform.invalidate(handle, None);
            }
            tracing::trace!(target: targets::LIFECYCLE, id = ?self.id, redraw, "drawing toggled");
        }
        Ok(())
    }

    /// Whether drawing is currently enabled (no outstanding suppression).
    pub fn get_redraw(&self) -> Result<bool> {
        self.read(|data| data.draw_count == 0)
    }

    /// Mark the whole control as needing a repaint.
    pub fn redraw(&self) -> Result<()> {
        let handle = self.handle()?;
        self.display.platform().invalidate(handle, None);
        Ok(())
    }

    /// Mark `area` (control-local) as needing a repaint.
    pub fn redraw_area(&self, area: Rect, _all: bool) -> Result<()> {
        let handle = self.handle()?;
        self.display.platform().invalidate(handle, Some(area));
        Ok(())
    }

    /// Flush outstanding paints.
    pub fn update(&self) -> Result<()> {
        let handle = self.handle()?;
        self.display.platform().flush(handle);
        Ok(())
    }

    // =========================================================================
    // Z-order and parent
    // =========================================================================

    /// Move above `control`, or to the top when `None`.
    ///
    /// A disposed `control` is an `InvalidArgument` error; a control with a
    /// different parent is ignored.
    pub fn move_above(&self, control: Option<&Control>) -> Result<()> {
        self.restack(control, true)
    }

    /// Move below `control`, or to the bottom when `None`.
    pub fn move_below(&self, control: Option<&Control>) -> Result<()> {
        self.restack(control, false)
    }

    fn restack(&self, sibling: Option<&Control>, above: bool) -> Result<()> {
        let (handle, parent) = self.read(|data| (data.handle, data.parent))?;
        let sibling = match sibling {
            Some(other) => {
                if other.is_disposed() {
                    return Err(ControlError::InvalidArgument);
                }
                let other_parent = other.read(|data| data.parent)?;
                if other_parent != parent || other == self {
                    return Ok(());
                }
                Some((other.id, other.handle()?))
            }
            None => None,
        };

        if let Some(parent) = parent {
            let mut controls = self.display.inner.controls.borrow_mut();
            if let Some(parent_data) = controls.get_mut(parent) {
                let siblings = &mut parent_data.children;
                siblings.retain(|&c| c != self.id);
                let index = match (sibling, above) {
                    (None, true) => 0,
                    (None, false) => siblings.len(),
                    (Some((id, _)), true) => siblings.iter().position(|&c| c == id).unwrap_or(0),
                    (Some((id, _)), false) => siblings
                        .iter()
                        .position(|&c| c == id)
                        .map_or(siblings.len(), |i| i + 1),
                };
                siblings.insert(index, self.id);
            }
        }

        let other_handle = sibling.map(|(_, handle)| handle);
        let order = if above {
            ZOrder::Above(other_handle)
        } else {
            ZOrder::Below(other_handle)
        };
        self.display.platform().set_z_order(handle, order);
        Ok(())
    }

    /// Whether this control kind supports reparenting.
    pub fn is_reparentable(&self) -> Result<bool> {
        Ok(self.behavior()?.is_reparentable())
    }

    /// Request a move to `parent`.
    ///
    /// The native layer cannot move views between windows, so this always
    /// reports `false`. A disposed `parent` is an `InvalidArgument` error.
    pub fn set_parent(&self, parent: &Control) -> Result<bool> {
        self.check_widget()?;
        if parent.is_disposed() {
            return Err(ControlError::InvalidArgument);
        }
        Ok(false)
    }
}
