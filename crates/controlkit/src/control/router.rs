//! Native event normalization and listener delivery.
//!
//! One native subscription per control feeds [`Control::handle_native_event`],
//! which turns each native callback into zero or more portable events:
//!
//! | Native | Portable |
//! |---|---|
//! | BoundsChanged | Move, then Resize, per changed flag |
//! | ContextualMenuClick | shows the attached popup menu |
//! | Draw | Paint, with a scoped paint context |
//! | SetFocusPart | FocusIn (part ≠ 0) or FocusOut |
//! | MouseDown | MouseDown, then MouseDoubleClick at the double-click count |
//! | MouseUp / Moved / Dragged | MouseUp / MouseMove |
//! | MouseEntered / Exited / Hovered | MouseEnter / MouseExit / MouseHover |
//! | RawKeyDown / Repeat | Traverse, or KeyDown |
//! | RawKeyUp | KeyUp |
//! | ModifiersChanged | one KeyDown/KeyUp per changed modifier |
//! | HelpRequested | Help |
//!
//! After every listener invocation the control is re-checked; once it (or
//! the display) is disposed the remaining steps are skipped and the native
//! layer is told the event was not handled.

use controlkit_core::logging::targets;
use controlkit_core::{ModifierEdge, ModifierRole, Modifiers, NativeHandle, Point, Rect, Result};

use super::Control;
use crate::event::{Event, EventType, KeyCode, TraversalIntent};
use crate::native::{NativeEvent, NativeKey, NativeMouse, NativeResult, PaintGuard};

/// Outcome of delivering one event to a control's listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Every listener ran and `doit` is still set.
    Continue,
    /// Every listener ran and one of them cleared `doit`.
    Vetoed,
    /// The control or its display was disposed; delivery stopped.
    Disposed,
}

impl Delivery {
    #[inline]
    pub fn is_disposed(self) -> bool {
        matches!(self, Self::Disposed)
    }

    #[inline]
    pub fn is_vetoed(self) -> bool {
        matches!(self, Self::Vetoed)
    }
}

fn modifier_key_code(role: ModifierRole) -> KeyCode {
    match role {
        ModifierRole::Shift => KeyCode::Shift,
        ModifierRole::Control => KeyCode::Control,
        ModifierRole::Command => KeyCode::Command,
        ModifierRole::Option => KeyCode::Option,
    }
}

impl Control {
    /// Deliver `event` as `kind` to the listeners registered right now.
    ///
    /// The listener sequence is snapshotted first. A listener removed by an
    /// earlier one during this delivery is skipped; one added during it
    /// first runs on the next delivery.
    pub(crate) fn send_event(&self, kind: EventType, event: &mut Event) -> Delivery {
        event.kind = kind;
        event.widget = Some(self.clone());

        let snapshot = self.read(|data| {
            data.listeners
                .as_ref()
                .map(|registry| registry.listeners(kind))
                .unwrap_or_default()
        });
        let Ok(snapshot) = snapshot else {
            return Delivery::Disposed;
        };

        for listener in snapshot {
            let hooked = self.read(|data| {
                data.listeners
                    .as_ref()
                    .is_some_and(|registry| registry.contains(kind, &listener))
            });
            match hooked {
                Ok(true) => listener.handle_event(event),
                Ok(false) => continue,
                Err(_) => return Delivery::Disposed,
            }
            if self.is_disposed() {
                tracing::trace!(
                    target: targets::ROUTER,
                    id = ?self.id,
                    ?kind,
                    "disposed by listener"
                );
                return Delivery::Disposed;
            }
        }

        if event.doit {
            Delivery::Continue
        } else {
            Delivery::Vetoed
        }
    }

    /// Normalize one native callback and deliver the resulting events.
    pub(crate) fn handle_native_event(&self, event: &NativeEvent) -> Result<NativeResult> {
        self.check_widget()?;
        match event {
            NativeEvent::BoundsChanged {
                position_changed,
                size_changed,
            } => Ok(self.on_bounds_changed(*position_changed, *size_changed)),
            NativeEvent::ContextualMenuClick { location } => {
                self.on_contextual_menu_click(*location)
            }
            NativeEvent::Deactivate => Ok(NativeResult::NotHandled),
            NativeEvent::Draw { target, damage } => self.on_draw(*target, *damage),
            NativeEvent::SetFocusPart { part } => {
                let kind = if *part != 0 {
                    EventType::FocusIn
                } else {
                    EventType::FocusOut
                };
                self.send_event(kind, &mut Event::new(kind));
                Ok(NativeResult::NotHandled)
            }
            NativeEvent::MouseDown(mouse) => self.on_mouse_down(mouse),
            NativeEvent::MouseUp(mouse) => {
                if self.send_mouse_event(EventType::MouseUp, mouse)?.is_disposed() {
                    return Ok(NativeResult::NotHandled);
                }
                let grab = &self.display.inner.grab_control;
                if grab.get() == Some(self.id) {
                    grab.set(None);
                }
                Ok(NativeResult::NotHandled)
            }
            NativeEvent::MouseMoved(mouse) | NativeEvent::MouseDragged(mouse) => {
                self.send_mouse_event(EventType::MouseMove, mouse)?;
                Ok(NativeResult::NotHandled)
            }
            NativeEvent::MouseEntered(mouse) => {
                self.send_mouse_event(EventType::MouseEnter, mouse)?;
                Ok(NativeResult::NotHandled)
            }
            NativeEvent::MouseExited(mouse) => {
                self.send_mouse_event(EventType::MouseExit, mouse)?;
                Ok(NativeResult::NotHandled)
            }
            NativeEvent::MouseHovered(mouse) => {
                self.send_mouse_event(EventType::MouseHover, mouse)?;
                Ok(NativeResult::NotHandled)
            }
            NativeEvent::RawKeyDown(key) | NativeEvent::RawKeyRepeat(key) => self.on_key_down(key),
            NativeEvent::RawKeyUp(key) => {
                let mut event = key_event(EventType::KeyUp, key);
                Ok(key_result(self.send_event(EventType::KeyUp, &mut event)))
            }
            NativeEvent::ModifiersChanged { modifiers, time } => {
                Ok(self.on_modifiers_changed(*modifiers, *time))
            }
            NativeEvent::HelpRequested { time } => {
                if !self.is_listening(EventType::Help)? {
                    return Ok(NativeResult::NotHandled);
                }
                let mut event = Event::new(EventType::Help);
                event.time = *time;
                match self.send_event(EventType::Help, &mut event) {
                    Delivery::Disposed => Ok(NativeResult::NotHandled),
                    _ => Ok(NativeResult::Handled),
                }
            }
        }
    }

    fn on_bounds_changed(&self, position_changed: bool, size_changed: bool) -> NativeResult {
        if position_changed
            && self
                .send_event(EventType::Move, &mut Event::new(EventType::Move))
                .is_disposed()
        {
            return NativeResult::NotHandled;
        }
        if size_changed {
            self.send_event(EventType::Resize, &mut Event::new(EventType::Resize));
        }
        NativeResult::NotHandled
    }

    fn on_contextual_menu_click(&self, location: Point) -> Result<NativeResult> {
        let menu = self.read(|data| data.menu.clone())?;
        match menu {
            Some(menu) if !menu.is_disposed() => {
                menu.set_location(location);
                menu.set_visible(true);
                Ok(NativeResult::Handled)
            }
            _ => Ok(NativeResult::NotHandled),
        }
    }

    fn on_draw(&self, target: NativeHandle, damage: Rect) -> Result<NativeResult> {
        let handle = self.handle()?;
        if target != handle || !self.is_listening(EventType::Paint)? {
            return Ok(NativeResult::NotHandled);
        }

        let platform = self.display.platform();
        let Some(guard) = PaintGuard::acquire(platform, handle, damage) else {
            tracing::warn!(target: targets::ROUTER, ?handle, "no paint context available");
            return Ok(NativeResult::NotHandled);
        };

        let mut event = Event::new(EventType::Paint);
        event.set_bounds(damage);
        event.gc = Some(guard.context());
        let delivery = self.send_event(EventType::Paint, &mut event);
        event.gc = None;
        drop(guard);

        if delivery.is_disposed() {
            Ok(NativeResult::NotHandled)
        } else {
            Ok(NativeResult::Handled)
        }
    }

    fn mouse_event(&self, kind: EventType, mouse: &NativeMouse) -> Result<Event> {
        let location = self.to_control(mouse.location)?;
        let mut event = Event::new(kind);
        event.x = location.x;
        event.y = location.y;
        event.button = mouse.button;
        event.click_count = mouse.click_count;
        event.state_mask = mouse.modifiers;
        event.time = mouse.time;
        Ok(event)
    }

    fn send_mouse_event(&self, kind: EventType, mouse: &NativeMouse) -> Result<Delivery> {
        let mut event = self.mouse_event(kind, mouse)?;
        Ok(self.send_event(kind, &mut event))
    }

    fn on_mouse_down(&self, mouse: &NativeMouse) -> Result<NativeResult> {
        if self.send_mouse_event(EventType::MouseDown, mouse)?.is_disposed() {
            return Ok(NativeResult::NotHandled);
        }
        if mouse.click_count == self.display.config().double_click_count
            && self
                .send_mouse_event(EventType::MouseDoubleClick, mouse)?
                .is_disposed()
        {
            return Ok(NativeResult::NotHandled);
        }
        self.display.inner.grab_control.set(Some(self.id));
        Ok(NativeResult::NotHandled)
    }

    fn on_key_down(&self, key: &NativeKey) -> Result<NativeResult> {
        let intent = TraversalIntent::from_key(key.key_code, key.modifiers);
        if intent != TraversalIntent::None {
            let mut event = key_event(EventType::Traverse, key);
            event.detail = intent;
            let performed = self.traverse_event(&mut event);
            if self.is_disposed() {
                return Ok(NativeResult::NotHandled);
            }
            if performed {
                return Ok(NativeResult::Handled);
            }
        }
        let mut event = key_event(EventType::KeyDown, key);
        Ok(key_result(self.send_event(EventType::KeyDown, &mut event)))
    }

    /// Turn a modifier level change into per-key edges.
    ///
    /// The display's last observed level is updated before any listener
    /// runs, so a nested modifier callback sees the new baseline.
    fn on_modifiers_changed(&self, modifiers: Modifiers, time: u32) -> NativeResult {
        let previous = self.display.inner.last_modifiers.replace(modifiers);
        let mut level = previous;
        let mut vetoed = false;
        for edge in ModifierEdge::between(previous, modifiers) {
            let kind = if edge.pressed {
                EventType::KeyDown
            } else {
                EventType::KeyUp
            };
            let mut event = Event::new(kind);
            event.key_code = modifier_key_code(edge.role);
            event.state_mask = level;
            event.time = time;
            match self.send_event(kind, &mut event) {
                Delivery::Disposed => return NativeResult::NotHandled,
                Delivery::Vetoed => vetoed = true,
                Delivery::Continue => {}
            }
            level.set(edge.role.flag(), edge.pressed);
        }
        if vetoed {
            NativeResult::Handled
        } else {
            NativeResult::NotHandled
        }
    }
}

fn key_event(kind: EventType, key: &NativeKey) -> Event {
    let mut event = Event::new(kind);
    event.key_code = key.key_code;
    event.character = key.character;
    event.state_mask = key.modifiers;
    event.time = key.time;
    event
}

/// A vetoed key event suppresses the native default.
fn key_result(delivery: Delivery) -> NativeResult {
    match delivery {
        Delivery::Vetoed => NativeResult::Handled,
        Delivery::Continue | Delivery::Disposed => NativeResult::NotHandled,
    }
}
