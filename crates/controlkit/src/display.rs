//! The application context.
//!
//! A [`Display`] owns everything controls share: the control arena, the
//! native handle table, the last observed keyboard modifiers, the grab
//! control, and the [`NativePlatform`] every control talks to. It is also
//! the single entry point for native callbacks
//! ([`dispatch_native_event`](Display::dispatch_native_event)).
//!
//! `Display` is a cheap, clonable handle. It is bound to the thread that
//! created it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use controlkit_core::logging::{span_names, targets};
use controlkit_core::{ControlError, HandleTable, Modifiers, NativeHandle, Result, Size};
use slotmap::SlotMap;

use crate::control::{Control, ControlData, ControlId};
use crate::native::{NativeEvent, NativePlatform, NativeResult};
use crate::resource::{Color, SystemColor};

/// Default control width and height used by `compute_size`.
pub const DEFAULT_CONTROL_SIZE: Size = Size::new(64, 64);

/// Click count at which a press also produces a double-click.
pub const DEFAULT_DOUBLE_CLICK_COUNT: u32 = 2;

/// Configuration for a [`Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Size returned by `compute_size` when no hint is given, before borders.
    pub default_size: Size,
    /// Native click count that triggers a MouseDoubleClick after MouseDown.
    pub double_click_count: u32,
    /// Catch listener panics at the native dispatch boundary and report the
    /// event as not handled, instead of unwinding into the native pump.
    pub contain_listener_panics: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_CONTROL_SIZE,
            double_click_count: DEFAULT_DOUBLE_CLICK_COUNT,
            contain_listener_panics: true,
        }
    }
}

/// Builder for creating a [`Display`] with custom configuration.
#[derive(Debug, Default)]
pub struct DisplayBuilder {
    config: DisplayConfig,
}

impl DisplayBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default control size.
    pub fn default_size(mut self, size: Size) -> Self {
        self.config.default_size = size;
        self
    }

    /// Set the click count that produces a double-click.
    pub fn double_click_count(mut self, count: u32) -> Self {
        self.config.double_click_count = count;
        self
    }

    /// Choose whether listener panics are contained at the native boundary.
    pub fn contain_listener_panics(mut self, contain: bool) -> Self {
        self.config.contain_listener_panics = contain;
        self
    }

    /// Build the display on top of `platform`.
    pub fn build(self, platform: Rc<dyn NativePlatform>) -> Display {
        Display::with_config(platform, self.config)
    }
}

pub(crate) struct DisplayInner {
    pub(crate) platform: Rc<dyn NativePlatform>,
    pub(crate) config: DisplayConfig,
    pub(crate) controls: RefCell<SlotMap<ControlId, ControlData>>,
    pub(crate) handles: RefCell<HandleTable<ControlId>>,
    pub(crate) last_modifiers: Cell<Modifiers>,
    pub(crate) grab_control: Cell<Option<ControlId>>,
    disposed: Cell<bool>,
    black: Color,
    white: Color,
}

/// Shared application context for a tree of controls.
#[derive(Clone)]
pub struct Display {
    pub(crate) inner: Rc<DisplayInner>,
}

static_assertions::assert_not_impl_any!(Display: Send, Sync);

impl Display {
    /// Create a display with the default configuration.
    pub fn new(platform: Rc<dyn NativePlatform>) -> Self {
        Self::with_config(platform, DisplayConfig::default())
    }

    /// Create a display with the given configuration.
    pub fn with_config(platform: Rc<dyn NativePlatform>, config: DisplayConfig) -> Self {
        tracing::debug!(target: targets::LIFECYCLE, ?config, "display created");
        Self {
            inner: Rc::new(DisplayInner {
                platform,
                config,
                controls: RefCell::new(SlotMap::with_key()),
                handles: RefCell::new(HandleTable::new()),
                last_modifiers: Cell::new(Modifiers::empty()),
                grab_control: Cell::new(None),
                disposed: Cell::new(false),
                black: Color::rgb(0, 0, 0),
                white: Color::rgb(0xff, 0xff, 0xff),
            }),
        }
    }

    /// Start building a display with custom configuration.
    pub fn builder() -> DisplayBuilder {
        DisplayBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &DisplayConfig {
        &self.inner.config
    }

    /// The native layer this display drives.
    #[inline]
    pub fn platform(&self) -> &dyn NativePlatform {
        self.inner.platform.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub(crate) fn check_device(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(ControlError::WidgetDisposed);
        }
        Ok(())
    }

    /// Whether both values refer to the same display.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Create a new top-level window with its root container.
    pub fn create_shell(&self) -> Result<Control> {
        Control::new_shell(self)
    }

    /// Every live top-level control.
    pub fn shells(&self) -> Vec<Control> {
        let ids: Vec<ControlId> = self
            .inner
            .controls
            .borrow()
            .iter()
            .filter(|(_, data)| data.parent.is_none())
            .map(|(id, _)| id)
            .collect();
        ids.into_iter()
            .map(|id| Control::from_id(self, id))
            .filter(|c| !c.is_disposed())
            .collect()
    }

    /// Number of live controls.
    pub fn control_count(&self) -> usize {
        self.inner.controls.borrow().len()
    }

    /// The control registered for `handle`, if any.
    pub fn find_control(&self, handle: NativeHandle) -> Option<Control> {
        let id = self.inner.handles.borrow().get(handle)?;
        let control = Control::from_id(self, id);
        (!control.is_disposed()).then_some(control)
    }

    /// The control that has keyboard focus, as reported by the native layer.
    pub fn focus_control(&self) -> Option<Control> {
        if self.is_disposed() {
            return None;
        }
        let handle = self.inner.platform.keyboard_focus()?;
        self.find_control(handle)
    }

    /// The control that received the last mouse press, until release.
    pub fn grab_control(&self) -> Option<Control> {
        let id = self.inner.grab_control.get()?;
        let control = Control::from_id(self, id);
        (!control.is_disposed()).then_some(control)
    }

    /// Modifiers held as of the last modifier change.
    pub fn last_modifiers(&self) -> Modifiers {
        self.inner.last_modifiers.get()
    }

    /// A color the display supplies as a fallback.
    pub fn system_color(&self, color: SystemColor) -> Color {
        match color {
            SystemColor::Black => self.inner.black.clone(),
            SystemColor::White => self.inner.white.clone(),
        }
    }

    /// Dispose every shell, then the display itself. Idempotent.
    pub fn dispose(&self) {
        if self.is_disposed() {
            return;
        }
        tracing::debug!(target: targets::LIFECYCLE, "disposing display");
        for shell in self.shells() {
            shell.dispose();
        }
        self.inner.disposed.set(true);
        self.inner.grab_control.set(None);
        let remaining = std::mem::take(&mut *self.inner.controls.borrow_mut());
        drop(remaining);
    }

    // =========================================================================
    // Native dispatch
    // =========================================================================

    /// Route one native callback to the control that owns `handle`.
    ///
    /// Unknown handles, controls disposed mid-dispatch, errors raised while
    /// handling and (when configured) listener panics all yield
    /// [`NativeResult::NotHandled`]; nothing propagates into the caller.
    pub fn dispatch_native_event(&self, handle: NativeHandle, event: &NativeEvent) -> NativeResult {
        let span = tracing::trace_span!(
            target: targets::ROUTER,
            span_names::NATIVE_EVENT,
            ?handle,
            kind = ?event.kind()
        );
        let _enter = span.enter();

        if self.is_disposed() {
            return NativeResult::NotHandled;
        }
        let Some(control) = self.find_control(handle) else {
            tracing::trace!(target: targets::ROUTER, ?handle, "no control for handle");
            return NativeResult::NotHandled;
        };

        let outcome = if self.inner.config.contain_listener_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| control.handle_native_event(event))) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    tracing::error!(
                        target: targets::ROUTER,
                        ?handle,
                        panic = panic_message(payload.as_ref()),
                        "listener panicked during native dispatch"
                    );
                    return NativeResult::NotHandled;
                }
            }
        } else {
            control.handle_native_event(event)
        };

        match outcome {
            Ok(result) => result,
            Err(error) => {
                tracing::warn!(target: targets::ROUTER, ?handle, %error, "native dispatch failed");
                NativeResult::NotHandled
            }
        }
    }

    /// Drain and dispatch events the native layer queued. Returns how many
    /// were dispatched, including any queued while dispatching.
    pub fn dispatch_pending(&self) -> usize {
        let mut count = 0;
        loop {
            let pending = self.inner.platform.take_pending_events();
            if pending.is_empty() {
                return count;
            }
            for (handle, event) in pending {
                self.dispatch_native_event(handle, &event);
                count += 1;
            }
        }
    }
}

impl PartialEq for Display {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let controls = self.inner.controls.try_borrow().map(|c| c.len()).ok();
        f.debug_struct("Display")
            .field("controls", &controls)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
