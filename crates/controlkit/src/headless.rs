//! An in-memory [`NativePlatform`].
//!
//! `HeadlessPlatform` keeps a view tree with bounds, visibility and z-order,
//! records the calls that matter for drawing and focus, and queues bounds
//! change events the way a real windowing system would post them. It can be
//! told to refuse focus, paint contexts or new handles so that failure paths
//! can be exercised.
//!
//! ```
//! use std::rc::Rc;
//! use controlkit::{Display, HeadlessPlatform};
//!
//! let platform = Rc::new(HeadlessPlatform::new());
//! let display = Display::new(platform.clone());
//! let shell = display.create_shell().unwrap();
//!
//! assert!(platform.is_alive(shell.handle().unwrap()));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use controlkit_core::logging::targets;
use controlkit_core::{NativeHandle, Rect};

use crate::native::{NativeEvent, NativeEventKind, NativePlatform, PaintContextId, ZOrder};

/// Callback invoked from [`NativePlatform::dispose_control`].
type DisposeObserver = Box<dyn Fn(NativeHandle)>;

#[derive(Debug)]
struct View {
    parent: Option<NativeHandle>,
    /// Subviews, topmost first.
    children: Vec<NativeHandle>,
    bounds: Rect,
    visible: bool,
    enabled: bool,
    drawing_enabled: bool,
    hooked: Vec<NativeEventKind>,
    /// Window content area, for root views.
    window: Rect,
}

impl View {
    fn new(parent: Option<NativeHandle>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            bounds: Rect::ZERO,
            visible: true,
            enabled: true,
            drawing_enabled: true,
            hooked: Vec::new(),
            window: Rect::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct HeadlessState {
    views: HashMap<NativeHandle, View>,
    focus: Option<NativeHandle>,
    next_context: u64,
    open_contexts: HashSet<PaintContextId>,
    released_contexts: Vec<PaintContextId>,
    drawing_changes: Vec<(NativeHandle, bool)>,
    invalidations: Vec<(NativeHandle, Option<Rect>)>,
    disposed: Vec<NativeHandle>,
    pending: Vec<(NativeHandle, NativeEvent)>,
}

/// In-memory native layer for tests and headless use.
pub struct HeadlessPlatform {
    state: RefCell<HeadlessState>,
    next_handle: Cell<u64>,
    refuse_focus: Cell<bool>,
    refuse_paint_contexts: Cell<bool>,
    refuse_handles: Cell<bool>,
    dispose_observer: RefCell<Option<DisposeObserver>>,
}

impl HeadlessPlatform {
    /// Create an empty platform.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(HeadlessState::default()),
            next_handle: Cell::new(0x100),
            refuse_focus: Cell::new(false),
            refuse_paint_contexts: Cell::new(false),
            refuse_handles: Cell::new(false),
            dispose_observer: RefCell::new(None),
        }
    }

    /// Refuse every keyboard focus request from now on.
    pub fn set_refuse_focus(&self, refuse: bool) {
        self.refuse_focus.set(refuse);
    }

    /// Fail every paint context request from now on.
    pub fn set_refuse_paint_contexts(&self, refuse: bool) {
        self.refuse_paint_contexts.set(refuse);
    }

    /// Fail every control creation from now on.
    pub fn set_refuse_handles(&self, refuse: bool) {
        self.refuse_handles.set(refuse);
    }

    /// Run `observer` each time a native view is released.
    pub fn set_dispose_observer(&self, observer: impl Fn(NativeHandle) + 'static) {
        *self.dispose_observer.borrow_mut() = Some(Box::new(observer));
    }

    /// Place the window owning root view `root` on screen.
    pub fn set_window_bounds(&self, root: NativeHandle, window: Rect) {
        if let Some(view) = self.state.borrow_mut().views.get_mut(&root) {
            view.window = window;
        }
    }

    /// Whether `handle` refers to a live view.
    pub fn is_alive(&self, handle: NativeHandle) -> bool {
        self.state.borrow().views.contains_key(&handle)
    }

    /// Number of live views.
    pub fn view_count(&self) -> usize {
        self.state.borrow().views.len()
    }

    /// Handles released so far, in release order.
    pub fn disposed_handles(&self) -> Vec<NativeHandle> {
        self.state.borrow().disposed.clone()
    }

    /// Whether drawing is currently enabled for `handle`.
    pub fn is_drawing_enabled(&self, handle: NativeHandle) -> bool {
        self.state
            .borrow()
            .views
            .get(&handle)
            .is_some_and(|v| v.drawing_enabled)
    }

    /// Every drawing enable/disable call made for `handle`, in order.
    pub fn drawing_changes(&self, handle: NativeHandle) -> Vec<bool> {
        self.state
            .borrow()
            .drawing_changes
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, enabled)| *enabled)
            .collect()
    }

    /// Every invalidation requested for `handle`, in order.
    pub fn invalidations(&self, handle: NativeHandle) -> Vec<Option<Rect>> {
        self.state
            .borrow()
            .invalidations
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, region)| *region)
            .collect()
    }

    /// Whether the view's own visibility flag is set.
    pub fn is_view_visible(&self, handle: NativeHandle) -> bool {
        self.state
            .borrow()
            .views
            .get(&handle)
            .is_some_and(|v| v.visible)
    }

    /// Whether the view is enabled.
    pub fn is_view_enabled(&self, handle: NativeHandle) -> bool {
        self.state
            .borrow()
            .views
            .get(&handle)
            .is_some_and(|v| v.enabled)
    }

    /// Subviews of `handle`, topmost first.
    pub fn subviews(&self, handle: NativeHandle) -> Vec<NativeHandle> {
        self.state
            .borrow()
            .views
            .get(&handle)
            .map(|v| v.children.clone())
            .unwrap_or_default()
    }

    /// Event kinds installed for `handle`.
    pub fn hooked_kinds(&self, handle: NativeHandle) -> Vec<NativeEventKind> {
        self.state
            .borrow()
            .views
            .get(&handle)
            .map(|v| v.hooked.clone())
            .unwrap_or_default()
    }

    /// Paint contexts acquired and not yet released.
    pub fn open_paint_contexts(&self) -> usize {
        self.state.borrow().open_contexts.len()
    }

    /// Paint contexts released so far.
    pub fn released_paint_contexts(&self) -> Vec<PaintContextId> {
        self.state.borrow().released_contexts.clone()
    }

    /// Queue an event as if the windowing system had posted it.
    pub fn post_event(&self, handle: NativeHandle, event: NativeEvent) {
        self.state.borrow_mut().pending.push((handle, event));
    }

    fn root_of(state: &HeadlessState, handle: NativeHandle) -> Option<NativeHandle> {
        let mut current = handle;
        loop {
            let view = state.views.get(&current)?;
            match view.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    fn remove_view(state: &mut HeadlessState, handle: NativeHandle) {
        let Some(view) = state.views.remove(&handle) else {
            return;
        };
        for child in view.children {
            Self::remove_view(state, child);
        }
        if let Some(parent) = view.parent.and_then(|p| state.views.get_mut(&p)) {
            parent.children.retain(|&c| c != handle);
        }
        if state.focus == Some(handle) {
            state.focus = None;
        }
        state.pending.retain(|(h, _)| *h != handle);
        state.disposed.push(handle);
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl NativePlatform for HeadlessPlatform {
    fn create_control(&self, parent: Option<NativeHandle>) -> Option<NativeHandle> {
        if self.refuse_handles.get() {
            return None;
        }
        let mut state = self.state.borrow_mut();
        if let Some(parent) = parent {
            let parent_view = state.views.get_mut(&parent)?;
            let handle = NativeHandle::from_raw(self.next_handle.get());
            // New subviews go to the bottom of the z-order.
            parent_view.children.push(handle);
            state.views.insert(handle, View::new(Some(parent)));
            self.next_handle.set(self.next_handle.get() + 1);
            Some(handle)
        } else {
            let handle = NativeHandle::from_raw(self.next_handle.get());
            state.views.insert(handle, View::new(None));
            self.next_handle.set(self.next_handle.get() + 1);
            Some(handle)
        }
    }

    fn dispose_control(&self, handle: NativeHandle) {
        tracing::trace!(target: targets::NATIVE, ?handle, "headless dispose");
        if let Some(observer) = self.dispose_observer.borrow().as_ref() {
            observer(handle);
        }
        Self::remove_view(&mut self.state.borrow_mut(), handle);
    }

    fn install_event_handler(&self, handle: NativeHandle, kinds: &[NativeEventKind]) {
        if let Some(view) = self.state.borrow_mut().views.get_mut(&handle) {
            view.hooked.extend_from_slice(kinds);
        }
    }

    fn super_control(&self, handle: NativeHandle) -> Option<NativeHandle> {
        self.state.borrow().views.get(&handle)?.parent
    }

    fn root_control(&self, handle: NativeHandle) -> Option<NativeHandle> {
        Self::root_of(&self.state.borrow(), handle)
    }

    fn window_bounds(&self, handle: NativeHandle) -> Rect {
        let state = self.state.borrow();
        Self::root_of(&state, handle)
            .and_then(|root| state.views.get(&root))
            .map_or(Rect::ZERO, |root| root.window)
    }

    fn control_bounds(&self, handle: NativeHandle) -> Rect {
        self.state
            .borrow()
            .views
            .get(&handle)
            .map_or(Rect::ZERO, |v| v.bounds)
    }

    fn set_control_bounds(&self, handle: NativeHandle, bounds: Rect) {
        let mut state = self.state.borrow_mut();
        let Some(view) = state.views.get_mut(&handle) else {
            return;
        };
        let position_changed = view.bounds.origin != bounds.origin;
        let size_changed = view.bounds.size != bounds.size;
        view.bounds = bounds;
        if position_changed || size_changed {
            state.pending.push((
                handle,
                NativeEvent::BoundsChanged {
                    position_changed,
                    size_changed,
                },
            ));
        }
    }

    fn set_visible(&self, handle: NativeHandle, visible: bool) {
        if let Some(view) = self.state.borrow_mut().views.get_mut(&handle) {
            view.visible = visible;
        }
    }

    fn is_visible(&self, handle: NativeHandle) -> bool {
        let state = self.state.borrow();
        let mut current = Some(handle);
        while let Some(h) = current {
            match state.views.get(&h) {
                Some(view) if view.visible => current = view.parent,
                _ => return false,
            }
        }
        true
    }

    fn set_enabled(&self, handle: NativeHandle, enabled: bool) {
        if let Some(view) = self.state.borrow_mut().views.get_mut(&handle) {
            view.enabled = enabled;
        }
    }

    fn set_drawing_enabled(&self, handle: NativeHandle, enabled: bool) {
        let mut state = self.state.borrow_mut();
        if let Some(view) = state.views.get_mut(&handle) {
            view.drawing_enabled = enabled;
            state.drawing_changes.push((handle, enabled));
        }
    }

    fn invalidate(&self, handle: NativeHandle, region: Option<Rect>) {
        self.state.borrow_mut().invalidations.push((handle, region));
    }

    fn set_keyboard_focus(&self, handle: NativeHandle) -> bool {
        if self.refuse_focus.get() {
            return false;
        }
        let mut state = self.state.borrow_mut();
        if !state.views.contains_key(&handle) {
            return false;
        }
        state.focus = Some(handle);
        true
    }

    fn keyboard_focus(&self) -> Option<NativeHandle> {
        self.state.borrow().focus
    }

    fn set_z_order(&self, handle: NativeHandle, order: ZOrder) {
        let mut state = self.state.borrow_mut();
        let Some(parent) = state.views.get(&handle).and_then(|v| v.parent) else {
            return;
        };
        let Some(parent_view) = state.views.get_mut(&parent) else {
            return;
        };
        let siblings = &mut parent_view.children;
        siblings.retain(|&c| c != handle);
        let index = match order {
            ZOrder::Above(None) => 0,
            ZOrder::Below(None) => siblings.len(),
            ZOrder::Above(Some(other)) => siblings
                .iter()
                .position(|&c| c == other)
                .unwrap_or(0),
            ZOrder::Below(Some(other)) => siblings
                .iter()
                .position(|&c| c == other)
                .map_or(siblings.len(), |i| i + 1),
        };
        siblings.insert(index, handle);
    }

    fn create_paint_context(&self, handle: NativeHandle, _damage: Rect) -> Option<PaintContextId> {
        if self.refuse_paint_contexts.get() {
            return None;
        }
        let mut state = self.state.borrow_mut();
        if !state.views.contains_key(&handle) {
            return None;
        }
        state.next_context += 1;
        let context = PaintContextId::from_raw(state.next_context);
        state.open_contexts.insert(context);
        Some(context)
    }

    fn release_paint_context(&self, context: PaintContextId) {
        let mut state = self.state.borrow_mut();
        state.open_contexts.remove(&context);
        state.released_contexts.push(context);
    }

    fn take_pending_events(&self) -> Vec<(NativeHandle, NativeEvent)> {
        std::mem::take(&mut self.state.borrow_mut().pending)
    }
}
