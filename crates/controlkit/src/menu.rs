//! Menus attached to controls.
//!
//! Menu construction and item management belong to the menu subsystem; the
//! control layer only needs a menu's style, the shell it belongs to, whether
//! it is disposed, and the ability to position and show a popup. A control
//! references its popup menu, it does not own it, but disposing the control
//! disposes a still-live menu once.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use controlkit_core::logging::targets;
use controlkit_core::{Point, Result};

use crate::control::{Control, ControlId};

/// The role a menu plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuStyle {
    /// A context menu shown at the pointer.
    PopUp,
    /// A window's menu bar.
    Bar,
    /// A cascading submenu.
    DropDown,
}

struct MenuInner {
    style: MenuStyle,
    shell: ControlId,
    disposed: Cell<bool>,
    visible: Cell<bool>,
    location: Cell<Option<Point>>,
    dispose_observer: RefCell<Option<Box<dyn Fn(&Menu)>>>,
}

/// A shared reference to a menu.
#[derive(Clone)]
pub struct Menu {
    inner: Rc<MenuInner>,
}

impl Menu {
    /// Create a menu belonging to the shell of `parent`.
    pub fn new(parent: &Control, style: MenuStyle) -> Result<Self> {
        let shell = parent.shell()?;
        Ok(Self {
            inner: Rc::new(MenuInner {
                style,
                shell: shell.id(),
                disposed: Cell::new(false),
                visible: Cell::new(false),
                location: Cell::new(None),
                dispose_observer: RefCell::new(None),
            }),
        })
    }

    #[inline]
    pub fn style(&self) -> MenuStyle {
        self.inner.style
    }

    /// The shell this menu belongs to.
    #[inline]
    pub fn shell_id(&self) -> ControlId {
        self.inner.shell
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn is_visible(&self) -> bool {
        self.inner.visible.get()
    }

    /// Show or hide the menu. Ignored once disposed.
    pub fn set_visible(&self, visible: bool) {
        if !self.is_disposed() {
            self.inner.visible.set(visible);
        }
    }

    /// Where the menu was last positioned, in screen coordinates.
    pub fn location(&self) -> Option<Point> {
        self.inner.location.get()
    }

    /// Position the menu. Ignored once disposed.
    pub fn set_location(&self, location: Point) {
        if !self.is_disposed() {
            self.inner.location.set(Some(location));
        }
    }

    /// Release the menu. Disposing twice is a no-op.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.visible.set(false);
        tracing::trace!(target: targets::LIFECYCLE, menu = ?self, "menu disposed");
        let observer = self.inner.dispose_observer.borrow_mut().take();
        if let Some(observer) = observer {
            observer(self);
        }
    }

    /// Call `observer` when the menu is released. It runs at most once.
    pub fn set_dispose_observer(&self, observer: impl Fn(&Menu) + 'static) {
        if !self.is_disposed() {
            *self.inner.dispose_observer.borrow_mut() = Some(Box::new(observer));
        }
    }

    /// Whether both values refer to the same menu.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Menu {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("style", &self.inner.style)
            .field("shell", &self.inner.shell)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
