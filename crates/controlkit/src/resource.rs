//! Resource objects handed to controls.
//!
//! Controls store colors and cursors by reference and forward them to the
//! native layer; they never create or release the underlying resources.
//! Both types are shared handles with an explicit disposed state so that a
//! control can reject a resource whose owner already released it.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use cursor_icon::CursorIcon;

struct ColorInner {
    red: u8,
    green: u8,
    blue: u8,
    disposed: Cell<bool>,
}

/// A shared RGB color.
#[derive(Clone)]
pub struct Color {
    inner: Rc<ColorInner>,
}

impl Color {
    /// Create a color from 8-bit components.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            inner: Rc::new(ColorInner {
                red,
                green,
                blue,
                disposed: Cell::new(false),
            }),
        }
    }

    #[inline]
    pub fn red(&self) -> u8 {
        self.inner.red
    }

    #[inline]
    pub fn green(&self) -> u8 {
        self.inner.green
    }

    #[inline]
    pub fn blue(&self) -> u8 {
        self.inner.blue
    }

    /// The components as a tuple.
    pub fn components(&self) -> (u8, u8, u8) {
        (self.inner.red, self.inner.green, self.inner.blue)
    }

    /// Release the color. Every clone observes the disposed state.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.components() == other.components()
    }
}

impl Eq for Color {}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.components();
        write!(f, "Color(#{r:02x}{g:02x}{b:02x})")?;
        if self.is_disposed() {
            f.write_str(" [disposed]")?;
        }
        Ok(())
    }
}

/// Colors the display supplies when a control has no override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemColor {
    Black,
    White,
}

/// A shared cursor shape.
#[derive(Clone)]
pub struct Cursor {
    icon: CursorIcon,
    disposed: Rc<Cell<bool>>,
}

impl Cursor {
    /// Create a cursor showing `icon`.
    pub fn new(icon: CursorIcon) -> Self {
        Self {
            icon,
            disposed: Rc::new(Cell::new(false)),
        }
    }

    #[inline]
    pub fn icon(&self) -> CursorIcon {
        self.icon
    }

    /// Release the cursor. Every clone observes the disposed state.
    pub fn dispose(&self) {
        self.disposed.set(true);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.icon == other.icon
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("icon", &self.icon)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl From<CursorIcon> for Cursor {
    fn from(icon: CursorIcon) -> Self {
        Self::new(icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposal_is_shared_between_clones() {
        let color = Color::rgb(1, 2, 3);
        let copy = color.clone();
        color.dispose();
        assert!(copy.is_disposed());

        let cursor = Cursor::new(CursorIcon::Text);
        let copy = cursor.clone();
        cursor.dispose();
        assert!(copy.is_disposed());
    }

    #[test]
    fn colors_compare_by_value() {
        assert_eq!(Color::rgb(10, 20, 30), Color::rgb(10, 20, 30));
        assert_ne!(Color::rgb(10, 20, 30), Color::rgb(10, 20, 31));
        assert_eq!(format!("{:?}", Color::rgb(255, 0, 16)), "Color(#ff0010)");
    }
}
