//! Integer geometry in the portable coordinate convention.
//!
//! All values are whole pixels with the origin at the top-left corner and y
//! increasing downward.

use std::ops::{Add, Neg, Sub};

/// A 2D point in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Return this point shifted by `dx`, `dy`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.offset(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.offset(-rhs.x, -rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp both dimensions to be non-negative.
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        Self::new(self.width.max(0), self.height.max(0))
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    /// Create a rectangle from its top-left corner and dimensions.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    /// Create a rectangle from its four edges.
    #[inline]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.origin.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.origin.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Return this rectangle moved by `delta`, keeping its size.
    #[inline]
    pub fn translate(self, delta: Point) -> Self {
        Self {
            origin: self.origin + delta,
            size: self.size,
        }
    }

    /// Whether `point` lies inside the rectangle (right/bottom edges excluded).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}
