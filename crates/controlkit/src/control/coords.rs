//! Bounds and point translation.
//!
//! Native bounds are relative to the window's root view, while the public
//! API reports bounds relative to the parent control. The conversion is a
//! single-level adjustment: a control whose native parent is not the root
//! is offset by its native parent's root-relative origin, and nothing
//! further up the chain is consulted.

use controlkit_core::{NativeHandle, Point, Rect, Result, Size};

use super::Control;
use crate::native::NativePlatform;

/// Root-relative native bounds to parent-relative bounds.
pub(crate) fn rect_to_parent(
    platform: &dyn NativePlatform,
    handle: NativeHandle,
    rect: Rect,
) -> Rect {
    match parent_offset(platform, handle) {
        Some(origin) => rect.translate(-origin),
        None => rect,
    }
}

/// Parent-relative bounds to root-relative native bounds.
pub(crate) fn rect_to_root(
    platform: &dyn NativePlatform,
    handle: NativeHandle,
    rect: Rect,
) -> Rect {
    match parent_offset(platform, handle) {
        Some(origin) => rect.translate(origin),
        None => rect,
    }
}

/// Origin of the native parent, unless the parent is the root view (which
/// sits at the origin) or there is no parent.
fn parent_offset(platform: &dyn NativePlatform, handle: NativeHandle) -> Option<Point> {
    let parent = platform.super_control(handle)?;
    if Some(parent) == platform.root_control(handle) {
        return None;
    }
    Some(platform.control_bounds(parent).origin)
}

impl Control {
    /// Bounds relative to the parent.
    pub fn get_bounds(&self) -> Result<Rect> {
        let handle = self.handle()?;
        let platform = self.display.platform();
        Ok(rect_to_parent(platform, handle, platform.control_bounds(handle)))
    }

    pub fn get_location(&self) -> Result<Point> {
        Ok(self.get_bounds()?.origin)
    }

    pub fn get_size(&self) -> Result<Size> {
        Ok(self.get_bounds()?.size)
    }

    /// Move and resize the control, in parent coordinates.
    ///
    /// Negative sizes are clamped to zero. The native view is hidden while
    /// it moves and shown again afterwards only if the control itself is
    /// visible.
    pub fn set_bounds(&self, bounds: Rect) -> Result<()> {
        let handle = self.handle()?;
        let visible = self.get_visible()?;
        let platform = self.display.platform();
        let bounds = Rect {
            origin: bounds.origin,
            size: bounds.size.clamp_non_negative(),
        };
        platform.set_visible(handle, false);
        platform.set_control_bounds(handle, rect_to_root(platform, handle, bounds));
        if visible {
            platform.set_visible(handle, true);
        }
        Ok(())
    }

    /// Move the control, keeping its size.
    pub fn set_location(&self, location: Point) -> Result<()> {
        let handle = self.handle()?;
        let platform = self.display.platform();
        let size = platform.control_bounds(handle).size;
        let target = rect_to_root(platform, handle, Rect { origin: location, size });
        platform.set_control_bounds(handle, target);
        Ok(())
    }

    /// Resize the control, keeping its location. Negative sizes are clamped.
    pub fn set_size(&self, size: Size) -> Result<()> {
        let handle = self.handle()?;
        let platform = self.display.platform();
        let origin = platform.control_bounds(handle).origin;
        platform.set_control_bounds(
            handle,
            Rect {
                origin,
                size: size.clamp_non_negative(),
            },
        );
        Ok(())
    }

    /// Convert a screen point to control-local coordinates.
    pub fn to_control(&self, point: Point) -> Result<Point> {
        let handle = self.handle()?;
        let platform = self.display.platform();
        let window = platform.window_bounds(handle);
        let bounds = platform.control_bounds(handle);
        Ok(point - window.origin - bounds.origin)
    }

    /// Convert a control-local point to screen coordinates.
    pub fn to_display(&self, point: Point) -> Result<Point> {
        let handle = self.handle()?;
        let platform = self.display.platform();
        let bounds = platform.control_bounds(handle);
        let window = platform.window_bounds(handle);
        Ok(point + bounds.origin + window.origin)
    }

    pub fn get_border_width(&self) -> Result<i32> {
        Ok(self.behavior()?.border_width())
    }

    /// Preferred size: each hint, or the configured default where absent,
    /// plus the border on both sides.
    pub fn compute_size(
        &self,
        width_hint: Option<i32>,
        height_hint: Option<i32>,
        _changed: bool,
    ) -> Result<Size> {
        let border = self.get_border_width()?;
        let default = self.display.config().default_size;
        let width = width_hint.unwrap_or(default.width) + border * 2;
        let height = height_hint.unwrap_or(default.height) + border * 2;
        Ok(Size::new(width, height))
    }

    /// Resize the control to its preferred size.
    pub fn pack(&self) -> Result<()> {
        self.pack_with(true)
    }

    /// Resize the control to its preferred size, passing `changed` through
    /// to [`compute_size`](Self::compute_size).
    pub fn pack_with(&self, changed: bool) -> Result<()> {
        let size = self.compute_size(None, None, changed)?;
        self.set_size(size)
    }
}
