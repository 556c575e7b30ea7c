//! Error types for controlkit.

use thiserror::Error;

/// Failures surfaced synchronously by control operations.
///
/// Every public operation validates its arguments and the liveness of the
/// target before mutating anything, so a returned error means no state was
/// changed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// A required argument (listener, point, rectangle) was absent.
    #[error("argument cannot be null")]
    NullArgument,

    /// The control, or the display that owns it, has been disposed.
    #[error("widget is disposed")]
    WidgetDisposed,

    /// An argument was rejected, typically a disposed color, cursor or menu.
    #[error("argument is not valid")]
    InvalidArgument,

    /// A required parent relationship does not hold, such as a menu from
    /// another shell or a tab list entry that is not a direct child.
    #[error("parent is not valid")]
    InvalidParent,

    /// A menu without the pop-up style was attached as a context menu.
    #[error("menu must be a pop up menu")]
    MenuNotPopup,

    /// The native layer could not provide a handle or drawing context.
    #[error("no more handles")]
    NoHandles,
}

/// Result type for control operations.
pub type Result<T> = std::result::Result<T, ControlError>;
