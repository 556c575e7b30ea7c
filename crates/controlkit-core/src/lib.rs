//! Core types for controlkit.
//!
//! This crate holds the pieces of the control layer that do not depend on the
//! control tree itself:
//!
//! - **Handles**: [`NativeHandle`] and the [`HandleTable`] that maps native
//!   handles back to their owning control
//! - **Geometry**: integer [`Point`], [`Size`] and [`Rect`] in the portable
//!   top-left, y-down convention
//! - **Modifiers**: the [`Modifiers`] bitset and [`ModifierEdge`], which turns
//!   a change in held modifiers into discrete key transitions
//! - **Errors**: [`ControlError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` target names in [`logging`]
//!
//! # Example
//!
//! ```
//! use controlkit_core::{ModifierEdge, ModifierRole, Modifiers};
//!
//! let previous = Modifiers::SHIFT;
//! let current = Modifiers::CONTROL;
//! let edges: Vec<_> = ModifierEdge::between(previous, current).collect();
//!
//! assert_eq!(edges.len(), 2);
//! assert_eq!(edges[0].role, ModifierRole::Shift);
//! assert!(!edges[0].pressed);
//! assert_eq!(edges[1].role, ModifierRole::Control);
//! assert!(edges[1].pressed);
//! ```

mod error;
pub mod geometry;
pub mod handle;
pub mod logging;
pub mod modifiers;

pub use error::{ControlError, Result};
pub use geometry::{Point, Rect, Size};
pub use handle::{HandleTable, NativeHandle};
pub use modifiers::{ModifierEdge, ModifierRole, Modifiers};
