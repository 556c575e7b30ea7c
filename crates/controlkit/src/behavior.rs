//! Overridable control behavior.
//!
//! A control's kind is expressed by the [`ControlBehavior`] it is created
//! with rather than by subclassing. The trait's defaults describe a plain,
//! non-focusable leaf; the built-in kinds override only what differs.

use std::fmt;

use crate::control::Control;
use crate::event::Event;

/// Predicates and traversal handlers a control kind may override.
///
/// Traversal handlers are called after a Traverse event was delivered and
/// not vetoed. They return whether the traversal was performed. Every
/// default returns `false`.
pub trait ControlBehavior: fmt::Debug {
    /// Short name for diagnostics.
    fn class_name(&self) -> &'static str {
        "Control"
    }

    /// Whether the control can have children.
    fn is_container(&self) -> bool {
        false
    }

    /// Whether the control is the root container of a window.
    fn is_root(&self) -> bool {
        false
    }

    /// Whether Tab traversal stops at this control.
    fn is_tab_group(&self) -> bool {
        false
    }

    /// Whether arrow traversal stops at this control within its group.
    fn is_tab_item(&self) -> bool {
        false
    }

    /// Whether the control may be moved to another parent.
    fn is_reparentable(&self) -> bool {
        false
    }

    /// Border width in pixels, added on each side by `compute_size`.
    fn border_width(&self) -> i32 {
        0
    }

    fn traverse_escape(&self, _control: &Control) -> bool {
        false
    }

    fn traverse_return(&self, _control: &Control) -> bool {
        false
    }

    /// Move between tab groups.
    fn traverse_group(&self, _control: &Control, _next: bool) -> bool {
        false
    }

    /// Move between items of a tab group.
    fn traverse_item(&self, _control: &Control, _next: bool) -> bool {
        false
    }

    fn traverse_mnemonic(&self, _control: &Control, _event: &Event) -> bool {
        false
    }

    fn traverse_page(&self, _control: &Control, _next: bool) -> bool {
        false
    }
}

/// A plain leaf control.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainBehavior;

impl ControlBehavior for PlainBehavior {}

/// A leaf that takes part in Tab traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusableBehavior;

impl ControlBehavior for FocusableBehavior {
    fn class_name(&self) -> &'static str {
        "Focusable"
    }

    fn is_tab_group(&self) -> bool {
        true
    }
}

/// A container of other controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeBehavior;

impl ControlBehavior for CompositeBehavior {
    fn class_name(&self) -> &'static str {
        "Composite"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn is_tab_group(&self) -> bool {
        true
    }
}

/// The root container of a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellBehavior;

impl ControlBehavior for ShellBehavior {
    fn class_name(&self) -> &'static str {
        "Shell"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn is_root(&self) -> bool {
        true
    }

    fn is_tab_group(&self) -> bool {
        true
    }
}
