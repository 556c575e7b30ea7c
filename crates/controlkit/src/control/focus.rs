//! Keyboard focus, tab order and traversal.
//!
//! Tab traversal moves between *tab groups*; arrow traversal moves between
//! *tab items* inside a group. A control's kind decides membership through
//! its [`ControlBehavior`](crate::behavior::ControlBehavior), and the root
//! container of a window is always a group.
//!
//! Traversal itself is a two-step protocol: a vetoable Traverse event is
//! delivered first, and only if no listener cleared `doit` (and the control
//! survived) is the behavior's handler for the intent consulted.

use controlkit_core::logging::{span_names, targets};
use controlkit_core::{ControlError, Result};

use super::{Control, ControlId, Delivery};
use crate::event::{Event, EventType, TraversalIntent};

impl Control {
    // =========================================================================
    // Focus
    // =========================================================================

    /// Ask the native layer for keyboard focus. Returns whether it accepted.
    pub fn force_focus(&self) -> Result<bool> {
        let handle = self.handle()?;
        let accepted = self.display.platform().set_keyboard_focus(handle);
        tracing::trace!(target: targets::FOCUS, id = ?self.id, accepted, "focus requested");
        Ok(accepted)
    }

    /// Ask for keyboard focus. Returns whether the native layer accepted.
    pub fn set_focus(&self) -> Result<bool> {
        self.force_focus()
    }

    /// Whether this control currently has keyboard focus.
    pub fn is_focus_control(&self) -> Result<bool> {
        self.check_widget()?;
        Ok(self.display.focus_control().as_ref() == Some(self))
    }

    pub fn is_tab_group(&self) -> Result<bool> {
        let behavior = self.behavior()?;
        Ok(behavior.is_tab_group() || behavior.is_root())
    }

    pub fn is_tab_item(&self) -> Result<bool> {
        Ok(self.behavior()?.is_tab_item())
    }

    // =========================================================================
    // Tab order
    // =========================================================================

    /// The nearest tab group at or above this control.
    pub fn compute_tab_group(&self) -> Result<Control> {
        if self.is_tab_group()? {
            return Ok(self.clone());
        }
        match self.parent()? {
            Some(parent) => parent.compute_tab_group(),
            None => Ok(self.clone()),
        }
    }

    /// Focusable controls at and below this one, in traversal order.
    ///
    /// Empty when the control is hidden or disabled. A container contributes
    /// itself (if a tab group) followed by the tab list of each child in its
    /// explicit tab order, or in child order when none was set.
    pub fn compute_tab_list(&self) -> Result<Vec<Control>> {
        if !self.get_visible()? || !self.get_enabled()? {
            return Ok(Vec::new());
        }
        let mut list = Vec::new();
        if self.is_tab_group()? {
            list.push(self.clone());
        }
        if self.behavior()?.is_container() {
            for child in self.tab_children()? {
                list.extend(child.compute_tab_list()?);
            }
        }
        Ok(list)
    }

    /// The control that scopes this one's tab order.
    ///
    /// A root is its own scope. A tab group left out of its parent's
    /// explicit tab list also starts a scope; everything else inherits the
    /// parent's.
    pub fn compute_tab_root(&self) -> Result<Control> {
        if self.behavior()?.is_root() {
            return Ok(self.clone());
        }
        let Some(parent) = self.parent()? else {
            return Ok(self.clone());
        };
        let listed = parent.read(|data| {
            data.tab_list
                .as_ref()
                .map(|tab_list| tab_list.contains(&self.id))
        })?;
        if listed == Some(false) && self.is_tab_group()? {
            return Ok(self.clone());
        }
        parent.compute_tab_root()
    }

    /// Set or clear the explicit tab order of a container.
    ///
    /// Every entry must be a live direct child: a disposed entry is an
    /// `InvalidArgument` error and any other control an `InvalidParent`
    /// error. Only containers have a tab order.
    pub fn set_tab_list(&self, tab_list: Option<&[Control]>) -> Result<()> {
        if !self.behavior()?.is_container() {
            return Err(ControlError::InvalidArgument);
        }
        let ids = match tab_list {
            Some(controls) => {
                let mut ids = Vec::with_capacity(controls.len());
                for control in controls {
                    if control.is_disposed() {
                        return Err(ControlError::InvalidArgument);
                    }
                    if control.parent()?.as_ref() != Some(self) {
                        return Err(ControlError::InvalidParent);
                    }
                    ids.push(control.id);
                }
                Some(ids)
            }
            None => None,
        };
        self.write(|data| data.tab_list = ids)
    }

    /// The tab order of a container: the explicit list if one was set,
    /// otherwise every child.
    pub fn get_tab_list(&self) -> Result<Vec<Control>> {
        self.tab_children()
    }

    fn tab_children(&self) -> Result<Vec<Control>> {
        let ids: Vec<ControlId> =
            self.read(|data| data.tab_list.clone().unwrap_or_else(|| data.children.clone()))?;
        Ok(ids
            .into_iter()
            .map(|id| self.wrap(id))
            .filter(|control| !control.is_disposed())
            .collect())
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Perform `intent` from this control.
    ///
    /// The control must hold focus or obtain it first; otherwise nothing
    /// happens and `false` is returned.
    pub fn traverse(&self, intent: TraversalIntent) -> Result<bool> {
        if !self.is_focus_control()? && !self.set_focus()? {
            return Ok(false);
        }
        let mut event = Event::new(EventType::Traverse);
        event.detail = intent;
        Ok(self.traverse_event(&mut event))
    }

    /// Deliver a Traverse event, then run the behavior handler for its
    /// `detail` unless a listener vetoed it or disposed the control.
    pub(crate) fn traverse_event(&self, event: &mut Event) -> bool {
        let span = tracing::trace_span!(
            target: targets::FOCUS,
            span_names::TRAVERSE,
            id = ?self.id,
            intent = ?event.detail,
        );
        let _enter = span.enter();

        event.doit = true;
        match self.send_event(EventType::Traverse, event) {
            Delivery::Disposed => return false,
            Delivery::Vetoed => {
                tracing::trace!(target: targets::FOCUS, "traversal vetoed");
                return false;
            }
            Delivery::Continue => {}
        }

        let Ok(behavior) = self.behavior() else {
            return false;
        };
        // Listeners may redirect the traversal by rewriting `detail`.
        let performed = match event.detail {
            TraversalIntent::None => true,
            TraversalIntent::Escape => behavior.traverse_escape(self),
            TraversalIntent::Return => behavior.traverse_return(self),
            TraversalIntent::TabNext => behavior.traverse_group(self, true),
            TraversalIntent::TabPrevious => behavior.traverse_group(self, false),
            TraversalIntent::ArrowNext => behavior.traverse_item(self, true),
            TraversalIntent::ArrowPrevious => behavior.traverse_item(self, false),
            TraversalIntent::Mnemonic => behavior.traverse_mnemonic(self, event),
            TraversalIntent::PageNext => behavior.traverse_page(self, true),
            TraversalIntent::PagePrevious => behavior.traverse_page(self, false),
        };
        tracing::trace!(
            target: targets::FOCUS,
            performed,
            intent = ?event.detail,
            "traversal handled"
        );
        performed
    }
}
