//! Keyboard modifier bitset and level-to-edge conversion.
//!
//! Native layers report modifier keys as a level: the set of modifiers held
//! right now. Listeners expect discrete key-down/key-up events, so the
//! toolkit keeps the last observed level at application scope and turns
//! each change into edges with [`ModifierEdge::between`].

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CONTROL = 1 << 1;
        /// Command (the platform "super" or meta key).
        const COMMAND = 1 << 2;
        /// Option (alt).
        const OPTION = 1 << 3;
    }
}

/// One of the independently tracked modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierRole {
    Shift,
    Control,
    Command,
    Option,
}

impl ModifierRole {
    /// Roles in the order their transitions are reported.
    pub const ORDER: [Self; 4] = [Self::Shift, Self::Control, Self::Command, Self::Option];

    /// The bit this role occupies in [`Modifiers`].
    pub const fn flag(self) -> Modifiers {
        match self {
            Self::Shift => Modifiers::SHIFT,
            Self::Control => Modifiers::CONTROL,
            Self::Command => Modifiers::COMMAND,
            Self::Option => Modifiers::OPTION,
        }
    }
}

/// A single modifier transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierEdge {
    /// The modifier that changed.
    pub role: ModifierRole,
    /// `true` for 0 → 1 (key down), `false` for 1 → 0 (key up).
    pub pressed: bool,
}

impl ModifierEdge {
    /// Every transition from `previous` to `current`, in [`ModifierRole::ORDER`].
    ///
    /// Unchanged roles produce nothing.
    pub fn between(previous: Modifiers, current: Modifiers) -> impl Iterator<Item = Self> {
        ModifierRole::ORDER.into_iter().filter_map(move |role| {
            let flag = role.flag();
            match (previous.contains(flag), current.contains(flag)) {
                (false, true) => Some(Self { role, pressed: true }),
                (true, false) => Some(Self {
                    role,
                    pressed: false,
                }),
                _ => None,
            }
        })
    }
}

#[cfg(feature = "winit")]
impl From<winit::keyboard::ModifiersState> for Modifiers {
    fn from(state: winit::keyboard::ModifiersState) -> Self {
        let mut modifiers = Self::empty();
        modifiers.set(Self::SHIFT, state.shift_key());
        modifiers.set(Self::CONTROL, state.control_key());
        modifiers.set(Self::COMMAND, state.super_key());
        modifiers.set(Self::OPTION, state.alt_key());
        modifiers
    }
}
