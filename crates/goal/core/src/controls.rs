//! Exclusive control channels claimed by goals.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Parts of an actor a goal needs exclusive use of while active.
    ///
    /// The default compatibility predicate treats two goals as compatible
    /// iff their control sets are disjoint. A goal that claims nothing runs
    /// alongside anything.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Controls: u8 {
        const MOVE   = 1 << 0;
        const LOOK   = 1 << 1;
        const JUMP   = 1 << 2;
        const TARGET = 1 << 3;
    }
}

impl Controls {
    /// Returns true if both sets claim at least one common channel.
    #[inline]
    pub fn conflicts_with(self, other: Controls) -> bool {
        self.intersects(other)
    }
}

/// Writes the flags text form, e.g. `MOVE | LOOK`; empty sets write nothing.
impl fmt::Display for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

// Written as the flags text (`"MOVE | LOOK"`) in human-readable formats
// rather than as a newtype around it.
#[cfg(feature = "serde")]
impl serde::Serialize for Controls {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bitflags::serde::serialize(self, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Controls {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bitflags::serde::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_sets_do_not_conflict() {
        assert!(!Controls::MOVE.conflicts_with(Controls::LOOK));
        assert!(!Controls::empty().conflicts_with(Controls::all()));
    }

    #[test]
    fn overlapping_sets_conflict() {
        let walk_and_look = Controls::MOVE | Controls::LOOK;
        assert!(walk_and_look.conflicts_with(Controls::LOOK | Controls::JUMP));
    }

    #[test]
    fn display_uses_flag_names() {
        assert_eq!((Controls::MOVE | Controls::LOOK).to_string(), "MOVE | LOOK");
        assert_eq!(Controls::empty().to_string(), "");
    }
}
