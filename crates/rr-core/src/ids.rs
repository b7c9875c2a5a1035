//! Strongly typed, zero-cost identifier wrappers.
//!
//! Network ids arrive from the outside world as opaque strings (`"J12"`,
//! `"-E7"`).  The topology interns them once at build time and hands out
//! dense integer ids, so every hot loop indexes plain `Vec`s via
//! `id.index()` instead of hashing strings.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A vehicle known to the simulator.
    pub struct AgentId(u32);
}

typed_id! {
    /// Interned intersection or terminus.
    pub struct NodeId(u32);
}

typed_id! {
    /// Interned road segment, the unit routes are expressed in.
    pub struct SegmentId(u32);
}

typed_id! {
    /// Position of a directed edge in the CSR adjacency.
    ///
    /// Distinct from [`SegmentId`]: when the input carries parallel segments
    /// between the same node pair only one of them becomes an edge.
    pub struct EdgeId(u32);
}
