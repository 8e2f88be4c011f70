//! Shared primitive types used across the entire simulation.
//!
//! RULE: Resources, buttons and flags are referred to by handle only.
//! A handle is issued by the registry that owns the entity and is just
//! an index into that registry's table. Handle equality is identity:
//! two resources with the same amount and delta are still different
//! resources if their handles differ.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A simulation tick. The atomic unit of simulated time.
pub type Tick = u64;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            /// Raw handle value, for use as a stable UI key.
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// Handle to a resource defined in a `ResourceRegistry`.
    ResourceId,
    "resource"
);
handle!(
    /// Handle to a button defined in a `ButtonRegistry`.
    ButtonId,
    "button"
);
handle!(
    /// Untyped handle to a flag defined in a `FlagStore`.
    FlagId,
    "flag"
);
