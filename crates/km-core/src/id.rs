use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! registry_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

registry_id!(
    /// Identifier of a house. Never reused within one world.
    HouseId,
    "house"
);
registry_id!(
    /// Identifier of a knight. Never reused within one world.
    KnightId,
    "knight"
);
registry_id!(
    /// Identifier of a war. Never reused within one world.
    WarId,
    "war"
);
