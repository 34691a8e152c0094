//! Dense integer identifiers for agents and network edges.
//!
//! Both wrap a `u32` that doubles as a position in the owning column store
//! or edge list; use `.index()` when subscripting a `Vec`.

use std::fmt;

macro_rules! dense_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for slots that are filled in later.
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

dense_id! {
    /// Position of an agent in population storage.  Agents are neither
    /// added nor removed during a run, so an id stays valid throughout.
    pub struct AgentId(u32);
}

dense_id! {
    /// Position of an undirected edge in the network's sorted edge list.
    pub struct EdgeId(u32);
}
