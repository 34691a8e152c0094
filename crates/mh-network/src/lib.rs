//! `mh-network` — the fixed-topology social graph over agents.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`network`]   | `SocialNetwork` (CSR adjacency), `SocialNetworkBuilder`     |
//! | [`generator`] | `NetworkGenerator` trait, `HomophilyGenerator`, `generate`  |
//! | [`error`]     | `NetworkError`, `NetworkResult<T>`                          |
//!
//! Peer and family ties are local: they are laid out on a small-world ring
//! ordered by settlement and ethnicity, so they cluster within groups.
//! Digital ties are overlaid independently of those groupings with endpoints
//! drawn in proportion to social-media usage, which lets them bridge
//! settlements.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash sets for edge de-duplication.                       |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |

pub mod error;
pub mod generator;
pub mod network;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use generator::{HomophilyGenerator, NetworkGenerator, NodeAttributes, generate};
pub use network::{Edge, Neighbor, RelationKind, SocialNetwork, SocialNetworkBuilder};
