pub mod cap;
pub mod career;
pub mod contract;
pub mod draft_pick;
pub mod game;
pub mod player;
pub mod standings;
pub mod team;
pub mod trade;

pub use cap::*;
pub use career::*;
pub use contract::*;
pub use draft_pick::*;
pub use game::*;
pub use player::*;
pub use standings::*;
pub use team::*;
pub use trade::*;

/// Opaque dynasty identifier; every persisted row is scoped by it
/// (spec §3). Plain `String` newtype rather than a wrapper struct to
/// match the teacher's habit of using bare primitives for ids (`u32`
/// team/club ids, `String` league slugs) and saving wrapper types for
/// domain objects with actual behavior.
pub type DynastyId = String;
