//! Value objects - Immutable objects defined by their attributes

mod dice;
mod ids;
pub mod initiative;

pub use dice::{DiceNotation, DiceRoll};
pub use ids::*;
pub use initiative::InitiativeSlot;
