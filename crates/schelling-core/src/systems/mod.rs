//! Simulation Systems
//!
//! The three phases of a tick: opinion update, unhappy relocation, and
//! voluntary relocation.

pub mod happiness;
pub mod movement;
pub mod opinion;

pub use happiness::{block_tally, is_unhappy, relocate_unhappy, UnhappinessRule};
pub use movement::{idle_move_probability, relocate_idle};
pub use opinion::{no_preference_probability, update_opinions, OpinionModel};
