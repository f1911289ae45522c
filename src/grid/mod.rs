//! Layout state machine
//!
//! Every change to the editor grid goes through [`reduce`], a pure function
//! from `(state, action)` to the next state.

pub mod action;
pub mod invariants;
pub mod reducer;
pub mod sizes;
pub mod state;

pub use action::{GridAction, Placement, SplitSeed};
pub use invariants::{Violation, check};
pub use reducer::reduce;
pub use sizes::{SIZE_EPSILON, enforce_minimum_sizes, ratio_sizes, sizes_valid};
pub use state::{EditorGridState, FocusMode, GridSettings};
