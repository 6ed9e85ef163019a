//! # Domain Layer
//!
//! Core types of the gate workflow: steps, outcomes, errors, render model.

pub mod directory;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;
pub mod view;

pub use directory::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
pub use view::*;
