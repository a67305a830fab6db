//! License data: raw input, validation and normalization.
mod input;
pub use input::*;

pub mod values;

mod validation;
pub use validation::*;

mod identifier;
pub use identifier::*;

mod normalization;
pub use normalization::*;
