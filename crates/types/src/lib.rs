//! Shared types for the product registry workspace.

pub mod principal;
pub mod product;

pub use principal::*;
pub use product::*;
