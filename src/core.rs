//! Core abstractions and types for downhill.
//!
//! *Users* are mainly interested in implementing the [`Function`] trait, or
//! in wrapping a plain closure with [`from_fn`].

mod base;
mod function;

pub use base::*;
pub use function::*;
