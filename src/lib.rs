#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # Downhill
//!
//! A pure Rust implementation of the [Nelder-Mead downhill
//! simplex](https://en.wikipedia.org/wiki/Nelder%E2%80%93Mead_method) method
//! for unconstrained minimization of real functions of several variables.
//!
//! The method needs only function values, no derivatives. It is robust and
//! simple, which makes it a good choice for low-dimensional problems with
//! noisy, non-smooth or expensive-to-differentiate objectives. It is not
//! efficient in high dimensions.
//!
//! ## Problem
//!
//! Given a function `f: R^n -> R`, find a point `x` where `f(x)` is (locally)
//! minimal:
//!
//! ```text
//! min f(x),
//!
//! where x = { x1, ..., xn }
//! ```
//!
//! When it comes to code, the function is any type that implements the
//! [`Function`] and [`Problem`] traits.
//!
//! ```rust
//! // Downhill is based on `nalgebra` crate.
//! use downhill::nalgebra as na;
//! use downhill::{Function, Problem};
//! use na::{Dyn, IsContiguous};
//!
//! // A function is represented by a type.
//! struct Rosenbrock {
//!     a: f64,
//!     b: f64,
//! }
//!
//! impl Problem for Rosenbrock {
//!     // The numeric type. Usually f64 or f32.
//!     type Field = f64;
//! }
//!
//! impl Function for Rosenbrock {
//!     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
//!     where
//!         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
//!     {
//!         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
//!     }
//! }
//! ```
//!
//! For quick experiments, a closure can be wrapped by [`from_fn`].
//!
//! ## Minimizing
//!
//! The simplest way is to call [`NelderMead::minimize_from_point`], which
//! builds the initial simplex around the starting point and runs the method
//! until convergence.
//!
//! ```rust
//! use downhill::{from_fn, NelderMead, NelderMeadOptions};
//!
//! let f = from_fn(|x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
//!
//! let mut options = NelderMeadOptions::default();
//! options.set_function_tolerance(1e-10);
//!
//! let minimum = NelderMead::with_options(&f, options)
//!     .minimize_from_point(&f, &[0.0, 0.0], 1.0)
//!     .expect("minimization failed");
//!
//! println!(
//!     "x = {:?}\tf(x) = {}\tevaluations = {}",
//!     minimum.x(),
//!     minimum.value(),
//!     minimum.evaluations()
//! );
//! ```
//!
//! If you need to observe the process or stop it early, use the
//! [`OptimizerDriver`].
//!
//! ```rust
//! use downhill::{from_fn, OptimizerDriver};
//!
//! let f = from_fn(|x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0].powi(2)).powi(2));
//!
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial(vec![-1.2, 1.0])
//!     .with_delta(0.5)
//!     .build()
//!     .expect("invalid input");
//!
//! let (x, fx) = optimizer
//!     .find(|state| {
//!         println!("iter = {}\tf(x) = {}\tx = {:?}", state.iter(), state.fx(), state.x());
//!         state.iter() >= 1000
//!     })
//!     .expect("optimizer encountered an error");
//!
//! println!("x = {:?}\tf(x) = {}", x, fx);
//! ```
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
mod core;
pub mod driver;
pub mod simplex;

pub use algo::nelder_mead::{
    Minimum, NelderMead, NelderMeadError, NelderMeadOptions, Step, Transformation,
};
pub use core::*;
pub use driver::OptimizerDriver;
pub use simplex::{InvalidInput, Simplex};

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
