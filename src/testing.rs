//! Testing functions and utilities useful for benchmarking, debugging and
//! smoke testing.
//!
//! [`Sphere`] and [`ExtendedRosenbrock`] are recommended for first tests.
//! [`Paraboloid`] has its minimum at an arbitrary point and value, and
//! [`Counting`] wraps any function to count its evaluations.
//!
//! # References
//!
//! \[1\] [A Literature Survey of Benchmark Functions For Global Optimization
//! Problems](https://arxiv.org/abs/1308.4008)
//!
//! \[2\] [Numerical Methods for Unconstrained Optimization and Nonlinear
//! Equations](https://epubs.siam.org/doi/book/10.1137/1.9781611971200)

#![allow(unused)]

use std::cell::Cell;

use approx::AbsDiffEq;
use nalgebra::{storage::Storage, DVector, Dyn, IsContiguous, OVector, Vector};

use crate::core::{Function, Problem};

/// Extension of the [`Problem`] trait that provides additional information
/// that is useful for testing.
pub trait TestProblem: Problem {
    /// Standard initial values for the problem. Using the same initial values is
    /// essential for fair comparison of methods.
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>>;
}

/// Extension of the [`Function`] trait that provides additional information
/// that is useful for testing minimizers.
pub trait TestFunction: Function + TestProblem
where
    Self::Field: AbsDiffEq<Epsilon = Self::Field>,
{
    /// A set of global optima (if known and finite).
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>>;

    /// Test if given point is a global optimum, that is, all its coordinates
    /// are within the tolerance `eps` of one of the known optima.
    fn is_optimum(&self, x: &[Self::Field], eps: Self::Field) -> bool {
        self.optima().iter().any(|optimum| {
            optimum.len() == x.len()
                && optimum
                    .iter()
                    .zip(x.iter())
                    .all(|(oi, xi)| oi.abs_diff_eq(xi, eps))
        })
    }
}

/// [Extended Rosenbrock
/// function](https://en.wikipedia.org/wiki/Rosenbrock_function) \[1,2\] (also
/// known as Rosenbrock's valley or banana function).
///
/// The global minimum is inside a long, narrow, parabolic shaped flat valley.
/// The challenge is to find the minimum inside the valley.
#[derive(Debug, Clone, Copy)]
pub struct ExtendedRosenbrock {
    n: usize,
    alpha: f64,
}

impl ExtendedRosenbrock {
    /// Initializes the function with given dimension.
    ///
    /// The dimension **must** be a multiple of 2.
    pub fn new(n: usize) -> Self {
        Self::with_scaling(n, 1.0)
    }

    /// Initializes the function with given dimension and scaling factor.
    ///
    /// The dimension **must** be a multiple of 2. The higher the scaling
    /// factor is, the more difficult the problem is.
    pub fn with_scaling(n: usize, alpha: f64) -> Self {
        assert!(n > 0, "n must be greater than zero");
        assert!(n % 2 == 0, "n must be a multiple of 2");
        assert!(alpha > 0.0, "alpha must be greater than zero");
        Self { n, alpha }
    }
}

impl Default for ExtendedRosenbrock {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Problem for ExtendedRosenbrock {
    type Field = f64;
}

impl Function for ExtendedRosenbrock {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        let alpha = self.alpha;

        (0..(self.n / 2))
            .map(|i| {
                let x1 = x[2 * i] * alpha;
                let x2 = x[2 * i + 1] / alpha;

                let fx1 = 10.0 * (x2 - x1 * x1);
                let fx2 = 1.0 - x1;

                fx1 * fx1 + fx2 * fx2
            })
            .sum()
    }
}

impl TestProblem for ExtendedRosenbrock {
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>> {
        let init1 = DVector::from_iterator(
            self.n,
            (0..self.n).map(|i| if i % 2 == 0 { -1.2 } else { 1.0 }),
        );

        let init2 = DVector::from_iterator(
            self.n,
            (0..self.n).map(|i| if i % 2 == 0 { 6.39 } else { -0.221 }),
        );

        vec![init1, init2]
    }
}

impl TestFunction for ExtendedRosenbrock {
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        let optimum = DVector::from_iterator(
            self.n,
            (0..self.n).map(|i| {
                if i % 2 == 0 {
                    1.0 / self.alpha
                } else {
                    self.alpha
                }
            }),
        );

        vec![optimum]
    }
}

/// [Sphere
/// function](https://en.wikipedia.org/wiki/Test_functions_for_optimization)
/// \[1\].
///
/// This is a simple paraboloid which can be used in early development and
/// sanity checking as it can be considered a trivial problem.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    n: usize,
}

impl Sphere {
    /// Initializes the function with given dimension.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be greater than zero");
        Self { n }
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Problem for Sphere {
    type Field = f64;
}

impl Function for Sphere {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        x.iter().map(|xi| xi * xi).sum()
    }
}

impl TestProblem for Sphere {
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>> {
        let init = DVector::from_iterator(
            self.n,
            (0..self.n).map(|i| if i % 2 == 0 { 10.0 } else { -10.0 }),
        );

        vec![init]
    }
}

impl TestFunction for Sphere {
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![DVector::zeros(self.n)]
    }
}

/// Paraboloid with minimum `offset` in `center`, that is, the sum of
/// `(x[i] - center[i])^2` plus `offset`.
#[derive(Debug, Clone)]
pub struct Paraboloid {
    center: Vec<f64>,
    offset: f64,
}

impl Paraboloid {
    /// Initializes the function with the minimum value zero.
    pub fn new(center: Vec<f64>) -> Self {
        Self::with_offset(center, 0.0)
    }

    /// Initializes the function with given minimum value.
    pub fn with_offset(center: Vec<f64>, offset: f64) -> Self {
        assert!(!center.is_empty(), "center must not be empty");
        Self { center, offset }
    }
}

impl Problem for Paraboloid {
    type Field = f64;
}

impl Function for Paraboloid {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        x.iter()
            .zip(self.center.iter())
            .map(|(xi, ci)| (xi - ci).powi(2))
            .sum::<f64>()
            + self.offset
    }
}

impl TestProblem for Paraboloid {
    fn initials(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![DVector::zeros(self.center.len())]
    }
}

impl TestFunction for Paraboloid {
    fn optima(&self) -> Vec<OVector<Self::Field, Dyn>> {
        vec![DVector::from_column_slice(&self.center)]
    }
}

/// Wrapper counting the evaluations of the inner function.
#[derive(Debug)]
pub struct Counting<F> {
    f: F,
    calls: Cell<usize>,
}

impl<F> Counting<F> {
    /// Wraps the function.
    pub fn new(f: F) -> Self {
        Self {
            f,
            calls: Cell::new(0),
        }
    }

    /// Number of evaluations so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Unwraps the inner function.
    pub fn into_inner(self) -> F {
        self.f
    }
}

impl<F: Problem> Problem for Counting<F> {
    type Field = F::Field;
}

impl<F: Function> Function for Counting<F> {
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        self.calls.set(self.calls.get() + 1);
        self.f.apply(x)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dvector;

    use super::*;

    #[test]
    fn optima_have_minimal_value() {
        let rosenbrock = ExtendedRosenbrock::with_scaling(4, 2.0);
        for x in rosenbrock.optima() {
            assert_eq!(rosenbrock.apply(&x), 0.0);
        }

        let sphere = Sphere::new(3);
        for x in sphere.optima() {
            assert_eq!(sphere.apply(&x), 0.0);
        }

        let paraboloid = Paraboloid::with_offset(vec![1.0, -2.0], 3.0);
        for x in paraboloid.optima() {
            assert_eq!(paraboloid.apply(&x), 3.0);
        }
    }

    #[test]
    fn is_optimum_tolerance() {
        let f = Paraboloid::new(vec![3.0, -1.0]);

        assert!(f.is_optimum(&[3.0, -1.0], 0.0));
        assert!(f.is_optimum(&[3.0005, -1.0005], 1e-3));
        assert!(!f.is_optimum(&[3.01, -1.0], 1e-3));
        assert!(!f.is_optimum(&[3.0], 1e-3));
    }

    #[test]
    fn counting_calls() {
        let f = Counting::new(Sphere::new(2));

        assert_eq!(f.calls(), 0);
        assert_eq!(f.apply(&dvector![1.0, 2.0]), 5.0);
        assert_eq!(f.apply(&dvector![0.0, 0.0]), 0.0);
        assert_eq!(f.calls(), 2);
    }
}
