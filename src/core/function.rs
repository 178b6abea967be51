use std::marker::PhantomData;

use nalgebra::{storage::Storage, Dyn, IsContiguous, RealField, Vector};

use super::base::Problem;

/// Definition of an objective function.
///
/// ## Defining a function
///
/// A function is any type that implements [`Function`] and [`Problem`] traits.
///
/// ```rust
/// use downhill::nalgebra as na;
/// use downhill::{Function, Problem};
/// use na::{Dyn, IsContiguous};
///
/// struct Rosenbrock {
///     a: f64,
///     b: f64,
/// }
///
/// impl Problem for Rosenbrock {
///     type Field = f64;
/// }
///
/// impl Function for Rosenbrock {
///     fn apply<Sx>(&self, x: &na::Vector<Self::Field, Dyn, Sx>) -> Self::Field
///     where
///         Sx: na::storage::Storage<Self::Field, Dyn> + IsContiguous,
///     {
///         // Compute the function value.
///         (self.a - x[0]).powi(2) + self.b * (x[1] - x[0].powi(2)).powi(2)
///     }
/// }
/// ```
///
/// The minimizer assumes that the function is deterministic, that is, the
/// same point always yields the same value.
pub trait Function: Problem {
    /// Calculates the function value in given point.
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous;
}

/// A [`Function`] backed by a closure over the slice of variables.
///
/// Created by [`from_fn`].
pub struct FnFunction<T, C> {
    f: C,
    _field: PhantomData<fn() -> T>,
}

/// Wraps a closure into a [`Function`].
///
/// ```rust
/// use downhill::{from_fn, NelderMead};
///
/// let f = from_fn(|x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2));
/// let minimum = NelderMead::new(&f)
///     .minimize_from_point(&f, &[0.0, 0.0], 1.0)
///     .expect("minimization failed");
///
/// assert!((minimum.x()[0] - 3.0).abs() < 1e-6);
/// assert!((minimum.x()[1] + 1.0).abs() < 1e-6);
/// ```
pub fn from_fn<T, C>(f: C) -> FnFunction<T, C>
where
    T: RealField + Copy,
    C: Fn(&[T]) -> T,
{
    FnFunction {
        f,
        _field: PhantomData,
    }
}

impl<T, C> Problem for FnFunction<T, C>
where
    T: RealField + Copy,
    C: Fn(&[T]) -> T,
{
    type Field = T;
}

impl<T, C> Function for FnFunction<T, C>
where
    T: RealField + Copy,
    C: Fn(&[T]) -> T,
{
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn> + IsContiguous,
    {
        (self.f)(x.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dvector;

    use super::*;

    #[test]
    fn closure_receives_all_variables() {
        let f = from_fn(|x: &[f64]| x.iter().sum());
        assert_eq!(f.apply(&dvector![1.0, 2.0, 3.5]), 6.5);
    }

    #[test]
    fn closure_in_single_precision() {
        let f = from_fn(|x: &[f32]| x[0] * x[1]);
        assert_eq!(f.apply(&dvector![2.0f32, -4.0]), -8.0);
    }
}
