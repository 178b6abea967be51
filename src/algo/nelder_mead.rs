//! Nelder-Mead (downhill simplex) minimization method.
//!
//! [Nelder-Mead](https://en.wikipedia.org/wiki/Nelder%E2%80%93Mead_method)
//! simplex method is a popular derivative-free minimization algorithm. It
//! keeps a [simplex](https://en.wikipedia.org/wiki/Simplex) of _n + 1_ points
//! and in each iteration it tries to replace the worst point by reflecting it
//! through the centroid of the other points, possibly expanding or
//! contracting the step. When nothing helps, the whole simplex is shrunk
//! towards the best point.
//!
//! The process terminates when the relative difference between the worst and
//! the best function value in the simplex drops below the function tolerance
//! (see [`NelderMeadOptions`]). When the budget of function evaluations is
//! exhausted before that, the minimization fails.
//!
//! # References
//!
//! \[1\] [A Simplex Method for Function
//! Minimization](https://doi.org/10.1093/comjnl/7.4.308)
//!
//! \[2\] [Numerical
//! Optimization](https://link.springer.com/book/10.1007/978-0-387-40065-5)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{
    convert,
    storage::{Storage, StorageMut},
    ComplexField, Dim, DimName, Dyn, OVector, RealField, Vector, U1,
};
use thiserror::Error;

use crate::core::{Function, Problem};
use crate::simplex::{InvalidInput, Simplex};

const REFLECTION_COEFF: f64 = -1.0;
const EXPANSION_COEFF: f64 = 2.0;
const CONTRACTION_COEFF: f64 = 0.5;
const SHRINK_COEFF: f64 = 0.5;

/// Options for [`NelderMead`] minimizer.
#[derive(Debug, Clone, Copy, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct NelderMeadOptions<T: RealField + Copy> {
    /// Relative difference between the worst and the best value in the
    /// simplex below which the minimization is considered converged.
    /// Default: `1e-8`.
    function_tolerance: T,
    /// Maximum number of function evaluations, including the evaluation of
    /// the initial simplex. Default: `5000`.
    max_evaluations: usize,
    /// Small constant added to the denominator of the relative difference so
    /// that it is defined when both values are zero. Default: `1e-10`.
    epsilon: T,
}

impl<T: RealField + Copy> Default for NelderMeadOptions<T> {
    fn default() -> Self {
        Self {
            function_tolerance: convert(1e-8),
            max_evaluations: 5000,
            epsilon: convert(1e-10),
        }
    }
}

impl<T: RealField + Copy> NelderMeadOptions<T> {
    fn validate(&self) -> Result<(), InvalidInput> {
        if !self.function_tolerance.is_finite() || self.function_tolerance <= T::zero() {
            return Err(InvalidInput::Options {
                reason: "function tolerance must be finite and positive",
            });
        }

        if !self.epsilon.is_finite() || self.epsilon < T::zero() {
            return Err(InvalidInput::Options {
                reason: "epsilon must be finite and non-negative",
            });
        }

        if self.max_evaluations == 0 {
            return Err(InvalidInput::Options {
                reason: "max evaluations must be at least one",
            });
        }

        Ok(())
    }
}

/// Error returned from [`NelderMead`] minimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NelderMeadError {
    /// The initial simplex or the options are malformed. Reported before any
    /// function evaluation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    /// The budget of function evaluations was exhausted before convergence.
    #[error("maximum number of function evaluations exceeded ({evaluations})")]
    MaxIterationsExceeded {
        /// Number of function evaluations performed.
        evaluations: usize,
    },
    /// Initial simplex contains too many invalid values (NaN, infinity).
    #[error("simplex contains too many invalid values")]
    SimplexInvalid,
}

/// Transformation of the simplex performed in an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    /// The worst point was replaced by its reflection.
    Reflection,
    /// The worst point was replaced by the expanded reflection.
    Expansion,
    /// The worst point was contracted towards the centroid.
    Contraction,
    /// All points except the best were shrunk towards the best.
    Shrinkage,
}

impl Transformation {
    /// Returns the name of the transformation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Transformation::Reflection => "reflection",
            Transformation::Expansion => "expansion",
            Transformation::Contraction => "contraction",
            Transformation::Shrinkage => "shrinkage",
        }
    }
}

/// Outcome of a single iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The convergence criterion is satisfied and the best point is at
    /// position 0 of the simplex. No function was evaluated.
    Converged,
    /// The simplex was transformed.
    Transformed(Transformation),
}

impl Step {
    /// Determines whether the minimization converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, Step::Converged)
    }
}

/// Result of a successful minimization.
#[derive(Debug, Clone, CopyGetters)]
pub struct Minimum<T: RealField + Copy> {
    x: OVector<T, Dyn>,
    /// Function value in the minimum.
    #[getset(get_copy = "pub")]
    value: T,
    /// Number of function evaluations performed.
    #[getset(get_copy = "pub")]
    evaluations: usize,
    /// Number of iterations performed (convergence check excluded).
    #[getset(get_copy = "pub")]
    iterations: usize,
    simplex: Simplex<T>,
    values: Vec<T>,
}

impl<T: RealField + Copy> Minimum<T> {
    /// Returns the minimizing point.
    pub fn x(&self) -> &[T] {
        self.x.as_slice()
    }

    /// Returns the terminal simplex. Its vertex 0 is the minimizing point.
    pub fn simplex(&self) -> &Simplex<T> {
        &self.simplex
    }

    /// Returns the function values of the terminal simplex vertices.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Nelder-Mead minimizer.
///
/// The minimizer itself holds only its options. All state of a run is
/// created at its start and owned by that run, so the same minimizer can be
/// used for any number of independent minimizations.
///
/// See [module](self) documentation for more details.
pub struct NelderMead<F: Problem> {
    options: NelderMeadOptions<F::Field>,
}

impl<F: Problem> NelderMead<F> {
    /// Initializes Nelder-Mead minimizer with default options.
    pub fn new(f: &F) -> Self {
        Self::with_options(f, NelderMeadOptions::default())
    }

    /// Initializes Nelder-Mead minimizer with given options.
    pub fn with_options(_: &F, options: NelderMeadOptions<F::Field>) -> Self {
        Self { options }
    }

    /// Returns the options.
    pub fn options(&self) -> &NelderMeadOptions<F::Field> {
        &self.options
    }
}

impl<F: Function> NelderMead<F> {
    /// Minimizes the function starting from given simplex.
    pub fn minimize(
        &self,
        f: &F,
        simplex: Simplex<F::Field>,
    ) -> Result<Minimum<F::Field>, NelderMeadError> {
        let mut state = self.init(f, simplex)?;

        loop {
            if self.next(f, &mut state)?.is_converged() {
                return Ok(state.into_minimum());
            }
        }
    }

    /// Minimizes the function starting from a simplex built around `x0` with
    /// uniform step `delta` (see [`Simplex::from_point`]).
    pub fn minimize_from_point(
        &self,
        f: &F,
        x0: &[F::Field],
        delta: F::Field,
    ) -> Result<Minimum<F::Field>, NelderMeadError> {
        self.minimize(f, Simplex::from_point(x0, delta)?)
    }

    /// Minimizes the function starting from a simplex built around `x0` with
    /// a step for each variable (see [`Simplex::from_point_with_deltas`]).
    pub fn minimize_from_point_with_deltas(
        &self,
        f: &F,
        x0: &[F::Field],
        deltas: &[F::Field],
    ) -> Result<Minimum<F::Field>, NelderMeadError> {
        self.minimize(f, Simplex::from_point_with_deltas(x0, deltas)?)
    }

    /// Validates the options and evaluates the initial simplex.
    pub(crate) fn init(
        &self,
        f: &F,
        simplex: Simplex<F::Field>,
    ) -> Result<State<F::Field>, NelderMeadError> {
        self.options.validate()?;

        let simplex = simplex.into_raw();
        let dim = Dyn(simplex[0].nrows());

        let mut evaluations = Evaluations {
            count: 0,
            max: self.options.max_evaluations,
        };

        let values = simplex
            .iter()
            .map(|xi| evaluations.apply(f, xi))
            .collect::<Result<Vec<_>, _>>()?;

        let invalid = values.iter().filter(|value| !value.is_finite()).count();

        if 2 * invalid >= values.len() {
            // The simplex is too degenerate.
            debug!(
                "{} out of {} points in simplex have invalid value, returning error",
                invalid,
                values.len()
            );
            return Err(NelderMeadError::SimplexInvalid);
        }

        debug!("initial simplex evaluated: fx = {:?}", values);

        Ok(State {
            sums: vertex_sums(&simplex),
            trial: OVector::zeros_generic(dim, U1::name()),
            simplex,
            values,
            evaluations,
            iterations: 0,
        })
    }

    /// Performs one iteration: checks the convergence and, if not converged,
    /// transforms the simplex.
    pub(crate) fn next(
        &self,
        f: &F,
        state: &mut State<F::Field>,
    ) -> Result<Step, NelderMeadError> {
        let Ranking {
            low,
            high,
            next_high,
        } = Ranking::of(&state.values);

        let spread = spread(
            state.values[high],
            state.values[low],
            self.options.epsilon,
        );

        if spread < self.options.function_tolerance {
            state.settle(low);
            debug!(
                "converged after {} evaluations: fx = {}, spread = {}",
                state.evaluations.count, state.values[0], spread
            );
            return Ok(Step::Converged);
        }

        state.iterations += 1;

        let reflection = state.try_vertex(f, high, convert(REFLECTION_COEFF))?;

        let transformation = if reflection <= state.values[low] {
            // Reflected point is the best so far. Try to go farther along
            // this direction.
            let expansion = state.try_vertex(f, high, convert(EXPANSION_COEFF))?;

            if expansion < reflection {
                Transformation::Expansion
            } else {
                Transformation::Reflection
            }
        } else if reflection >= state.values[next_high] {
            // Reflected point would still be the worst. Try a contraction.
            let next_worst = state.values[next_high];
            let contraction = state.try_vertex(f, high, convert(CONTRACTION_COEFF))?;

            if contraction >= next_worst {
                state.shrink(f, low)?;
                Transformation::Shrinkage
            } else {
                Transformation::Contraction
            }
        } else {
            Transformation::Reflection
        };

        debug!(
            "performed {},\tfx = {} - {},\tevaluations = {}",
            transformation.as_str(),
            state.values[low],
            state.values[high],
            state.evaluations.count
        );

        Ok(Step::Transformed(transformation))
    }
}

/// Run context of a single minimization.
pub(crate) struct State<T: RealField + Copy> {
    simplex: Vec<OVector<T, Dyn>>,
    values: Vec<T>,
    // Per-coordinate sums of all vertices.
    sums: OVector<T, Dyn>,
    trial: OVector<T, Dyn>,
    evaluations: Evaluations,
    iterations: usize,
}

impl<T: RealField + Copy> State<T> {
    fn dim(&self) -> usize {
        self.sums.nrows()
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations.count
    }

    pub(crate) fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns the best vertex and its value.
    pub(crate) fn best(&self) -> (&[T], T) {
        let low = Ranking::of(&self.values).low;
        (self.simplex[low].as_slice(), self.values[low])
    }

    /// Computes the trial point on the line through the worst vertex and the
    /// centroid of the others,
    ///
    /// ```text
    /// trial = centroid * (1 - fac) + worst * fac,
    /// ```
    ///
    /// evaluated as `sums * fac1 - worst * fac2`. The worst vertex is
    /// replaced only if the trial point improves it. The trial value is
    /// returned in any case.
    fn try_vertex<F>(&mut self, f: &F, high: usize, fac: T) -> Result<T, NelderMeadError>
    where
        F: Function<Field = T>,
    {
        let n: T = convert(self.dim() as f64);
        let fac1 = (T::one() - fac) / n;
        let fac2 = fac1 - fac;

        let Self {
            simplex,
            values,
            sums,
            trial,
            evaluations,
            ..
        } = self;

        let worst = &mut simplex[high];

        trial
            .iter_mut()
            .zip(sums.iter().zip(worst.iter()))
            .for_each(|(ti, (si, wi))| *ti = *si * fac1 - *wi * fac2);

        let value = evaluations.apply(f, trial)?;

        if value < values[high] {
            values[high] = value;
            sums.iter_mut()
                .zip(trial.iter().zip(worst.iter()))
                .for_each(|(si, (ti, wi))| *si += *ti - *wi);
            worst.copy_from(trial);
        }

        Ok(value)
    }

    /// Moves all vertices except the best halfway towards the best one.
    ///
    /// The simplex is updated only after all new vertices are evaluated, so
    /// an exhausted budget leaves it untouched.
    fn shrink<F>(&mut self, f: &F, low: usize) -> Result<(), NelderMeadError>
    where
        F: Function<Field = T>,
    {
        let Self {
            simplex,
            values,
            sums,
            trial,
            evaluations,
            ..
        } = self;

        trial.copy_from(&simplex[low]);

        let shrunk = simplex
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != low)
            .map(|(i, xi)| {
                let mut xi = xi.clone_owned();
                xi.on_line_mut(&*trial, convert(SHRINK_COEFF));
                let value = evaluations.apply(f, &xi)?;
                Ok::<_, NelderMeadError>((i, xi, value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (i, xi, value) in shrunk {
            simplex[i] = xi;
            values[i] = value;
        }

        *sums = vertex_sums(simplex);
        Ok(())
    }

    /// Moves the best vertex to position 0.
    fn settle(&mut self, low: usize) {
        self.simplex.swap(0, low);
        self.values.swap(0, low);
    }

    fn into_minimum(self) -> Minimum<T> {
        let x = self.simplex[0].clone_owned();
        let value = self.values[0];

        Minimum {
            x,
            value,
            evaluations: self.evaluations.count,
            iterations: self.iterations,
            simplex: Simplex::from_raw(self.simplex),
            values: self.values,
        }
    }
}

/// Function evaluation counter enforcing the budget.
#[derive(Debug, Clone, Copy)]
struct Evaluations {
    count: usize,
    max: usize,
}

impl Evaluations {
    fn apply<F: Function>(
        &mut self,
        f: &F,
        x: &OVector<F::Field, Dyn>,
    ) -> Result<F::Field, NelderMeadError> {
        if self.count >= self.max {
            debug!("maximum number of {} evaluations reached", self.max);
            return Err(NelderMeadError::MaxIterationsExceeded {
                evaluations: self.count,
            });
        }

        self.count += 1;
        Ok(f.apply(x).nan_to_inf())
    }
}

/// Indices of the best, the worst and the second worst vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ranking {
    low: usize,
    high: usize,
    next_high: usize,
}

impl Ranking {
    /// Ranks the values in one pass. Ties are won by the earlier index.
    fn of<T: RealField + Copy>(values: &[T]) -> Self {
        let (mut high, mut next_high) = if values[1] > values[0] {
            (1, 0)
        } else {
            (0, 1)
        };
        let mut low = 0;

        for (i, value) in values.iter().enumerate() {
            if *value < values[low] {
                low = i;
            }

            if *value > values[high] {
                next_high = high;
                high = i;
            } else if *value > values[next_high] && i != high {
                next_high = i;
            }
        }

        Self {
            low,
            high,
            next_high,
        }
    }
}

/// Relative difference between the worst and the best value.
fn spread<T: RealField + Copy>(high: T, low: T, epsilon: T) -> T {
    let two: T = convert(2.0);
    two * (high - low).abs() / (high.abs() + low.abs() + epsilon)
}

fn vertex_sums<T: RealField + Copy>(simplex: &[OVector<T, Dyn>]) -> OVector<T, Dyn> {
    let dim = Dyn(simplex[0].nrows());

    simplex
        .iter()
        .fold(OVector::zeros_generic(dim, U1::name()), |mut sums, xi| {
            sums += xi;
            sums
        })
}

trait VectorNelderMeadExt<T: RealField, D: Dim> {
    fn on_line_mut<Sto>(&mut self, to: &Vector<T, D, Sto>, t: T)
    where
        Sto: Storage<T, D>;
}

impl<T: RealField, D: Dim, S> VectorNelderMeadExt<T, D> for Vector<T, D, S>
where
    S: StorageMut<T, D>,
{
    fn on_line_mut<Sto>(&mut self, to: &Vector<T, D, Sto>, t: T)
    where
        Sto: Storage<T, D>,
    {
        *self += to;
        *self *= t;
    }
}

trait RealFieldNelderMeadExt {
    fn nan_to_inf(self) -> Self;
}

impl<T: RealField> RealFieldNelderMeadExt for T {
    fn nan_to_inf(self) -> Self {
        if self.is_finite() {
            self
        } else {
            // Not finite also covers NaN and negative infinity.
            T::from_subset(&f64::INFINITY)
        }
    }
}
