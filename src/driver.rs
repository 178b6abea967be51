//! High-level API for minimization.
//!
//! The driver encapsulates all internal state of a minimization run and
//! provides a simple API to run the iterative process step by step, observing
//! it or stopping it early.
//!
//! The simplest way of using the driver is to initialize it with the starting
//! point:
//!
//! ```rust
//! use downhill::{from_fn, OptimizerDriver};
//!
//! let f = from_fn(|x: &[f64]| x[0].powi(2) + x[1].powi(2));
//!
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial(vec![10.0, -10.0])
//!     .build()
//!     .expect("invalid input");
//! ```
//!
//! If you need to specify additional settings, use other builder methods:
//!
//! ```rust
//! use downhill::{from_fn, NelderMeadOptions, OptimizerDriver};
//!
//! let f = from_fn(|x: &[f64]| x[0].powi(2) + x[1].powi(2));
//!
//! let mut options = NelderMeadOptions::default();
//! options.set_function_tolerance(1e-6);
//!
//! let mut optimizer = OptimizerDriver::builder(&f)
//!     .with_initial(vec![10.0, -10.0])
//!     .with_deltas(vec![2.0, 0.5])
//!     .with_options(options)
//!     .build()
//!     .expect("invalid input");
//! ```
//!
//! Once you have the optimizer, you can use it to find the minimum:
//!
//! ```rust
//! # use downhill::{from_fn, OptimizerDriver};
//! #
//! # let f = from_fn(|x: &[f64]| x[0].powi(2) + x[1].powi(2));
//! #
//! # let mut optimizer = OptimizerDriver::builder(&f)
//! #     .with_initial(vec![10.0, -10.0])
//! #     .build()
//! #     .expect("invalid input");
//! #
//! let (x, fx) = optimizer
//!     .find(|state| state.iter() >= 1000)
//!     .expect("optimizer error");
//! ```
//!
//! If you need more control over the iteration process, you can do the
//! iterations manually:
//!
//! ```rust
//! # use downhill::{from_fn, OptimizerDriver};
//! #
//! # let f = from_fn(|x: &[f64]| x[0].powi(2) + x[1].powi(2));
//! #
//! # let mut optimizer = OptimizerDriver::builder(&f)
//! #     .with_initial(vec![10.0, -10.0])
//! #     .build()
//! #     .expect("invalid input");
//! #
//! loop {
//!     let step = optimizer.next().expect("optimizer error");
//!     // ...
//!     if step.is_converged() {
//!         break;
//!     }
//! }
//! ```

use nalgebra::convert;

use crate::{
    algo::nelder_mead::{NelderMead, NelderMeadError, NelderMeadOptions, State, Step},
    simplex::{InvalidInput, Simplex},
    Function, Problem,
};

enum Initial<T> {
    Point { x0: Vec<T>, deltas: Deltas<T> },
    Simplex(Vec<Vec<T>>),
}

enum Deltas<T> {
    Uniform(T),
    PerVariable(Vec<T>),
}

/// Builder for the [`OptimizerDriver`].
pub struct OptimizerBuilder<'a, F: Problem> {
    f: &'a F,
    options: NelderMeadOptions<F::Field>,
    initial: Option<Initial<F::Field>>,
}

impl<'a, F: Problem> OptimizerBuilder<'a, F> {
    /// Sets the initial point from which the iterative process starts.
    ///
    /// The simplex is built around the point with uniform step 1, unless the
    /// steps are specified by [`with_delta`](Self::with_delta) or
    /// [`with_deltas`](Self::with_deltas).
    pub fn with_initial(mut self, x0: Vec<F::Field>) -> Self {
        let deltas = match self.initial.take() {
            Some(Initial::Point { deltas, .. }) => deltas,
            _ => Deltas::Uniform(convert(1.0)),
        };

        self.initial = Some(Initial::Point { x0, deltas });
        self
    }

    /// Sets the uniform step used for building the initial simplex.
    pub fn with_delta(self, delta: F::Field) -> Self {
        self.with_deltas_inner(Deltas::Uniform(delta))
    }

    /// Sets the step for each variable used for building the initial simplex.
    pub fn with_deltas(self, deltas: Vec<F::Field>) -> Self {
        self.with_deltas_inner(Deltas::PerVariable(deltas))
    }

    /// Sets the initial simplex explicitly. Overrides the initial point.
    pub fn with_simplex(mut self, vertices: Vec<Vec<F::Field>>) -> Self {
        self.initial = Some(Initial::Simplex(vertices));
        self
    }

    /// Sets the options of the minimizer.
    pub fn with_options(mut self, options: NelderMeadOptions<F::Field>) -> Self {
        self.options = options;
        self
    }

    fn with_deltas_inner(mut self, deltas: Deltas<F::Field>) -> Self {
        let x0 = match self.initial.take() {
            Some(Initial::Point { x0, .. }) => x0,
            _ => Vec::new(),
        };

        self.initial = Some(Initial::Point { x0, deltas });
        self
    }
}

impl<'a, F: Function> OptimizerBuilder<'a, F> {
    /// Builds the [`OptimizerDriver`], evaluating the initial simplex.
    pub fn build(self) -> Result<OptimizerDriver<'a, F>, NelderMeadError> {
        let Self {
            f,
            options,
            initial,
        } = self;

        let simplex = match initial {
            Some(Initial::Point {
                x0,
                deltas: Deltas::Uniform(delta),
            }) => Simplex::from_point(&x0, delta)?,
            Some(Initial::Point {
                x0,
                deltas: Deltas::PerVariable(deltas),
            }) => Simplex::from_point_with_deltas(&x0, &deltas)?,
            Some(Initial::Simplex(vertices)) => Simplex::from_vertices(vertices)?,
            None => return Err(InvalidInput::Empty.into()),
        };

        let algo = NelderMead::with_options(f, options);
        let state = algo.init(f, simplex)?;

        Ok(OptimizerDriver {
            f,
            algo,
            state,
            converged: false,
        })
    }
}

/// The driver for the process of minimizing a function.
///
/// Use [`OptimizerDriver::builder`] to create it. For the usage of the
/// driver, see [module](self) documentation.
pub struct OptimizerDriver<'a, F: Function> {
    f: &'a F,
    algo: NelderMead<F>,
    state: State<F::Field>,
    converged: bool,
}

impl<'a, F: Function> OptimizerDriver<'a, F> {
    /// Returns the builder for specifying the initial simplex and the
    /// options.
    pub fn builder(f: &'a F) -> OptimizerBuilder<'a, F> {
        OptimizerBuilder {
            f,
            options: NelderMeadOptions::default(),
            initial: None,
        }
    }

    /// Returns reference to the current best point.
    pub fn x(&self) -> &[F::Field] {
        self.state.best().0
    }

    /// Returns the current best function value.
    pub fn fx(&self) -> F::Field {
        self.state.best().1
    }

    /// Returns the number of function evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.state.evaluations()
    }

    /// Returns the number of performed iterations.
    pub fn iter(&self) -> usize {
        self.state.iterations()
    }

    /// Determines whether the process converged.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Does one iteration of the process.
    ///
    /// Once the process converged, subsequent calls return
    /// [`Step::Converged`] without evaluating the function.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Step, NelderMeadError> {
        let step = self.algo.next(self.f, &mut self.state)?;
        self.converged = step.is_converged();
        Ok(step)
    }

    /// Runs the iterative process until it converges or given stopping
    /// criterion is satisfied, returning the best point and its value.
    pub fn find<C>(&mut self, stop: C) -> Result<(&[F::Field], F::Field), NelderMeadError>
    where
        C: Fn(OptimizerIterState<'_, F>) -> bool,
    {
        loop {
            if self.next()?.is_converged() {
                break;
            }

            let (x, fx) = self.state.best();
            let state = OptimizerIterState {
                x,
                fx,
                iter: self.state.iterations(),
                evaluations: self.state.evaluations(),
            };

            if stop(state) {
                break;
            }
        }

        Ok(self.state.best())
    }

    /// Returns the name of the used minimizer.
    pub fn name(&self) -> &str {
        "Nelder-Mead"
    }
}

/// State of the current iteration.
pub struct OptimizerIterState<'a, F: Problem> {
    x: &'a [F::Field],
    fx: F::Field,
    iter: usize,
    evaluations: usize,
}

impl<'a, F: Problem> OptimizerIterState<'a, F> {
    /// Returns reference to the current best point.
    pub fn x(&self) -> &[F::Field] {
        self.x
    }

    /// Returns the current best function value.
    pub fn fx(&self) -> F::Field {
        self.fx
    }

    /// Returns the current iteration number.
    pub fn iter(&self) -> usize {
        self.iter
    }

    /// Returns the number of function evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}
