//! Construction and validation of the initial simplex.
//!
//! A simplex in _n_-dimensional space is a set of _n + 1_ points (vertices).
//! It can be built around a starting point by perturbing each coordinate in
//! turn, either by a uniform step ([`Simplex::from_point`]) or by a step
//! specific for each variable ([`Simplex::from_point_with_deltas`]), or given
//! explicitly ([`Simplex::from_vertices`]).
//!
//! The vertices must be affinely independent, otherwise the minimizer can
//! only explore a subspace. This is the responsibility of the caller (e.g.,
//! by using nonzero steps).

use nalgebra::{DimName, Dyn, OVector, RealField, U1};
use thiserror::Error;

/// Error returned for malformed initial point, steps, simplex or options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// The point or the simplex has no coordinates.
    #[error("empty point or simplex")]
    Empty,
    /// A simplex in _n_-dimensional space must have exactly _n + 1_ vertices.
    #[error("expected {expected} vertices, got {actual}")]
    VertexCount {
        /// Number of vertices implied by the dimension.
        expected: usize,
        /// Number of vertices given.
        actual: usize,
    },
    /// A vertex has different dimension than the first one.
    #[error("vertex {index} has dimension {actual}, expected {expected}")]
    Dimension {
        /// Index of the offending vertex.
        index: usize,
        /// Dimension of the first vertex.
        expected: usize,
        /// Dimension of the offending vertex.
        actual: usize,
    },
    /// The number of step sizes does not match the dimension of the point.
    #[error("expected {expected} step sizes, got {actual}")]
    StepCount {
        /// Dimension of the point.
        expected: usize,
        /// Number of steps given.
        actual: usize,
    },
    /// A coordinate or a step is NaN or infinite.
    #[error("non-finite coordinate or step")]
    NotFinite,
    /// The options of the minimizer are not valid.
    #[error("invalid options: {reason}")]
    Options {
        /// Description of the violated requirement.
        reason: &'static str,
    },
}

/// A set of _n + 1_ vertices in _n_-dimensional space.
#[derive(Debug, Clone, PartialEq)]
pub struct Simplex<T: RealField + Copy> {
    vertices: Vec<OVector<T, Dyn>>,
}

impl<T: RealField + Copy> Simplex<T> {
    /// Builds the simplex around `x0` with uniform step `delta`.
    ///
    /// Vertex 0 is `x0`, vertex _i_ is `x0` with coordinate _i - 1_ increased
    /// by `delta`.
    pub fn from_point(x0: &[T], delta: T) -> Result<Self, InvalidInput> {
        let deltas = vec![delta; x0.len()];
        Self::from_point_with_deltas(x0, &deltas)
    }

    /// Builds the simplex around `x0` with a step for each variable.
    ///
    /// Vertex 0 is `x0`, vertex _i_ is `x0` with coordinate _i - 1_ increased
    /// by `deltas[i - 1]`.
    pub fn from_point_with_deltas(x0: &[T], deltas: &[T]) -> Result<Self, InvalidInput> {
        if x0.is_empty() {
            return Err(InvalidInput::Empty);
        }

        if deltas.len() != x0.len() {
            return Err(InvalidInput::StepCount {
                expected: x0.len(),
                actual: deltas.len(),
            });
        }

        if !all_finite(x0) || !all_finite(deltas) {
            return Err(InvalidInput::NotFinite);
        }

        let dim = Dyn(x0.len());
        let origin = OVector::from_iterator_generic(dim, U1::name(), x0.iter().copied());

        let mut vertices = Vec::with_capacity(x0.len() + 1);
        vertices.push(origin.clone_owned());

        for (j, delta) in deltas.iter().enumerate() {
            let mut xj = origin.clone_owned();
            xj[j] += *delta;
            vertices.push(xj);
        }

        Ok(Self { vertices })
    }

    /// Uses the given vertices as the simplex.
    ///
    /// All vertices must have the same dimension _n_ and there must be
    /// exactly _n + 1_ of them.
    pub fn from_vertices<I, V>(vertices: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[T]>,
    {
        let rows = vertices
            .into_iter()
            .map(|v| v.as_ref().to_vec())
            .collect::<Vec<_>>();

        let n = rows.first().map(|row| row.len()).unwrap_or(0);

        if n == 0 {
            return Err(InvalidInput::Empty);
        }

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(InvalidInput::Dimension {
                index,
                expected: n,
                actual: row.len(),
            });
        }

        if rows.len() != n + 1 {
            return Err(InvalidInput::VertexCount {
                expected: n + 1,
                actual: rows.len(),
            });
        }

        if !rows.iter().all(|row| all_finite(row)) {
            return Err(InvalidInput::NotFinite);
        }

        let dim = Dyn(n);
        let vertices = rows
            .into_iter()
            .map(|row| OVector::from_vec_generic(dim, U1::name(), row))
            .collect();

        Ok(Self { vertices })
    }

    pub(crate) fn from_raw(vertices: Vec<OVector<T, Dyn>>) -> Self {
        Self { vertices }
    }

    pub(crate) fn into_raw(self) -> Vec<OVector<T, Dyn>> {
        self.vertices
    }

    /// Dimension of the space.
    pub fn dim(&self) -> usize {
        self.vertices[0].nrows()
    }

    /// Number of vertices, always `dim() + 1`.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the `i`-th vertex.
    pub fn vertex(&self, i: usize) -> &[T] {
        self.vertices[i].as_slice()
    }

    /// Iterates over the vertices.
    pub fn iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.vertices.iter().map(|xi| xi.as_slice())
    }

    /// Copies the vertices into rows of a matrix.
    ///
    /// The result can be passed back to [`Simplex::from_vertices`].
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.iter().map(|xi| xi.to_vec()).collect()
    }
}

fn all_finite<T: RealField + Copy>(values: &[T]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_step() {
        let simplex = Simplex::from_point(&[1.0, -2.0, 0.5], 0.25).unwrap();

        assert_eq!(simplex.dim(), 3);
        assert_eq!(simplex.len(), 4);
        assert_eq!(
            simplex.to_rows(),
            vec![
                vec![1.0, -2.0, 0.5],
                vec![1.25, -2.0, 0.5],
                vec![1.0, -1.75, 0.5],
                vec![1.0, -2.0, 0.75],
            ]
        );
    }

    #[test]
    fn step_per_variable() {
        let simplex = Simplex::from_point_with_deltas(&[0.0, 10.0], &[1.0, -5.0]).unwrap();

        assert_eq!(simplex.vertex(0), &[0.0, 10.0]);
        assert_eq!(simplex.vertex(1), &[1.0, 10.0]);
        assert_eq!(simplex.vertex(2), &[0.0, 5.0]);
    }

    #[test]
    fn explicit_vertices_equal_built_ones() {
        let built = Simplex::from_point(&[0.0, 0.0], 1.0).unwrap();
        let explicit = Simplex::from_vertices([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).unwrap();

        assert_eq!(built, explicit);
    }

    #[test]
    fn rows_round_trip() {
        let simplex = Simplex::from_point_with_deltas(&[3.0, 4.0], &[0.5, 2.0]).unwrap();
        let rows = simplex.to_rows();

        assert_eq!(Simplex::from_vertices(&rows).unwrap(), simplex);
    }

    #[test]
    fn empty_point() {
        assert_eq!(
            Simplex::<f64>::from_point(&[], 1.0),
            Err(InvalidInput::Empty)
        );
    }

    #[test]
    fn empty_simplex() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert_eq!(Simplex::from_vertices(rows), Err(InvalidInput::Empty));

        let rows: Vec<Vec<f64>> = vec![Vec::new()];
        assert_eq!(Simplex::from_vertices(rows), Err(InvalidInput::Empty));
    }

    #[test]
    fn step_count_mismatch() {
        assert_eq!(
            Simplex::from_point_with_deltas(&[0.0, 0.0, 0.0], &[1.0, 1.0]),
            Err(InvalidInput::StepCount {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn ragged_rows() {
        let rows = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0]];

        assert_eq!(
            Simplex::from_vertices(rows),
            Err(InvalidInput::Dimension {
                index: 2,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn wrong_vertex_count() {
        let rows = vec![vec![0.0, 0.0], vec![1.0, 0.0]];

        assert_eq!(
            Simplex::from_vertices(rows),
            Err(InvalidInput::VertexCount {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn non_finite_input() {
        assert_eq!(
            Simplex::from_point(&[0.0, f64::NAN], 1.0),
            Err(InvalidInput::NotFinite)
        );
        assert_eq!(
            Simplex::from_point(&[0.0, 0.0], f64::INFINITY),
            Err(InvalidInput::NotFinite)
        );
        assert_eq!(
            Simplex::from_vertices([[0.0], [f64::NEG_INFINITY]]),
            Err(InvalidInput::NotFinite)
        );
    }
}
