//! Legendre polynomials and quadrature rules on the reference interval `[-1, 1]`.
//!
//! The main purpose of this crate is to provide the node sets used by the `specel` spectral
//! element core. It only deals with `f64` and has no dependencies, so the rules can be used
//! completely independently of `specel`.
//!
//! Rules are stored as `(weights, points)` pairs, see [`Rule`].

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod legendre;
pub mod tensor;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The requested number of points is not supported by the rule.
    InvalidOrder {
        order: usize,
        min_order: usize,
    },
    /// The root-finding tolerance must be positive and finite.
    InvalidTolerance(f64),
    /// Root finding for an interior node did not reach the requested tolerance within the
    /// iteration budget.
    ConvergenceFailure {
        /// Number of points in the requested rule.
        order: usize,
        /// Index of the node that failed to converge.
        node_index: usize,
        /// Number of iterations performed.
        iterations: usize,
        /// Magnitude of the last update step.
        last_step: f64,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOrder { order, min_order } => {
                write!(f, "Rule with {order} points requested, but at least {min_order} are required")
            }
            Self::InvalidTolerance(tol) => {
                write!(f, "Tolerance must be positive and finite, got {tol:e}")
            }
            Self::ConvergenceFailure {
                order,
                node_index,
                iterations,
                last_step,
            } => {
                write!(
                    f,
                    "Node {node_index} of the {order}-point rule did not converge within {iterations} \
                     iterations (last step {last_step:e})"
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A two-dimensional point.
pub type Point2 = Point<2>;

/// A three-dimensional point.
pub type Point3 = Point<3>;

/// A D-dimensional rule, stored as `(weights, points)`.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// A one-dimensional quadrature rule.
pub type Rule1d = Rule<1>;

/// A two-dimensional quadrature rule.
pub type Rule2d = Rule<2>;

/// A three-dimensional rule.
pub type Rule3d = Rule<3>;

/// Approximates the integral of `f` with the given rule.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights.iter().zip(points).map(|(w, x)| w * f(x)).sum()
}
