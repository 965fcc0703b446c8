//! Quadrature rules on the reference interval, in the scalar type of choice.
//!
//! Rules are computed in `f64` by `specel-quadrature` and converted to `T`.
use crate::{Real, Result};
use nalgebra::convert;
use specel_quadrature::univariate;

/// Errors returned by the underlying `f64` quadrature routines.
pub use specel_quadrature::Error as QuadratureError;
pub use specel_quadrature::univariate::{RootFindingSettings, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// The family of node sets a rule or basis is built on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeFamily {
    /// Legendre-Gauss-Lobatto nodes, which include the endpoints of the interval.
    #[default]
    GaussLobatto,
    /// Gauss-Legendre nodes, which lie strictly inside the interval.
    Gauss,
}

/// An immutable one-dimensional quadrature rule on `[-1, 1]`.
///
/// Nodes are stored in strictly increasing order with one weight per node.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule<T> {
    nodes: Vec<T>,
    weights: Vec<T>,
}

impl<T: Real> QuadratureRule<T> {
    /// The Legendre-Gauss-Lobatto rule with `num_points` points, using default settings.
    pub fn gauss_lobatto(num_points: usize) -> Result<Self> {
        Self::generate(NodeFamily::GaussLobatto, num_points, &RootFindingSettings::default())
    }

    /// The Gauss-Legendre rule with `num_points` points, using default settings.
    pub fn gauss(num_points: usize) -> Result<Self> {
        Self::generate(NodeFamily::Gauss, num_points, &RootFindingSettings::default())
    }

    /// The rule of the given family with `num_points` points, using explicit root-finding settings.
    pub fn generate(family: NodeFamily, num_points: usize, settings: &RootFindingSettings) -> Result<Self> {
        let rule = match family {
            NodeFamily::GaussLobatto => univariate::gauss_lobatto_with_settings(num_points, settings)?,
            NodeFamily::Gauss => univariate::gauss_with_settings(num_points, settings)?,
        };
        Ok(Self::from_f64_rule(rule))
    }

    /// Converts a `(weights, points)` rule computed in `f64`.
    pub fn from_f64_rule(rule: specel_quadrature::Rule1d) -> Self {
        let (weights, points) = rule;
        let weights = weights.into_iter().map(convert).collect();
        let nodes = points.into_iter().map(|[x]| convert(x)).collect();
        Self { nodes, weights }
    }

    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Approximates the integral of the given function over `[-1, 1]` using this quadrature rule.
    pub fn integrate(&self, f: impl Fn(T) -> T) -> T {
        self.nodes
            .iter()
            .zip(&self.weights)
            .fold(T::zero(), |integral, (&x, &w)| integral + w * f(x))
    }
}
