//! Error types for basis and interpolant construction.
use crate::quadrature::QuadratureError;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Reasons for rejecting a master element or basis configuration.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The number of spatial dimensions must be positive.
    ZeroDimensions,
    /// The number of variables must be positive.
    ZeroVariables,
    /// A basis was requested before the number of variables was set.
    VariablesNotSet,
    /// Polynomial orders of 0 or 1 are not supported.
    InvalidOrder(usize),
    /// The root-finding tolerance must be positive and finite.
    InvalidTolerance(f64),
    /// The number of per-dimension orders does not match the number of dimensions.
    OrderCountMismatch { expected: usize, actual: usize },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimensions => write!(f, "Number of dimensions must be bigger than 0"),
            Self::ZeroVariables => write!(f, "Number of variables must be bigger than 0"),
            Self::VariablesNotSet => write!(f, "Number of variables has not been set"),
            Self::InvalidOrder(order) => write!(f, "Polynomial order must be at least 2, got {order}"),
            Self::InvalidTolerance(tol) => write!(f, "Tolerance must be positive and finite, got {tol:e}"),
            Self::OrderCountMismatch { expected, actual } => {
                write!(f, "Expected one order per dimension ({expected}), got {actual}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    InvalidConfig(ConfigError),
    /// The number of variables can only be set once.
    AlreadyConfigured { num_variables: usize },
    /// A variable or dimension index is out of range.
    IndexOutOfRange { index: usize, len: usize },
    /// The basis of the variable has not been configured yet.
    BasisNotSet { variable: usize },
    /// Interpolation points and values have different lengths.
    DimensionMismatch { points: usize, values: usize },
    /// Interpolation requires at least one point.
    NoPoints,
    /// The number of interpolation points is at or above
    /// [`MAX_INTERPOLATION_POINTS`](crate::polynomial::MAX_INTERPOLATION_POINTS).
    TooManyPoints(usize),
    /// An interpolation point or value is infinite or NaN.
    NonFiniteData { index: usize },
    /// The Vandermonde system is rank deficient, typically because of repeated points.
    SingularFit { num_points: usize },
    /// Computing a quadrature rule failed, e.g. because root finding did not converge.
    Quadrature(QuadratureError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "Invalid configuration: {err}"),
            Self::AlreadyConfigured { num_variables } => {
                write!(f, "Number of variables has already been set to {num_variables}")
            }
            Self::IndexOutOfRange { index, len } => write!(f, "Index {index} is out of range for length {len}"),
            Self::BasisNotSet { variable } => write!(f, "No basis has been set for variable {variable}"),
            Self::DimensionMismatch { points, values } => {
                write!(f, "Got {points} interpolation points but {values} values")
            }
            Self::NoPoints => write!(f, "Cannot interpolate through an empty point set"),
            Self::TooManyPoints(n) => write!(f, "Number of interpolating points too high ({n})"),
            Self::NonFiniteData { index } => {
                write!(f, "Interpolation point or value at index {index} is not finite")
            }
            Self::SingularFit { num_points } => {
                write!(f, "Vandermonde system for {num_points} points is singular")
            }
            Self::Quadrature(err) => write!(f, "Failed to compute quadrature rule: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::Quadrature(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

impl From<QuadratureError> for Error {
    fn from(err: QuadratureError) -> Self {
        match err {
            QuadratureError::InvalidOrder { order, .. } => Self::InvalidConfig(ConfigError::InvalidOrder(order)),
            QuadratureError::InvalidTolerance(tol) => Self::InvalidConfig(ConfigError::InvalidTolerance(tol)),
            other => Self::Quadrature(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
