//! One-dimensional polynomials in the monomial basis.
//!
//! A [`PolynomialInterpolant`] stores the coefficients `c` of `p(x) = sum_i c[i] x^i`. It can be
//! fitted through a set of points by solving a Vandermonde system or built directly from its
//! coefficients.
use crate::{Error, Real, Result};
use log::warn;
use nalgebra::{convert, DMatrix, DVector};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Number of interpolation points at which fitting is refused.
pub const MAX_INTERPOLATION_POINTS: usize = 256;

/// Fits through more points than this are flagged as potentially ill-conditioned.
pub const CONDITIONING_WARNING_THRESHOLD: usize = 7;

/// Non-fatal diagnostics produced while fitting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FitWarning {
    /// The monomial Vandermonde matrix is likely to be badly conditioned, so the resulting
    /// interpolant may not reproduce the data accurately.
    IllConditioned { num_points: usize },
}

impl Display for FitWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllConditioned { num_points } => write!(
                f,
                "Fitting through {num_points} points (more than {CONDITIONING_WARNING_THRESHOLD}), \
                 the Vandermonde system may be ill-conditioned"
            ),
        }
    }
}

/// A polynomial `p(x) = sum_i c[i] x^i`.
///
/// There is always at least one coefficient, so the degree is `coefficients().len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialInterpolant<T: Real> {
    coefficients: DVector<T>,
}

impl<T: Real> PolynomialInterpolant<T> {
    /// The polynomial with the single coefficient zero.
    pub fn zero() -> Self {
        Self {
            coefficients: DVector::zeros(1),
        }
    }

    /// Creates a polynomial from its coefficients, where `coefficients[i]` multiplies `x^i`.
    ///
    /// An empty coefficient list gives the zero polynomial.
    pub fn from_coefficients(coefficients: impl Into<Vec<T>>) -> Self {
        let coefficients = coefficients.into();
        if coefficients.is_empty() {
            Self::zero()
        } else {
            Self {
                coefficients: DVector::from_vec(coefficients),
            }
        }
    }

    /// Fits the polynomial of degree `n - 1` through the `n` given points.
    ///
    /// A conditioning warning is logged if the fit involves many points. Use
    /// [`fit_with_diagnostics`](Self::fit_with_diagnostics) to handle it explicitly.
    pub fn fit(x: &[T], y: &[T]) -> Result<Self> {
        let (polynomial, warning) = Self::fit_with_diagnostics(x, y)?;
        if let Some(warning) = warning {
            warn!("{warning}");
        }
        Ok(polynomial)
    }

    /// Fits the polynomial of degree `n - 1` through the `n` given points, returning any
    /// conditioning diagnostics alongside the result.
    ///
    /// The Vandermonde system `A c = y` with `A[(i, j)] = x[i]^j` is solved with a
    /// column-pivoted Householder QR decomposition. The fitted polynomial reproduces the data up
    /// to the residual of that solve.
    pub fn fit_with_diagnostics(x: &[T], y: &[T]) -> Result<(Self, Option<FitWarning>)> {
        if x.len() != y.len() {
            return Err(Error::DimensionMismatch {
                points: x.len(),
                values: y.len(),
            });
        }
        let n = x.len();
        if n == 0 {
            return Err(Error::NoPoints);
        }
        if n >= MAX_INTERPOLATION_POINTS {
            return Err(Error::TooManyPoints(n));
        }
        if let Some(index) = (0..n).find(|&i| !(x[i].is_finite() && y[i].is_finite())) {
            return Err(Error::NonFiniteData { index });
        }

        // Repeated points make the system exactly singular, but rounding in the
        // factorization would not necessarily reveal it
        let has_repeated_points = (0..n).any(|i| x[i + 1..].contains(&x[i]));
        if has_repeated_points {
            return Err(Error::SingularFit { num_points: n });
        }

        let warning = (n > CONDITIONING_WARNING_THRESHOLD).then_some(FitWarning::IllConditioned { num_points: n });

        let vandermonde = DMatrix::from_fn(n, n, |i, j| x[i].powi(j as i32));
        let rhs = DVector::from_column_slice(y);
        let coefficients = vandermonde
            .col_piv_qr()
            .solve(&rhs)
            .filter(|c| c.iter().all(|c_i| c_i.is_finite()))
            .ok_or(Error::SingularFit { num_points: n })?;

        Ok((Self { coefficients }, warning))
    }

    pub fn coefficients(&self) -> &[T] {
        self.coefficients.as_slice()
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluates the polynomial at `x` with Horner's scheme.
    pub fn evaluate(&self, x: T) -> T {
        self.coefficients
            .iter()
            .rev()
            .fold(T::zero(), |acc, &c| acc * x + c)
    }

    /// Evaluates the polynomial at each of the given points.
    pub fn evaluate_batch(&self, x: &[T]) -> DVector<T> {
        DVector::from_iterator(x.len(), x.iter().map(|&x_i| self.evaluate(x_i)))
    }

    /// Returns the derivative as a new polynomial of one degree less.
    ///
    /// The derivative of a constant is the zero polynomial.
    pub fn derivative(&self) -> Self {
        let n = self.coefficients.len();
        if n == 1 {
            return Self::zero();
        }
        let coefficients = DVector::from_iterator(
            n - 1,
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| c * convert::<f64, T>(i as f64)),
        );
        Self { coefficients }
    }
}
