//! Quadrature rules for the one-dimensional domain `[-1, 1]`.

use crate::legendre::LegendreRecurrence;
use crate::{Error, Rule};
use std::f64::consts::PI;

/// Default tolerance on the root-finding update step.
pub const DEFAULT_TOLERANCE: f64 = 1e-15;

/// Default maximum number of root-finding iterations per node.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Controls the iterative computation of quadrature nodes.
///
/// An iteration is considered converged once the magnitude of the update step drops below
/// `tolerance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RootFindingSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RootFindingSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RootFindingSettings {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.tolerance > 0.0 && self.tolerance.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidTolerance(self.tolerance))
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct RootFindingFailure {
    iterations: usize,
    last_step: f64,
}

impl RootFindingFailure {
    fn into_error(self, order: usize, node_index: usize) -> Error {
        Error::ConvergenceFailure {
            order,
            node_index,
            iterations: self.iterations,
            last_step: self.last_step,
        }
    }
}

/// Gauss quadrature for the reference interval [-1, 1].
///
/// Returns the [Gauss quadrature rule] with the given number of points. Given `n` points,
/// the rule integrates polynomials of order up to `2 n - 1` exactly.
///
/// [Gauss quadrature rule]: https://en.wikipedia.org/wiki/Gaussian_quadrature
pub fn gauss(num_points: usize) -> Result<Rule<1>, Error> {
    gauss_with_settings(num_points, &RootFindingSettings::default())
}

/// Same as [`gauss`], but with explicit root-finding settings.
pub fn gauss_with_settings(num_points: usize, settings: &RootFindingSettings) -> Result<Rule<1>, Error> {
    let n = num_points;
    if n == 0 {
        return Err(Error::InvalidOrder { order: n, min_order: 1 });
    }
    settings.validate()?;

    // Loosely based on the procedure used in
    // Numerical Recipes, The art of Scientific Computing, Third Edition (2007)
    let num_roots = n;
    let m = (num_roots + 1) / 2;

    let mut points = Vec::with_capacity(num_roots);
    let mut weights = Vec::with_capacity(num_roots);

    // Only find the first m roots. The remaining roots can be found by symmetry
    for i in 0..m {
        // Compute a fairly accurate initial guess
        let x0 = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let (x, dp) = newton_gauss_root(n, x0, settings).map_err(|failure| failure.into_error(n, n - 1 - i))?;

        // Once a root is known, its corresponding weight is given explicitly by a standard
        // formula
        let w = 2.0 / ((1.0 - x * x) * dp * dp);

        points.push([x]);
        weights.push(w);
    }

    // Recover the remaining points and weights by symmetry
    for i in m..n {
        let mirror_idx = n - i - 1;
        points.push([-points[mirror_idx][0]]);
        weights.push(weights[mirror_idx]);
    }

    // The roots were found from the right, so reverse to obtain increasing order
    points.reverse();
    weights.reverse();

    debug_assert_eq!(points.len(), weights.len());
    debug_assert_eq!(points.len(), n, "Internal error: incorrect number of points produced");

    Ok((weights, points))
}

/// Returns the root of `P_n` together with `P_n'` evaluated there.
fn newton_gauss_root(n: usize, mut x: f64, settings: &RootFindingSettings) -> Result<(f64, f64), RootFindingFailure> {
    let mut last_step = f64::INFINITY;
    for _ in 0..settings.max_iterations {
        let recurrence = LegendreRecurrence::evaluate(n, x);
        let dx = -recurrence.value() / recurrence.d1();
        x += dx;
        last_step = dx.abs();
        if last_step < settings.tolerance {
            let dp = LegendreRecurrence::evaluate(n, x).d1();
            return Ok((x, dp));
        }
    }
    Err(RootFindingFailure {
        iterations: settings.max_iterations,
        last_step,
    })
}

/// Legendre-Gauss-Lobatto quadrature for the reference interval [-1, 1].
///
/// The rule with `n` points consists of the endpoints `-1` and `1` together with the roots of
/// `P_{n - 1}'`. It integrates polynomials of order up to `2 n - 3` exactly. Points are returned in
/// strictly increasing order.
///
/// At least two points are required.
pub fn gauss_lobatto(num_points: usize) -> Result<Rule<1>, Error> {
    gauss_lobatto_with_settings(num_points, &RootFindingSettings::default())
}

/// Same as [`gauss_lobatto`], but with explicit root-finding settings.
pub fn gauss_lobatto_with_settings(num_points: usize, settings: &RootFindingSettings) -> Result<Rule<1>, Error> {
    let n = num_points;
    if n < 2 {
        return Err(Error::InvalidOrder { order: n, min_order: 2 });
    }
    settings.validate()?;

    let degree = n - 1;
    let n_f64 = n as f64;
    let boundary_weight = 2.0 / (n_f64 * (n_f64 - 1.0));

    let mut points = vec![[0.0]; n];
    let mut weights = vec![0.0; n];
    points[0] = [-1.0];
    points[n - 1] = [1.0];
    weights[0] = boundary_weight;
    weights[n - 1] = boundary_weight;

    // Asymptotic approximation of the roots of P_{n - 1}'.
    // The guesses are positive and decreasing in i, so they give the right half of the rule.
    let scale = 1.0 - 3.0 * (n_f64 - 2.0) / (8.0 * (n_f64 - 1.0).powi(3));
    let m = n / 2;
    for i in 1..m {
        let angle = (4 * i + 1) as f64 * PI / (4 * degree + 1) as f64;
        let x0 = scale * angle.cos();
        let x = halley_lobatto_root(degree, x0, settings).map_err(|failure| failure.into_error(n, n - 1 - i))?;
        let w = lobatto_weight(n, x);

        points[i] = [-x];
        points[n - 1 - i] = [x];
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    if n % 2 == 1 {
        let mid = n / 2;
        points[mid] = [0.0];
        weights[mid] = lobatto_weight(n, 0.0);
    }

    Ok((weights, points))
}

fn lobatto_weight(n: usize, x: f64) -> f64 {
    let n_f64 = n as f64;
    let p = LegendreRecurrence::evaluate(n - 1, x).value();
    2.0 / (n_f64 * (n_f64 - 1.0) * p * p)
}

/// Halley's method applied to `P_degree'`, using its first two derivatives.
fn halley_lobatto_root(degree: usize, mut x: f64, settings: &RootFindingSettings) -> Result<f64, RootFindingFailure> {
    let mut last_step = f64::INFINITY;
    for _ in 0..settings.max_iterations {
        let (y1, y2, y3) = LegendreRecurrence::evaluate(degree, x).derivatives();
        let dx = 2.0 * y1 * y2 / (2.0 * y2 * y2 - y1 * y3);
        x -= dx;
        last_step = dx.abs();
        if last_step < settings.tolerance {
            return Ok(x);
        }
    }
    Err(RootFindingFailure {
        iterations: settings.max_iterations,
        last_step,
    })
}
