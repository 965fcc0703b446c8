//! Legendre polynomials and their first three derivatives.
//!
//! The derivatives are computed from closed-form expressions that divide by `1 - x^2`, so they
//! are only defined in the open interval `(-1, 1)`. Quantities needed at the endpoints (such as
//! the Gauss-Lobatto boundary weights) are given by explicit formulas instead.

/// Result of running Bonnet's recurrence up to degree `n` at a point `x`.
///
/// Holds both `P_n(x)` and `P_{n - 1}(x)`, which is all that is needed for the derivatives.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegendreRecurrence {
    n: usize,
    x: f64,
    // The current value, i.e. p_n(x)
    p1: f64,
    // The previous value in the recurrence, i.e. p_{n - 1}(x)
    p2: f64,
}

impl LegendreRecurrence {
    pub fn evaluate(n: usize, x: f64) -> Self {
        // Use recurrence relation
        //  m P_m(x) = (2m - 1) * x P_{m - 1}(x) - (m - 1) P_{m - 2}(x)
        let mut p1 = 1.0;
        let mut p2 = 0.0;
        let mut p3;
        for m in 1..=n {
            let m = m as f64;
            p3 = p2;
            p2 = p1;
            p1 = ((2.0 * m - 1.0) * x * p2 - (m - 1.0) * p3) / m;
        }

        Self { n, x, p1, p2 }
    }

    pub fn degree(&self) -> usize {
        self.n
    }

    pub fn point(&self) -> f64 {
        self.x
    }

    /// The value `P_n(x)`.
    pub fn value(&self) -> f64 {
        self.p1
    }

    /// The value `P_{n - 1}(x)`. Zero for `n == 0`.
    pub fn previous_value(&self) -> f64 {
        self.p2
    }

    /// First derivative `P_n'(x)`.
    pub fn d1(&self) -> f64 {
        let Self { n, x, p1, p2 } = *self;
        let n = n as f64;
        n * (p2 - x * p1) / (1.0 - x * x)
    }

    /// Second derivative `P_n''(x)`.
    pub fn d2(&self) -> f64 {
        self.d2_given_d1(self.d1())
    }

    /// Third derivative `P_n'''(x)`.
    pub fn d3(&self) -> f64 {
        self.derivatives().2
    }

    /// The first three derivatives, sharing intermediate results.
    pub fn derivatives(&self) -> (f64, f64, f64) {
        let x = self.x;
        let n = self.n as f64;
        let d1 = self.d1();
        let d2 = self.d2_given_d1(d1);
        // Differentiating Legendre's equation (1 - x^2) p'' - 2x p' + n (n + 1) p = 0 once more
        let d3 = (4.0 * x * d2 - (n * (n + 1.0) - 2.0) * d1) / (1.0 - x * x);
        (d1, d2, d3)
    }

    fn d2_given_d1(&self, d1: f64) -> f64 {
        let x = self.x;
        let n = self.n as f64;
        (2.0 * x * d1 - n * (n + 1.0) * self.p1) / (1.0 - x * x)
    }
}

/// Evaluates the Legendre polynomial `P_n` at `x`.
pub fn legendre(n: usize, x: f64) -> f64 {
    LegendreRecurrence::evaluate(n, x).value()
}

/// First derivative of `P_n` at `x`, for `x` in `(-1, 1)`.
pub fn d1(n: usize, x: f64) -> f64 {
    LegendreRecurrence::evaluate(n, x).d1()
}

/// Second derivative of `P_n` at `x`, for `x` in `(-1, 1)`.
pub fn d2(n: usize, x: f64) -> f64 {
    LegendreRecurrence::evaluate(n, x).d2()
}

/// Third derivative of `P_n` at `x`, for `x` in `(-1, 1)`.
pub fn d3(n: usize, x: f64) -> f64 {
    LegendreRecurrence::evaluate(n, x).d3()
}
