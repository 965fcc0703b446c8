//! Nodal Lagrange bases on one-dimensional quadrature nodes.
use crate::polynomial::{FitWarning, PolynomialInterpolant};
use crate::quadrature::{NodeFamily, QuadratureRule, RootFindingSettings};
use crate::{Real, Result};
use nalgebra::{DMatrix, DVector};
use numeric_literals::replace_float_literals;

/// The Lagrange basis associated with the nodes of a quadrature rule.
///
/// Basis function `k` is the polynomial of degree `n - 1` that is one at node `k` and zero at all
/// other nodes. The derivative of each basis function is stored alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangeBasis1d<T: Real> {
    rule: QuadratureRule<T>,
    functions: Vec<PolynomialInterpolant<T>>,
    derivatives: Vec<PolynomialInterpolant<T>>,
    warning: Option<FitWarning>,
}

impl<T: Real> LagrangeBasis1d<T> {
    /// Builds the basis on the Gauss-Lobatto nodes with `order` points.
    pub fn gauss_lobatto(order: usize) -> Result<Self> {
        Self::generate(NodeFamily::GaussLobatto, order, &RootFindingSettings::default())
    }

    /// Builds the basis on the nodes of the given family, using explicit root-finding settings.
    pub fn generate(family: NodeFamily, order: usize, settings: &RootFindingSettings) -> Result<Self> {
        Self::from_rule(QuadratureRule::generate(family, order, settings)?)
    }

    /// Builds the basis by fitting a unit indicator through the nodes of the rule for each node.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn from_rule(rule: QuadratureRule<T>) -> Result<Self> {
        let nodes = rule.nodes();
        let n = nodes.len();

        let mut warning = None;
        let mut functions = Vec::with_capacity(n);
        let mut indicator = DVector::zeros(n);
        for k in 0..n {
            indicator[k] = 1.0;
            let (phi, fit_warning) = PolynomialInterpolant::fit_with_diagnostics(nodes, indicator.as_slice())?;
            indicator[k] = 0.0;
            warning = warning.or(fit_warning);
            functions.push(phi);
        }
        let derivatives = functions.iter().map(PolynomialInterpolant::derivative).collect();

        Ok(Self {
            rule,
            functions,
            derivatives,
            warning,
        })
    }

    /// Number of nodes, which equals the number of basis functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn rule(&self) -> &QuadratureRule<T> {
        &self.rule
    }

    pub fn nodes(&self) -> &[T] {
        self.rule.nodes()
    }

    pub fn weights(&self) -> &[T] {
        self.rule.weights()
    }

    pub fn functions(&self) -> &[PolynomialInterpolant<T>] {
        &self.functions
    }

    pub fn derivatives(&self) -> &[PolynomialInterpolant<T>] {
        &self.derivatives
    }

    /// The conditioning warning raised while fitting the basis, if any.
    pub fn conditioning_warning(&self) -> Option<FitWarning> {
        self.warning
    }

    /// Evaluates all basis functions at `xi`.
    ///
    /// # Panics
    ///
    /// Panics if the output buffer does not have one entry per basis function.
    pub fn populate_basis(&self, output: &mut [T], xi: T) {
        assert_eq!(output.len(), self.len(), "Output buffer must have one entry per basis function");
        for (out, phi) in output.iter_mut().zip(&self.functions) {
            *out = phi.evaluate(xi);
        }
    }

    /// Evaluates the derivatives of all basis functions at `xi`.
    ///
    /// # Panics
    ///
    /// Panics if the output buffer does not have one entry per basis function.
    pub fn populate_basis_derivatives(&self, output: &mut [T], xi: T) {
        assert_eq!(output.len(), self.len(), "Output buffer must have one entry per basis function");
        for (out, dphi) in output.iter_mut().zip(&self.derivatives) {
            *out = dphi.evaluate(xi);
        }
    }

    pub fn evaluate_basis(&self, xi: T) -> DVector<T> {
        let mut values = DVector::zeros(self.len());
        self.populate_basis(values.as_mut_slice(), xi);
        values
    }

    pub fn evaluate_basis_derivatives(&self, xi: T) -> DVector<T> {
        let mut values = DVector::zeros(self.len());
        self.populate_basis_derivatives(values.as_mut_slice(), xi);
        values
    }

    /// The matrix `B` with `B[(i, j)] = phi_j(x_i)` for the given points.
    pub fn basis_matrix(&self, points: &[T]) -> DMatrix<T> {
        DMatrix::from_fn(points.len(), self.len(), |i, j| self.functions[j].evaluate(points[i]))
    }

    /// The nodal differentiation matrix `D` with `D[(i, j)] = phi_j'(x_i)`.
    ///
    /// Applying `D` to nodal values gives the nodal values of the derivative of the interpolant.
    pub fn differentiation_matrix(&self) -> DMatrix<T> {
        let nodes = self.nodes();
        DMatrix::from_fn(nodes.len(), self.len(), |i, j| self.derivatives[j].evaluate(nodes[i]))
    }
}
