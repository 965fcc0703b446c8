//! The master (reference) element of a spectral element discretization.
//!
//! A [`MasterElement`] holds, for every problem variable and every spatial dimension, a
//! quadrature rule and the nodal Lagrange basis built on its nodes. Configuration happens in
//! stages: the number of dimensions is fixed on construction, the number of variables is set once
//! afterwards, and the basis of each variable is then set (and possibly replaced) independently.
//!
//! ```
//! use specel::master::MasterElement;
//!
//! let mut element = MasterElement::<f64>::new(2)?;
//! element.set_variable_count(1)?;
//! element.set_basis_order(0, 4)?;
//! assert_eq!(element.nodes(0, 1)?.len(), 4);
//! # Ok::<(), specel::Error>(())
//! ```
use crate::basis::LagrangeBasis1d;
use crate::quadrature::{NodeFamily, QuadratureRule, RootFindingSettings, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::{ConfigError, Error, Real, Result};
use itertools::Itertools;
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

/// Settings for constructing the basis of one variable.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(default))]
pub struct BasisSettings {
    pub family: NodeFamily,
    /// Tolerance on the root-finding update step used to compute the nodes.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for BasisSettings {
    fn default() -> Self {
        Self {
            family: NodeFamily::GaussLobatto,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl BasisSettings {
    pub fn with_family(self, family: NodeFamily) -> Self {
        Self { family, ..self }
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self { max_iterations, ..self }
    }

    fn root_finding(&self) -> RootFindingSettings {
        RootFindingSettings {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

/// Basis configuration of a single variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableConfig {
    /// Number of nodes in each dimension.
    pub orders: Vec<usize>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub settings: BasisSettings,
}

impl VariableConfig {
    /// The same order in each of `num_dims` dimensions, with default settings.
    pub fn uniform(order: usize, num_dims: usize) -> Self {
        Self {
            orders: vec![order; num_dims],
            settings: BasisSettings::default(),
        }
    }
}

/// Complete description of a master element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct MasterElementConfig {
    pub num_dims: usize,
    pub variables: Vec<VariableConfig>,
}

/// Reference element with one nodal basis per variable and dimension.
///
/// Once configured the element is read-only and may be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterElement<T: Real> {
    num_dims: usize,
    // Empty until the number of variables is set. Each variable holds one basis per dimension.
    variables: Vec<Option<Vec<LagrangeBasis1d<T>>>>,
}

impl<T: Real> MasterElement<T> {
    pub fn new(num_dims: usize) -> Result<Self> {
        if num_dims == 0 {
            return Err(ConfigError::ZeroDimensions.into());
        }
        Ok(Self {
            num_dims,
            variables: Vec::new(),
        })
    }

    /// Builds and fully configures a master element from a configuration.
    pub fn from_config(config: &MasterElementConfig) -> Result<Self> {
        let mut element = Self::new(config.num_dims)?;
        element.set_variable_count(config.variables.len())?;
        for (variable, variable_config) in config.variables.iter().enumerate() {
            element.set_basis_orders(variable, &variable_config.orders, &variable_config.settings)?;
        }
        Ok(element)
    }

    /// Sets the number of variables.
    ///
    /// This can only be done once. Subsequent calls fail with [`Error::AlreadyConfigured`].
    pub fn set_variable_count(&mut self, num_variables: usize) -> Result<()> {
        if !self.variables.is_empty() {
            return Err(Error::AlreadyConfigured {
                num_variables: self.variables.len(),
            });
        }
        if num_variables == 0 {
            return Err(ConfigError::ZeroVariables.into());
        }
        self.variables = vec![None; num_variables];
        Ok(())
    }

    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    /// The number of variables, or zero if it has not been set yet.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Sets a Gauss-Lobatto basis with `order` nodes in every dimension.
    pub fn set_basis_order(&mut self, variable: usize, order: usize) -> Result<()> {
        self.set_basis_order_with_tolerance(variable, order, DEFAULT_TOLERANCE)
    }

    pub fn set_basis_order_with_tolerance(&mut self, variable: usize, order: usize, tolerance: f64) -> Result<()> {
        let orders = vec![order; self.num_dims];
        let settings = BasisSettings::default().with_tolerance(tolerance);
        self.set_basis_orders(variable, &orders, &settings)
    }

    /// Sets a Gauss-Legendre basis with `order` nodes in every dimension.
    pub fn set_gauss_order(&mut self, variable: usize, order: usize) -> Result<()> {
        let orders = vec![order; self.num_dims];
        let settings = BasisSettings::default().with_family(NodeFamily::Gauss);
        self.set_basis_orders(variable, &orders, &settings)
    }

    /// Sets the basis of a variable with one order per dimension.
    ///
    /// Any previous basis of the variable is replaced. Other variables are unaffected, and on
    /// failure the variable keeps its previous basis.
    pub fn set_basis_orders(&mut self, variable: usize, orders: &[usize], settings: &BasisSettings) -> Result<()> {
        if self.variables.is_empty() {
            return Err(ConfigError::VariablesNotSet.into());
        }
        self.check_variable_index(variable)?;
        if orders.len() != self.num_dims {
            return Err(ConfigError::OrderCountMismatch {
                expected: self.num_dims,
                actual: orders.len(),
            }
            .into());
        }
        if let Some(&order) = orders.iter().find(|&&order| order <= 1) {
            return Err(ConfigError::InvalidOrder(order).into());
        }
        if !(settings.tolerance > 0.0 && settings.tolerance.is_finite()) {
            return Err(ConfigError::InvalidTolerance(settings.tolerance).into());
        }

        let root_finding = settings.root_finding();
        let mut bases = Vec::with_capacity(self.num_dims);
        for (dim, &order) in orders.iter().enumerate() {
            let rule = QuadratureRule::generate(settings.family, order, &root_finding)?;
            let basis = LagrangeBasis1d::from_rule(rule)?;
            if let Some(warning) = basis.conditioning_warning() {
                warn!("Basis for variable {variable} in dimension {dim}: {warning}");
            }
            bases.push(basis);
        }

        debug!(
            "Configured {:?} basis of variable {variable} with orders {orders:?}",
            settings.family
        );
        self.variables[variable] = Some(bases);
        Ok(())
    }

    pub fn is_basis_set(&self, variable: usize) -> bool {
        matches!(self.variables.get(variable), Some(Some(_)))
    }

    /// The bases of the given variable, one per dimension.
    pub fn bases(&self, variable: usize) -> Result<&[LagrangeBasis1d<T>]> {
        self.check_variable_index(variable)?;
        self.variables[variable]
            .as_deref()
            .ok_or(Error::BasisNotSet { variable })
    }

    pub fn basis(&self, variable: usize, dim: usize) -> Result<&LagrangeBasis1d<T>> {
        let bases = self.bases(variable)?;
        bases.get(dim).ok_or(Error::IndexOutOfRange {
            index: dim,
            len: self.num_dims,
        })
    }

    /// The quadrature nodes of the variable along the given dimension.
    pub fn nodes(&self, variable: usize, dim: usize) -> Result<&[T]> {
        Ok(self.basis(variable, dim)?.nodes())
    }

    /// The quadrature weights of the variable along the given dimension.
    pub fn weights(&self, variable: usize, dim: usize) -> Result<&[T]> {
        Ok(self.basis(variable, dim)?.weights())
    }

    /// The number of nodes of the variable in each dimension.
    pub fn orders(&self, variable: usize) -> Result<Vec<usize>> {
        Ok(self.bases(variable)?.iter().map(LagrangeBasis1d::len).collect())
    }

    /// Total number of tensor-product nodes of the variable.
    pub fn num_tensor_nodes(&self, variable: usize) -> Result<usize> {
        Ok(self.orders(variable)?.into_iter().product())
    }

    /// The tensor-product quadrature rule of the variable, as `(weights, points)`.
    ///
    /// Points are ordered so that the index along the last dimension varies fastest. The same
    /// ordering is used by [`populate_tensor_basis`](Self::populate_tensor_basis).
    pub fn tensor_quadrature(&self, variable: usize) -> Result<(Vec<T>, Vec<DVector<T>>)> {
        let bases = self.bases(variable)?;
        let (weights, points) = tensor_indices(bases)
            .map(|multi_index| {
                let weight = multi_index
                    .iter()
                    .zip(bases)
                    .fold(T::one(), |w, (&i, basis)| w * basis.weights()[i]);
                let point = DVector::from_iterator(
                    bases.len(),
                    multi_index.iter().zip(bases).map(|(&i, basis)| basis.nodes()[i]),
                );
                (weight, point)
            })
            .unzip();
        Ok((weights, points))
    }

    /// Evaluates all tensor-product basis functions of the variable at the reference point `xi`.
    ///
    /// # Panics
    ///
    /// Panics if `xi` does not have one coordinate per dimension, or if the output buffer does
    /// not have one entry per tensor-product node.
    pub fn populate_tensor_basis(&self, variable: usize, output: &mut [T], xi: &[T]) -> Result<()> {
        let bases = self.bases(variable)?;
        assert_eq!(xi.len(), self.num_dims, "Reference point must have one coordinate per dimension");
        let values: Vec<_> = bases
            .iter()
            .zip(xi)
            .map(|(basis, &x)| basis.evaluate_basis(x))
            .collect();
        let num_nodes: usize = bases.iter().map(LagrangeBasis1d::len).product();
        assert_eq!(output.len(), num_nodes, "Output buffer must have one entry per node");

        for (out, multi_index) in output.iter_mut().zip(tensor_indices(bases)) {
            *out = multi_index
                .iter()
                .zip(&values)
                .fold(T::one(), |product, (&i, phi)| product * phi[i]);
        }
        Ok(())
    }

    /// Evaluates the reference gradients of all tensor-product basis functions of the variable.
    ///
    /// Column `j` of the output holds the gradient of basis function `j`.
    ///
    /// # Panics
    ///
    /// Panics if `xi` does not have one coordinate per dimension, or if the output is not a
    /// `num_dims x num_nodes` matrix.
    pub fn populate_tensor_basis_gradients(
        &self,
        variable: usize,
        output: &mut DMatrix<T>,
        xi: &[T],
    ) -> Result<()> {
        let bases = self.bases(variable)?;
        assert_eq!(xi.len(), self.num_dims, "Reference point must have one coordinate per dimension");
        let values: Vec<_> = bases
            .iter()
            .zip(xi)
            .map(|(basis, &x)| basis.evaluate_basis(x))
            .collect();
        let derivatives: Vec<_> = bases
            .iter()
            .zip(xi)
            .map(|(basis, &x)| basis.evaluate_basis_derivatives(x))
            .collect();
        let num_nodes: usize = bases.iter().map(LagrangeBasis1d::len).product();
        assert_eq!(
            output.shape(),
            (self.num_dims, num_nodes),
            "Output must have one row per dimension and one column per node"
        );

        for (j, multi_index) in tensor_indices(bases).enumerate() {
            for k in 0..self.num_dims {
                output[(k, j)] = multi_index
                    .iter()
                    .enumerate()
                    .fold(T::one(), |product, (d, &i)| {
                        let factor = if d == k { derivatives[d][i] } else { values[d][i] };
                        product * factor
                    });
            }
        }
        Ok(())
    }

    fn check_variable_index(&self, variable: usize) -> Result<()> {
        if variable < self.variables.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index: variable,
                len: self.variables.len(),
            })
        }
    }
}

/// Multi-indices of the tensor-product nodes, with the last index varying fastest.
///
/// This is the same ordering as [`tensor_product`](crate::rules::tensor::tensor_product), which
/// needs the number of dimensions at compile time.
fn tensor_indices<T: Real>(bases: &[LagrangeBasis1d<T>]) -> impl Iterator<Item = Vec<usize>> {
    bases
        .iter()
        .map(|basis| 0..basis.len())
        .collect_vec()
        .into_iter()
        .multi_cartesian_product()
}
